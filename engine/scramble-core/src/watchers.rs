//! Change-notification broadcast.

use tokio::sync::oneshot;
use tracing::debug;

use crate::grid::Grid;
use crate::player::PlayerId;
use crate::snapshot;

#[derive(Debug)]
struct Watcher {
    player: PlayerId,
    tx: oneshot::Sender<String>,
}

/// The set of requests suspended until the next watcher-visible change.
/// All of them resolve from a single change event, each with its own view
/// of the board, and the set empties atomically with the broadcast.
#[derive(Debug, Default)]
pub(crate) struct WatcherSet {
    pending: Vec<Watcher>,
}

impl WatcherSet {
    pub fn subscribe(&mut self, player: PlayerId) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        self.pending.push(Watcher { player, tx });
        rx
    }

    /// Resolves every pending watcher with the board as it stands right
    /// now. Called under the board lock immediately after a change is
    /// applied, so each watcher observes exactly the post-change state.
    pub fn broadcast(&mut self, grid: &Grid) {
        if self.pending.is_empty() {
            return;
        }
        debug!(watchers = self.pending.len(), "broadcasting board change");
        for Watcher { player, tx } in self.pending.drain(..) {
            // A send failure means the watcher gave up; nothing to do.
            let _ = tx.send(snapshot::render(grid, &player));
        }
    }
}
