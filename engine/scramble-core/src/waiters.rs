//! Per-cell FIFO queues of suspended first-card acquisitions.

use std::collections::VecDeque;

use tokio::sync::oneshot;
use tracing::debug;

use crate::cell::Position;
use crate::player::PlayerId;

/// Signal delivered to a suspended first flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The card may be free now; re-run the acquisition from the top.
    Retry,
    /// The card was removed from the board; the acquisition fails.
    Removed,
}

#[derive(Debug)]
struct Waiter {
    player: PlayerId,
    tx: oneshot::Sender<Wake>,
}

/// One FIFO queue per board position, sized at construction. Waiters are
/// woken strictly head-first; a waiter whose request was cancelled (its
/// receiver dropped) is discarded without consuming the wake.
#[derive(Debug)]
pub(crate) struct WaitQueues {
    cols: usize,
    queues: Vec<VecDeque<Waiter>>,
}

impl WaitQueues {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            queues: (0..rows * cols).map(|_| VecDeque::new()).collect(),
        }
    }

    fn queue_mut(&mut self, pos: Position) -> &mut VecDeque<Waiter> {
        &mut self.queues[pos.row * self.cols + pos.col]
    }

    /// Appends `player` to the back of the queue for `pos` and hands back
    /// the channel its suspended request will wake on.
    pub fn enqueue(&mut self, pos: Position, player: PlayerId) -> oneshot::Receiver<Wake> {
        let (tx, rx) = oneshot::channel();
        debug!(player = %player, position = %pos, "first flip waiting on held card");
        self.queue_mut(pos).push_back(Waiter { player, tx });
        rx
    }

    /// One card-release event: wakes exactly the head waiter with `Retry`.
    pub fn release_one(&mut self, pos: Position) {
        let queue = self.queue_mut(pos);
        while let Some(Waiter { player, tx }) = queue.pop_front() {
            if tx.send(Wake::Retry).is_ok() {
                debug!(player = %player, position = %pos, "woke head waiter");
                return;
            }
            // The request was cancelled while queued; the wake passes to
            // the next in line.
        }
    }

    /// Card removed: every waiter on `pos` fails out.
    pub fn wake_all_removed(&mut self, pos: Position) {
        for Waiter { tx, .. } in self.queue_mut(pos).drain(..) {
            let _ = tx.send(Wake::Removed);
        }
    }
}
