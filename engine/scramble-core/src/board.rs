//! The Memory Scramble board ADT.
//!
//! One `Board` is shared by every concurrent request. All mutable state
//! (grid, player registry, wait queues, watcher set) sits behind a single
//! `tokio::sync::Mutex`, and every critical section is await-free and
//! bounded: O(rows * cols) inside `map`'s snapshot and commit passes,
//! O(1) amortized everywhere else.
//!
//! Suspension happens in exactly three places, always with the lock
//! released:
//!
//! - a first flip against a card another player holds parks on that cell's
//!   FIFO queue until a release or removal signal arrives;
//! - `watch` parks on the watcher set until the next visible change;
//! - `map` awaits the caller-supplied transform between its snapshot and
//!   commit passes.
//!
//! Second flips never suspend. That asymmetry is what makes the two-phase
//! protocol deadlock-free: a player holding a first card cannot block
//! forever on a card someone else holds.

use std::collections::BTreeMap;
use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cell::{valid_label, Face, Position};
use crate::error::BoardError;
use crate::grid::Grid;
use crate::parser;
use crate::player::{PairOutcome, Players};
use crate::snapshot;
use crate::waiters::{WaitQueues, Wake};
use crate::watchers::WatcherSet;

/// A shared game board. Construct one with [`Board::parse`] and hand out
/// references (typically through an `Arc`) to every request handler.
#[derive(Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    state: Mutex<Inner>,
}

/// Everything guarded by the board lock.
#[derive(Debug)]
struct Inner {
    grid: Grid,
    players: Players,
    waiters: WaitQueues,
    watchers: WatcherSet,
}

/// Outcome of one attempt to acquire a first card.
enum FirstAttempt {
    /// The card is now face up and controlled by the caller.
    Taken { turned_up: bool },
    /// The slot is empty.
    Empty,
    /// Another player holds the card.
    Contested,
}

impl Board {
    /// Parses a board file and deals every card face down.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let grid = parser::parse(text)?;
        let (rows, cols) = (grid.rows(), grid.cols());
        Ok(Self {
            rows,
            cols,
            state: Mutex::new(Inner {
                grid,
                players: Players::default(),
                waiters: WaitQueues::new(rows, cols),
                watchers: WatcherSet::default(),
            }),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Renders the board as `player` sees it right now. Never suspends;
    /// the view is a consistent moment between operations.
    pub async fn snapshot(&self, player: &str) -> String {
        let inner = self.state.lock().await;
        snapshot::render(&inner.grid, player)
    }

    /// Whether `player` has flipped a first card and not yet resolved the
    /// pair.
    pub async fn has_first_selection(&self, player: &str) -> bool {
        self.state.lock().await.players.first_selection(player).is_some()
    }

    /// Plays `pos` as the next card in `player`'s two-phase turn: a second
    /// flip while a first selection is outstanding, a (waiting) first flip
    /// otherwise. This is the dispatch the HTTP front-end uses.
    pub async fn flip(&self, player: &str, pos: Position) -> Result<(), BoardError> {
        if self.has_first_selection(player).await {
            self.flip_second(player, pos).await
        } else {
            self.flip_first(player, pos).await
        }
    }

    /// Flips `pos` as `player`'s first card, waiting if another player
    /// currently holds it.
    ///
    /// Before the first attempt, the caller's previous pair outcome is
    /// settled: a matched pair is removed from the board, a mismatched
    /// pair flips back down where it still can.
    ///
    /// If the card is held by someone else, the request joins that cell's
    /// FIFO queue. Each release of the card wakes the head of the queue,
    /// which re-runs the acquisition; a retry that loses the race joins the
    /// back of the queue again. If the card is removed while waiting, the
    /// request fails with [`BoardError::EmptySpace`].
    pub async fn flip_first(&self, player: &str, pos: Position) -> Result<(), BoardError> {
        if !self.contains(pos) {
            return Err(BoardError::OutOfBounds(pos));
        }
        let mut settled = false;
        loop {
            let rx = {
                let mut inner = self.state.lock().await;
                let mut changed = false;
                if !settled {
                    changed |= inner.settle(player);
                    inner.abandon_first(player, pos);
                    settled = true;
                }
                match inner.try_first(player, pos) {
                    FirstAttempt::Taken { turned_up } => {
                        changed |= turned_up;
                        if changed {
                            inner.broadcast();
                        }
                        debug!(player = %player, position = %pos, "first card taken");
                        return Ok(());
                    }
                    FirstAttempt::Empty => {
                        if changed {
                            inner.broadcast();
                        }
                        return Err(BoardError::EmptySpace(pos));
                    }
                    FirstAttempt::Contested => {
                        let rx = inner.waiters.enqueue(pos, player.to_string());
                        if changed {
                            inner.broadcast();
                        }
                        rx
                    }
                }
            };
            match rx.await {
                Ok(Wake::Retry) => continue,
                Ok(Wake::Removed) => return Err(BoardError::EmptySpace(pos)),
                Err(_) => return Err(BoardError::Closed),
            }
        }
    }

    /// Non-waiting variant of [`Board::flip_first`]: a card held by another
    /// player fails immediately with [`BoardError::Contested`] instead of
    /// joining the wait queue.
    pub async fn try_flip_first(&self, player: &str, pos: Position) -> Result<(), BoardError> {
        if !self.contains(pos) {
            return Err(BoardError::OutOfBounds(pos));
        }
        let mut inner = self.state.lock().await;
        let mut changed = inner.settle(player);
        inner.abandon_first(player, pos);
        let result = match inner.try_first(player, pos) {
            FirstAttempt::Taken { turned_up } => {
                changed |= turned_up;
                Ok(())
            }
            FirstAttempt::Empty => Err(BoardError::EmptySpace(pos)),
            FirstAttempt::Contested => Err(BoardError::Contested(pos)),
        };
        if changed {
            inner.broadcast();
        }
        result
    }

    /// Flips `pos` as `player`'s second card and resolves the pair.
    ///
    /// Never suspends. An empty or held target aborts the turn: the first
    /// selection is released (waking the head waiter on it) and no pair
    /// outcome is recorded. Otherwise the card is turned up if needed and
    /// the pair resolves to matched (both cards stay up under the caller's
    /// control) or mismatched (control of both is released).
    pub async fn flip_second(&self, player: &str, pos: Position) -> Result<(), BoardError> {
        if !self.contains(pos) {
            return Err(BoardError::OutOfBounds(pos));
        }
        let mut inner = self.state.lock().await;
        let Some(first) = inner.players.first_selection(player) else {
            return Err(BoardError::NoFirst);
        };

        enum Target {
            Empty,
            Held,
            Playable,
        }
        let target = match inner.grid.cell(pos) {
            None => Target::Empty,
            Some(card) if card.face == Face::Up && card.controller.is_some() => Target::Held,
            Some(_) => Target::Playable,
        };
        match target {
            Target::Empty => {
                inner.release_first(player, first);
                return Err(BoardError::EmptyTarget(pos));
            }
            Target::Held => {
                inner.release_first(player, first);
                return Err(BoardError::SecondContested(pos));
            }
            Target::Playable => {}
        }

        let mut changed = false;
        if let Some(card) = inner.grid.cell_mut(pos) {
            if card.face == Face::Down {
                card.face = Face::Up;
                changed = true;
            }
        }

        let is_match = match (inner.grid.cell(first), inner.grid.cell(pos)) {
            (Some(a), Some(b)) => a.label == b.label,
            _ => false,
        };
        if is_match {
            for p in [first, pos] {
                if let Some(card) = inner.grid.cell_mut(p) {
                    card.controller = Some(player.to_string());
                }
            }
            inner.players.state_mut(player).pending =
                Some(PairOutcome::Matched { first, second: pos });
            debug!(player = %player, first = %first, second = %pos, "pair matched");
        } else {
            for p in [first, pos] {
                if let Some(card) = inner.grid.cell_mut(p) {
                    card.controller = None;
                }
                inner.waiters.release_one(p);
            }
            inner.players.state_mut(player).pending =
                Some(PairOutcome::Mismatched { first, second: pos });
            debug!(player = %player, first = %first, second = %pos, "pair mismatched");
        }
        inner.players.state_mut(player).first_selection = None;
        if changed {
            inner.broadcast();
        }
        Ok(())
    }

    /// Suspends until the next watcher-visible change, then returns the
    /// post-change board as `player` sees it.
    ///
    /// Watcher-visible changes are exactly: a card turning face up, a
    /// matched pair leaving the board, a mismatched pair turning back
    /// down, and a `map` that rewrote at least one label. Control changing
    /// hands without a face change does not count, and failed operations
    /// never count.
    pub async fn watch(&self, player: &str) -> Result<String, BoardError> {
        let rx = {
            let mut inner = self.state.lock().await;
            inner.watchers.subscribe(player.to_string())
        };
        rx.await.map_err(|_| BoardError::Closed)
    }

    /// Rewrites every card's label through `transform`, atomically per
    /// original label. Returns whether any label actually changed.
    ///
    /// The transform runs at most once per distinct label, with the board
    /// lock released, and every result is validated before anything
    /// commits: one bad label fails the whole call and changes nothing.
    /// Cards sharing an original label are rewritten in one critical
    /// section, so no snapshot ever sees such a group half-renamed. Cards
    /// removed (or relabeled by a concurrent call) between the initial
    /// scan and the commit are skipped. Faces, controllers, and player
    /// state are untouched. Watchers are notified once, and only if a
    /// label changed.
    pub async fn map<F, Fut>(&self, transform: F) -> Result<bool, BoardError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = String>,
    {
        // Scan: group occupied positions by current label.
        let groups: BTreeMap<String, Vec<Position>> = {
            let inner = self.state.lock().await;
            let mut groups: BTreeMap<String, Vec<Position>> = BTreeMap::new();
            for pos in inner.grid.positions() {
                if let Some(card) = inner.grid.cell(pos) {
                    groups.entry(card.label.clone()).or_default().push(pos);
                }
            }
            groups
        };

        // Transform: once per distinct label, no lock held. Nothing may
        // commit until every replacement has been validated.
        let mut rewrites = Vec::with_capacity(groups.len());
        for (original, positions) in groups {
            let replacement = transform(original.clone()).await;
            if !valid_label(&replacement) {
                return Err(BoardError::InvalidLabel(replacement));
            }
            rewrites.push((original, replacement, positions));
        }

        // Commit: each label group lands whole.
        let mut inner = self.state.lock().await;
        let mut changed = false;
        for (original, replacement, positions) in rewrites {
            if replacement == original {
                continue;
            }
            for pos in positions {
                if let Some(card) = inner.grid.cell_mut(pos) {
                    if card.label == original {
                        card.label = replacement.clone();
                        changed = true;
                    }
                }
            }
        }
        if changed {
            debug!("card labels rewritten");
            inner.broadcast();
        }
        Ok(changed)
    }
}

impl Inner {
    /// Consumes `player`'s pending pair outcome before a new first move.
    ///
    /// A matched pair leaves the board for good; every waiter queued on a
    /// removed cell is failed out. A mismatched pair turns back down
    /// wherever the card is still face up and unclaimed, each flip-down
    /// freeing one waiter slot. Pending positions whose cell was already
    /// removed by someone else's match are skipped silently.
    ///
    /// Returns whether anything watcher-visible happened.
    fn settle(&mut self, player: &str) -> bool {
        let Some(outcome) = self.players.take_pending(player) else {
            return false;
        };
        let mut changed = false;
        match outcome {
            PairOutcome::Matched { first, second } => {
                for pos in [first, second] {
                    if self.grid.remove(pos) {
                        debug!(player = %player, position = %pos, "matched card removed");
                        self.waiters.wake_all_removed(pos);
                        changed = true;
                    }
                }
            }
            PairOutcome::Mismatched { first, second } => {
                for pos in [first, second] {
                    let mut turned_down = false;
                    if let Some(card) = self.grid.cell_mut(pos) {
                        if card.face == Face::Up && card.controller.is_none() {
                            card.face = Face::Down;
                            turned_down = true;
                        }
                    }
                    if turned_down {
                        self.waiters.release_one(pos);
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    /// Drops any previous first selection before `player` starts a new
    /// one at `next`. Re-selecting the same card is not an abandonment.
    /// Only direct ADT callers can reach this; the HTTP front-end
    /// dispatches to a second flip whenever a selection exists.
    fn abandon_first(&mut self, player: &str, next: Position) {
        let Some(prev) = self.players.first_selection(player) else {
            return;
        };
        if prev == next {
            return;
        }
        self.release_first(player, prev);
    }

    /// One acquisition attempt against the card at `pos`.
    fn try_first(&mut self, player: &str, pos: Position) -> FirstAttempt {
        match self.grid.cell_mut(pos) {
            None => FirstAttempt::Empty,
            Some(card) if card.face == Face::Down => {
                card.face = Face::Up;
                card.controller = Some(player.to_string());
                self.players.state_mut(player).first_selection = Some(pos);
                FirstAttempt::Taken { turned_up: true }
            }
            Some(card) => match card.controller.as_deref() {
                Some(other) if other != player => FirstAttempt::Contested,
                _ => {
                    card.controller = Some(player.to_string());
                    self.players.state_mut(player).first_selection = Some(pos);
                    FirstAttempt::Taken { turned_up: false }
                }
            },
        }
    }

    /// Lets go of `player`'s first selection: the card stays face up,
    /// control returns to the table, and the head waiter on it (if any)
    /// gets another try.
    fn release_first(&mut self, player: &str, first: Position) {
        let mut released = false;
        if let Some(card) = self.grid.cell_mut(first) {
            if card.is_controlled_by(player) {
                card.controller = None;
                released = true;
            }
        }
        if released {
            self.waiters.release_one(first);
        }
        self.players.state_mut(player).first_selection = None;
    }

    fn broadcast(&mut self) {
        self.watchers.broadcast(&self.grid);
    }
}
