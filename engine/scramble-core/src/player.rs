//! Per-player bookkeeping.

use std::collections::HashMap;

use crate::cell::Position;

/// Opaque player identifier. The board never interprets it beyond equality.
pub type PlayerId = String;

/// The result of a completed pair attempt, held until the owner's next
/// first flip consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Matched { first: Position, second: Position },
    Mismatched { first: Position, second: Position },
}

/// What the board remembers about one player between calls.
#[derive(Debug, Default)]
pub struct PlayerState {
    /// Set while the player has flipped one card and not yet resolved a pair.
    pub first_selection: Option<Position>,
    /// Set at the end of a full pair; consumed by the next first flip.
    pub pending: Option<PairOutcome>,
}

/// Registry of every player that has ever touched the board. Entries are
/// created lazily and never removed.
#[derive(Debug, Default)]
pub struct Players {
    states: HashMap<PlayerId, PlayerState>,
}

impl Players {
    pub fn state_mut(&mut self, player: &str) -> &mut PlayerState {
        self.states.entry(player.to_string()).or_default()
    }

    pub fn first_selection(&self, player: &str) -> Option<Position> {
        self.states.get(player).and_then(|s| s.first_selection)
    }

    pub fn take_pending(&mut self, player: &str) -> Option<PairOutcome> {
        self.states.get_mut(player).and_then(|s| s.pending.take())
    }
}
