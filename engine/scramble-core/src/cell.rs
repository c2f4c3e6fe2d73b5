//! Board positions and cards.
//!
//! A board slot is an `Option<Card>`: `None` once a matched pair has been
//! taken off the board (removed cells never come back), `Some` while a card
//! is still in play.

use std::fmt;

use crate::player::PlayerId;

/// A grid coordinate, row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Which way a card is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Down,
    Up,
}

/// A card still on the board.
///
/// A face-down card is never controlled; a face-up card is controlled by at
/// most one player, who sees it as `my <label>` in snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: String,
    pub face: Face,
    pub controller: Option<PlayerId>,
}

impl Card {
    /// A freshly dealt card: face down, uncontrolled.
    pub fn hidden(label: String) -> Self {
        Self {
            label,
            face: Face::Down,
            controller: None,
        }
    }

    pub fn is_controlled_by(&self, player: &str) -> bool {
        self.controller.as_deref() == Some(player)
    }
}

/// Whether `label` is a legal card label: non-empty, with no space, tab,
/// carriage return, or line feed.
pub fn valid_label(label: &str) -> bool {
    !label.is_empty() && !label.chars().any(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}
