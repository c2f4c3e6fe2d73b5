//! Core library for the Memory Scramble game server
//!
//! This crate provides the shared board abstract data type and everything
//! it is built from:
//! - `Board`: the concurrency-safe game board (flip protocol, waiting,
//!   change watching, bulk label rewriting)
//! - `Grid` / `Card` / `Position`: the board's data model
//! - `parser`: the board-file format
//! - `snapshot`: the player-perspective wire format
//! - `BoardError`: every way an operation can be denied

pub mod board;
pub mod cell;
pub mod error;
pub mod grid;
pub mod parser;
pub mod player;
pub mod snapshot;

mod waiters;
mod watchers;

// Re-export main types for convenience
pub use board::Board;
pub use cell::{valid_label, Card, Face, Position};
pub use error::BoardError;
pub use grid::Grid;
pub use player::{PairOutcome, PlayerId, PlayerState};

#[cfg(test)]
mod tests;
