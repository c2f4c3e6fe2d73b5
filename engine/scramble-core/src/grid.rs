//! Row-major card storage.

use crate::cell::{Card, Position};

/// The rectangle of board slots. Dimensions are fixed at parse time; cells
/// are only ever mutated in place or removed, never added.
#[derive(Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Card>>,
}

impl Grid {
    pub(crate) fn new(rows: usize, cols: usize, labels: Vec<String>) -> Self {
        debug_assert_eq!(labels.len(), rows * cols);
        Self {
            rows,
            cols,
            cells: labels.into_iter().map(|l| Some(Card::hidden(l))).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    /// The card at `pos`, or `None` if the slot is empty or out of bounds.
    pub fn cell(&self, pos: Position) -> Option<&Card> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Card> {
        self.index(pos).and_then(move |i| self.cells[i].as_mut())
    }

    /// Takes the card at `pos` off the board. Returns whether a card was
    /// actually there.
    pub fn remove(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(i) if self.cells[i].is_some() => {
                self.cells[i] = None;
                true
            }
            _ => false,
        }
    }

    /// Every position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| Position::new(i / cols, i % cols))
    }
}
