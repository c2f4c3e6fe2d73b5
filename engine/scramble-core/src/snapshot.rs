//! Player-perspective text rendering of the board.
//!
//! The wire format is line-oriented: a `{rows}x{cols}` header, then one
//! line per cell in row-major order:
//!
//! ```text
//! none        empty slot
//! down        face-down card
//! my LABEL    face-up card controlled by the viewer
//! up LABEL    face-up card controlled by nobody or by someone else
//! ```
//!
//! Every line, including the last, ends with a newline.

use crate::cell::Face;
use crate::grid::Grid;

/// Renders `grid` as seen by `viewer`.
pub fn render(grid: &Grid, viewer: &str) -> String {
    // Header plus roughly one short token per cell.
    let mut out = String::with_capacity(8 + grid.rows() * grid.cols() * 8);
    out.push_str(&format!("{}x{}\n", grid.rows(), grid.cols()));
    for pos in grid.positions() {
        match grid.cell(pos) {
            None => out.push_str("none"),
            Some(card) => match card.face {
                Face::Down => out.push_str("down"),
                Face::Up if card.is_controlled_by(viewer) => {
                    out.push_str("my ");
                    out.push_str(&card.label);
                }
                Face::Up => {
                    out.push_str("up ");
                    out.push_str(&card.label);
                }
            },
        }
        out.push('\n');
    }
    out
}
