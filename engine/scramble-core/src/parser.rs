//! Board-file parsing.
//!
//! The format is a `{rows}x{cols}` header line followed by exactly
//! `rows * cols` card labels, one per line. Labels must be non-empty and
//! whitespace-free. CRLF line endings are accepted; a trailing newline is
//! allowed. Anything else is a parse error and produces no board.

use crate::cell::valid_label;
use crate::error::BoardError;
use crate::grid::Grid;

/// Parses a board file into a fresh grid of face-down cards.
pub fn parse(text: &str) -> Result<Grid, BoardError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| BoardError::Parse("empty board file".to_string()))?;
    let (rows, cols) = parse_dimensions(header)?;

    let labels: Vec<&str> = lines.collect();
    if labels.len() != rows * cols {
        return Err(BoardError::Parse(format!(
            "expected {} cards for a {}x{} board, found {}",
            rows * cols,
            rows,
            cols,
            labels.len()
        )));
    }
    for (i, label) in labels.iter().enumerate() {
        if !valid_label(label) {
            return Err(BoardError::Parse(format!(
                "card {} has invalid label {:?}",
                i + 1,
                label
            )));
        }
    }

    Ok(Grid::new(
        rows,
        cols,
        labels.into_iter().map(String::from).collect(),
    ))
}

/// Parses the `{rows}x{cols}` header. Both dimensions must be positive
/// decimal integers with no sign, whitespace, or other decoration.
fn parse_dimensions(header: &str) -> Result<(usize, usize), BoardError> {
    let bad_header = || BoardError::Parse(format!("invalid header {:?}", header));
    let (rows, cols) = header.split_once('x').ok_or_else(bad_header)?;
    if rows.is_empty()
        || cols.is_empty()
        || !rows.bytes().all(|b| b.is_ascii_digit())
        || !cols.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(bad_header());
    }
    let rows: usize = rows.parse().map_err(|_| bad_header())?;
    let cols: usize = cols.parse().map_err(|_| bad_header())?;
    if rows == 0 || cols == 0 {
        return Err(BoardError::Parse(format!(
            "board dimensions must be positive, got {}x{}",
            rows, cols
        )));
    }
    Ok((rows, cols))
}
