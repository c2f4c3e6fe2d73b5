//! Game endpoints.
//!
//! All four speak the plain-text snapshot grammar on success and a short
//! text body naming the denial on failure. `/flip` and `/watch` may
//! long-poll; `/look` and `/replace` always answer promptly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use scramble_core::{valid_label, BoardError, Position};
use std::sync::Arc;

use crate::AppState;

/// Validates a player id from the path: non-empty, no whitespace.
fn parse_player(player: &str) -> Result<&str, (StatusCode, String)> {
    if valid_label(player) {
        Ok(player)
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            format!("invalid player id {:?}", player),
        ))
    }
}

/// Parses a `row,col` path segment.
fn parse_spot(spot: &str) -> Result<Position, (StatusCode, String)> {
    spot.split_once(',')
        .and_then(|(row, col)| Some(Position::new(row.parse().ok()?, col.parse().ok()?)))
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                format!("invalid coordinate {:?}, expected \"row,col\"", spot),
            )
        })
}

/// Maps a board denial onto an HTTP response.
fn reject(err: BoardError) -> (StatusCode, String) {
    let status = match err {
        BoardError::Parse(_) | BoardError::OutOfBounds(_) | BoardError::InvalidLabel(_) => {
            StatusCode::BAD_REQUEST
        }
        BoardError::EmptySpace(_)
        | BoardError::Contested(_)
        | BoardError::NoFirst
        | BoardError::EmptyTarget(_)
        | BoardError::SecondContested(_) => StatusCode::CONFLICT,
        BoardError::Closed => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

/// Current board from the player's perspective.
pub async fn look(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
) -> Result<String, (StatusCode, String)> {
    let player = parse_player(&player)?;
    Ok(state.board.snapshot(player).await)
}

/// Plays the card at `spot` as the player's next first or second flip.
/// A first flip against a card someone else holds long-polls until the
/// card frees up or leaves the board.
pub async fn flip(
    State(state): State<Arc<AppState>>,
    Path((player, spot)): Path<(String, String)>,
) -> Result<String, (StatusCode, String)> {
    let player = parse_player(&player)?;
    let pos = parse_spot(&spot)?;
    state.board.flip(player, pos).await.map_err(reject)?;
    Ok(state.board.snapshot(player).await)
}

/// Renames every card labeled `from` to `to`, then returns the new board.
pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path((player, from, to)): Path<(String, String, String)>,
) -> Result<String, (StatusCode, String)> {
    let player = parse_player(&player)?;
    for label in [&from, &to] {
        if !valid_label(label) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("invalid card label {:?}", label),
            ));
        }
    }
    state
        .board
        .map(|label| {
            let from = from.clone();
            let to = to.clone();
            async move {
                if label == from {
                    to
                } else {
                    label
                }
            }
        })
        .await
        .map_err(reject)?;
    Ok(state.board.snapshot(player).await)
}

/// Long-polls until the next board change, then returns the new snapshot.
pub async fn watch(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
) -> Result<String, (StatusCode, String)> {
    let player = parse_player(&player)?;
    state.board.watch(player).await.map_err(reject)
}
