//! The concurrent player swarm.
//!
//! Each synthetic player picks random cells and plays them through the
//! real two-phase protocol. Waiting first flips are abandoned after a
//! short patience window, which both bounds the run and exercises the
//! board's waiter-cancellation path. One watcher long-polls for changes
//! alongside the players.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::debug;

use scramble_core::{Board, Position};

use crate::config::Config;
use crate::stats::SimStats;

/// How long a player waits on a held card before giving up on the move.
const FLIP_PATIENCE: Duration = Duration::from_millis(500);

/// Runs the full simulation: every player makes a bounded number of
/// moves, then the watcher is retired and the run is over.
pub async fn run(config: &Config, board: Arc<Board>, stats: Arc<SimStats>) -> anyhow::Result<()> {
    let mut players = JoinSet::new();
    for i in 0..config.players {
        let board = board.clone();
        let stats = stats.clone();
        let name = format!("player-{}", i + 1);
        let seed = config.seed.wrapping_add(i as u64);
        let flips = config.flips_per_player;
        let log_interval = config.log_interval;
        players.spawn(async move { play(name, board, stats, seed, flips, log_interval).await });
    }

    // One watcher counts broadcasts while play goes on.
    let watcher = {
        let board = board.clone();
        let stats = stats.clone();
        tokio::spawn(async move {
            while board.watch("observer").await.is_ok() {
                stats.record_watch();
            }
        })
    };

    while let Some(result) = players.join_next().await {
        result?;
    }
    // The watcher would park forever on a quiet board.
    watcher.abort();
    Ok(())
}

/// One player's whole run.
async fn play(
    name: String,
    board: Arc<Board>,
    stats: Arc<SimStats>,
    seed: u64,
    flips: u32,
    log_interval: u32,
) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let (rows, cols) = (board.rows(), board.cols());

    for move_no in 1..=flips {
        let pos = Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
        stats.record_attempt();

        if board.has_first_selection(&name).await {
            match board.flip_second(&name, pos).await {
                Ok(()) => {
                    // A matched pair is still under this player's control;
                    // a mismatched one was let go.
                    let matched = board
                        .snapshot(&name)
                        .await
                        .lines()
                        .any(|line| line.starts_with("my "));
                    if matched {
                        stats.record_match();
                    } else {
                        stats.record_mismatch();
                    }
                }
                Err(err) => {
                    debug!(player = %name, position = %pos, error = %err, "second flip denied");
                    stats.record_denial();
                }
            }
        } else {
            match timeout(FLIP_PATIENCE, board.flip_first(&name, pos)).await {
                Ok(Ok(())) => stats.record_take(),
                Ok(Err(err)) => {
                    debug!(player = %name, position = %pos, error = %err, "first flip denied");
                    stats.record_denial();
                }
                Err(_) => {
                    debug!(player = %name, position = %pos, "gave up waiting for a held card");
                    stats.record_timeout();
                }
            }
        }

        if log_interval > 0 && move_no % log_interval == 0 {
            debug!(player = %name, moves = move_no, "progress");
        }
    }
    debug!(player = %name, moves = flips, "player finished");
}
