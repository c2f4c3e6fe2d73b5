//! Simulator - concurrent load generator for Memory Scramble
//!
//! A bounded run that:
//! 1. Parses the configured board file
//! 2. Spawns N synthetic players making random moves against one shared board
//! 3. Counts takes, matches, mismatches, denials, and watch broadcasts
//! 4. Writes a JSON stats file for inspection

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod config;
mod simulation;
mod stats;

use crate::config::Config;
use crate::stats::SimStats;

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;
    init_tracing(&config.log_level);

    info!(
        board_file = %config.board_file,
        players = config.players,
        flips_per_player = config.flips_per_player,
        seed = config.seed,
        "Simulator starting"
    );

    let text = std::fs::read_to_string(&config.board_file)
        .with_context(|| format!("failed to read board file {}", config.board_file))?;
    let board = Arc::new(
        scramble_core::Board::parse(&text)
            .with_context(|| format!("invalid board file {}", config.board_file))?,
    );
    info!(rows = board.rows(), cols = board.cols(), "Board dealt");

    let stats = Arc::new(SimStats::new(&config.data_dir, &config.board_file));
    simulation::run(&config, board, stats.clone()).await?;

    let snapshot = stats.snapshot();
    info!(
        flips = snapshot.flips_attempted,
        taken = snapshot.cards_taken,
        matches = snapshot.matches,
        mismatches = snapshot.mismatches,
        denials = snapshot.denials,
        timeouts = snapshot.timeouts,
        watch_events = snapshot.watch_events,
        "Simulation finished"
    );
    stats.write();
    Ok(())
}
