//! Configuration for the simulator
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use once_cell::sync::Lazy;

use scramble_config::{load_config, CentralConfig};

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_board_file() -> String {
    std::env::var("SIM_BOARD_FILE").unwrap_or_else(|_| CENTRAL_CONFIG.common.board_file.clone())
}

fn default_data_dir() -> String {
    std::env::var("SIM_DATA_DIR").unwrap_or_else(|_| CENTRAL_CONFIG.common.data_dir.clone())
}

fn default_players() -> usize {
    std::env::var("SIM_PLAYERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.sim.players)
}

fn default_flips_per_player() -> u32 {
    std::env::var("SIM_FLIPS_PER_PLAYER")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.sim.flips_per_player)
}

fn default_seed() -> u64 {
    std::env::var("SIM_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.sim.seed)
}

fn default_log_level() -> String {
    std::env::var("SIM_LOG_LEVEL").unwrap_or_else(|_| CENTRAL_CONFIG.common.log_level.clone())
}

fn default_log_interval() -> u32 {
    std::env::var("SIM_LOG_INTERVAL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.sim.log_interval)
}

#[derive(Parser, Debug, Clone)]
#[command(name = "simulator")]
#[command(about = "Memory Scramble simulator - concurrent synthetic players")]
#[command(
    long_about = "Hammers one shared board with concurrent synthetic players to
exercise the flip protocol, the per-cell wait queues, and the watch broadcast.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Board file to play on
    #[arg(long, default_value_t = default_board_file())]
    pub board_file: String,

    /// Directory for the stats file
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Number of concurrent players
    #[arg(long, default_value_t = default_players())]
    pub players: usize,

    /// Moves each player attempts before stopping
    #[arg(long, default_value_t = default_flips_per_player())]
    pub flips_per_player: u32,

    /// Base RNG seed; each player derives its own stream from it
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Log progress every N moves per player (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,
}

impl Config {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.players == 0 {
            return Err(anyhow!("players must be at least 1"));
        }
        if self.flips_per_player == 0 {
            return Err(anyhow!("flips_per_player must be at least 1"));
        }
        Ok(())
    }
}
