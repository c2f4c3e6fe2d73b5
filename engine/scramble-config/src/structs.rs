//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_board_file() -> String {
    defaults::BOARD_FILE.into()
}
fn d_data_dir() -> String {
    defaults::DATA_DIR.into()
}
fn d_log_level() -> String {
    defaults::LOG_LEVEL.into()
}
fn d_host() -> String {
    defaults::HOST.into()
}
fn d_port() -> u16 {
    defaults::PORT
}
fn d_players() -> usize {
    defaults::SIM_PLAYERS
}
fn d_flips_per_player() -> u32 {
    defaults::SIM_FLIPS_PER_PLAYER
}
fn d_seed() -> u64 {
    defaults::SIM_SEED
}
fn d_log_interval() -> u32 {
    defaults::SIM_LOG_INTERVAL
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Board file served by the web server and used by the simulator.
    #[serde(default = "d_board_file")]
    pub board_file: String,
    /// Directory for simulator stats output.
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    /// Default log level when RUST_LOG is not set.
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            board_file: defaults::BOARD_FILE.into(),
            data_dir: defaults::DATA_DIR.into(),
            log_level: defaults::LOG_LEVEL.into(),
        }
    }
}

/// Web server configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WebConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    /// CORS allowed origins. Empty = allow all origins (development mode
    /// with warning). Set to specific domains in production.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.into(),
            port: defaults::PORT,
            allowed_origins: Vec::new(),
        }
    }
}

/// Simulator configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimConfig {
    /// Number of concurrent synthetic players.
    #[serde(default = "d_players")]
    pub players: usize,
    /// Moves each player attempts before stopping.
    #[serde(default = "d_flips_per_player")]
    pub flips_per_player: u32,
    /// Base RNG seed; each player derives its own stream from it.
    #[serde(default = "d_seed")]
    pub seed: u64,
    /// Log progress every N completed moves per player (0 to disable).
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            players: defaults::SIM_PLAYERS,
            flips_per_player: defaults::SIM_FLIPS_PER_PLAYER,
            seed: defaults::SIM_SEED,
            log_interval: defaults::SIM_LOG_INTERVAL,
        }
    }
}
