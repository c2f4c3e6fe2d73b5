//! Default configuration values.
//!
//! Single source of truth for every default used across the Memory
//! Scramble services.

// Common defaults
pub const BOARD_FILE: &str = "boards/perfect.txt";
pub const DATA_DIR: &str = "./data";
pub const LOG_LEVEL: &str = "info";

// Web defaults
pub const HOST: &str = "0.0.0.0";
pub const PORT: u16 = 8080;

// Simulator defaults
pub const SIM_PLAYERS: usize = 4;
pub const SIM_FLIPS_PER_PLAYER: u32 = 100;
pub const SIM_SEED: u64 = 42;
pub const SIM_LOG_INTERVAL: u32 = 25;
