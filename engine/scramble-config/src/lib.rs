//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the Memory Scramble components (web server, simulator).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`SCRAMBLE_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! SCRAMBLE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     SCRAMBLE_COMMON_BOARD_FILE=boards/zoom.txt
//!     SCRAMBLE_WEB_HOST=127.0.0.1
//!     SCRAMBLE_WEB_PORT=3000
//!     SCRAMBLE_SIM_PLAYERS=16
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
