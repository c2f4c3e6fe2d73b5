//! Locating and loading config.toml.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::CentralConfig;

/// Locations probed for config.toml, in order, when `SCRAMBLE_CONFIG`
/// does not point somewhere explicit. The parent-directory entry covers
/// running a binary from inside its crate directory; the `/app` entry
/// covers containers.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml", "/app/config.toml"];

/// Loads the central configuration.
///
/// The file comes from `SCRAMBLE_CONFIG` if that is set, otherwise from
/// the first hit in [`CONFIG_SEARCH_PATHS`]. No file at all is fine: the
/// built-in defaults apply. `SCRAMBLE_<SECTION>_<KEY>` environment
/// overrides are layered on top last, whichever way the base config was
/// obtained.
pub fn load_config() -> CentralConfig {
    let config = match locate_config_file() {
        Some(path) => load_from_path(&path),
        None => {
            debug!("no config.toml found, using built-in defaults");
            CentralConfig::default()
        }
    };
    apply_env_overrides(config)
}

fn locate_config_file() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("SCRAMBLE_CONFIG") {
        let path = PathBuf::from(explicit);
        if path.is_file() {
            return Some(path);
        }
        warn!(
            path = %path.display(),
            "SCRAMBLE_CONFIG points at nothing, falling back to the search path"
        );
    }
    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Reads and parses one config file, without applying environment
/// overrides. Problems are logged and answered with the defaults, never
/// propagated: a broken config file should not keep a server from
/// starting.
pub fn load_from_path(path: &Path) -> CentralConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config file unreadable, using defaults");
            return CentralConfig::default();
        }
    };
    match toml::from_str(&content) {
        Ok(config) => {
            debug!(path = %path.display(), "configuration loaded");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config file malformed, using defaults");
            CentralConfig::default()
        }
    }
}

/// Writes one environment variable into a string field when it is set.
fn override_string(field: &mut String, key: &str) {
    if let Ok(value) = std::env::var(key) {
        *field = value;
    }
}

/// Writes one environment variable into a parseable field. A value that
/// does not parse is ignored with a warning rather than clobbering the
/// field.
fn override_parsed<T: std::str::FromStr>(field: &mut T, key: &str) {
    let Ok(raw) = std::env::var(key) else {
        return;
    };
    match raw.parse() {
        Ok(value) => *field = value,
        Err(_) => warn!(key, value = %raw, "ignoring unparseable environment override"),
    }
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: SCRAMBLE_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    override_string(&mut config.common.board_file, "SCRAMBLE_COMMON_BOARD_FILE");
    override_string(&mut config.common.data_dir, "SCRAMBLE_COMMON_DATA_DIR");
    override_string(&mut config.common.log_level, "SCRAMBLE_COMMON_LOG_LEVEL");

    override_string(&mut config.web.host, "SCRAMBLE_WEB_HOST");
    override_parsed(&mut config.web.port, "SCRAMBLE_WEB_PORT");

    override_parsed(&mut config.sim.players, "SCRAMBLE_SIM_PLAYERS");
    override_parsed(
        &mut config.sim.flips_per_player,
        "SCRAMBLE_SIM_FLIPS_PER_PLAYER",
    );
    override_parsed(&mut config.sim.seed, "SCRAMBLE_SIM_SEED");
    override_parsed(&mut config.sim.log_interval, "SCRAMBLE_SIM_LOG_INTERVAL");

    config
}
