//! Simulation statistics tracking and persistence.
//!
//! Counters are lock-free so every player task can record outcomes
//! without touching the board lock. A JSON snapshot is written at the
//! end of the run for inspection.

use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::warn;

/// Aggregated simulation statistics, designed for lock-free updates.
#[derive(Debug)]
pub struct SimStats {
    /// Moves attempted (first and second flips together)
    flips_attempted: AtomicU64,
    /// Successful first flips
    cards_taken: AtomicU64,
    /// Pairs that matched
    matches: AtomicU64,
    /// Pairs that did not match
    mismatches: AtomicU64,
    /// Moves denied by the rules (empty slot, held card, ...)
    denials: AtomicU64,
    /// Waiting first flips abandoned after the simulator's patience ran out
    timeouts: AtomicU64,
    /// Watch broadcasts observed
    watch_events: AtomicU64,
    /// Start time for rate calculations
    start_time: Instant,
    /// Path to write the stats file
    stats_path: String,
    /// Board file the run played on
    board_file: String,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimStatsSnapshot {
    pub board_file: String,
    pub flips_attempted: u64,
    pub cards_taken: u64,
    pub matches: u64,
    pub mismatches: u64,
    pub denials: u64,
    pub timeouts: u64,
    pub watch_events: u64,
    pub flips_per_second: f64,
    pub runtime_seconds: f64,
}

impl SimStats {
    /// Create a new stats tracker writing to `<data_dir>/sim_stats.json`.
    pub fn new(data_dir: &str, board_file: &str) -> Self {
        Self {
            flips_attempted: AtomicU64::new(0),
            cards_taken: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            mismatches: AtomicU64::new(0),
            denials: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            watch_events: AtomicU64::new(0),
            start_time: Instant::now(),
            stats_path: format!("{}/sim_stats.json", data_dir),
            board_file: board_file.to_string(),
        }
    }

    pub fn record_attempt(&self) {
        self.flips_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_take(&self) {
        self.cards_taken.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mismatch(&self) {
        self.mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_denial(&self) {
        self.denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_watch(&self) {
        self.watch_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> SimStatsSnapshot {
        let flips = self.flips_attempted.load(Ordering::Relaxed);
        let runtime = self.start_time.elapsed().as_secs_f64();
        let flips_per_second = if runtime > 0.0 {
            flips as f64 / runtime
        } else {
            0.0
        };

        SimStatsSnapshot {
            board_file: self.board_file.clone(),
            flips_attempted: flips,
            cards_taken: self.cards_taken.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            mismatches: self.mismatches.load(Ordering::Relaxed),
            denials: self.denials.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            watch_events: self.watch_events.load(Ordering::Relaxed),
            flips_per_second,
            runtime_seconds: runtime,
        }
    }

    /// Write the stats file. Failures are logged, never fatal.
    pub fn write(&self) {
        if let Some(dir) = std::path::Path::new(&self.stats_path).parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("Failed to create stats directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.stats_path, json) {
                    warn!("Failed to write {}: {}", self.stats_path, e);
                }
            }
            Err(e) => warn!("Failed to serialize stats: {}", e),
        }
    }
}
