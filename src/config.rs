//! Runtime configuration for the terminal binary.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::StoreConfig;
use crate::types::AUTOSAVE_INTERVAL_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Seed for the piece bag
    pub seed: u32,
    /// Log file; logging is off when unset
    pub log_path: Option<PathBuf>,
    /// Statistics autosave interval
    pub autosave_ms: u32,
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            log_path: None,
            autosave_ms: AUTOSAVE_INTERVAL_MS,
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let seed = env::var("TETRIS_SEED")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or_else(clock_seed);

        let log_path = env::var("TETRIS_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let autosave_ms = env::var("TETRIS_AUTOSAVE_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(AUTOSAVE_INTERVAL_MS);

        Self {
            seed,
            log_path,
            autosave_ms,
            store: StoreConfig::from_env(),
        }
    }
}

/// Seed derived from the wall clock
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
