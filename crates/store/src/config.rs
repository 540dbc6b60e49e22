//! Storage configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// The persisted records, one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Settings,
    KeyBindings,
    Statistics,
    Achievements,
    Leaderboard,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Settings,
        RecordKind::KeyBindings,
        RecordKind::Statistics,
        RecordKind::Achievements,
        RecordKind::Leaderboard,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            RecordKind::Settings => "tetris_settings.json",
            RecordKind::KeyBindings => "tetris_keybinds.json",
            RecordKind::Statistics => "tetris_statistics.json",
            RecordKind::Achievements => "tetris_achievements.json",
            RecordKind::Leaderboard => "tetris_leaderboard.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Settings => "settings",
            RecordKind::KeyBindings => "keybinds",
            RecordKind::Statistics => "statistics",
            RecordKind::Achievements => "achievements",
            RecordKind::Leaderboard => "leaderboard",
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding every record file
    pub data_dir: PathBuf,
    /// Capacity of the save queue; jobs beyond it are dropped
    pub queue_capacity: usize,
    /// How long shutdown waits for the queue to drain
    pub shutdown_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            queue_capacity: 32,
            shutdown_timeout: Duration::from_millis(1000),
        }
    }
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let data_dir = env::var("TETRIS_DATA_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let queue_capacity = env::var("TETRIS_SAVE_QUEUE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.queue_capacity)
            .max(1);

        let shutdown_timeout = env::var("TETRIS_SAVE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.shutdown_timeout);

        Self {
            data_dir,
            queue_capacity,
            shutdown_timeout,
        }
    }

    /// Configuration rooted at `dir` with default limits
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_from_env() {
        // Only checks that parsing never panics whatever the environment holds
        let config = StoreConfig::from_env();
        assert!(config.queue_capacity >= 1);
    }

    #[test]
    fn test_file_names_are_distinct() {
        let mut names: Vec<&str> = RecordKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), RecordKind::ALL.len());
    }

    #[test]
    fn test_path_for() {
        let config = StoreConfig::in_dir("/tmp/tetris");
        assert_eq!(
            config.path_for(RecordKind::Leaderboard),
            PathBuf::from("/tmp/tetris/tetris_leaderboard.json")
        );
    }
}
