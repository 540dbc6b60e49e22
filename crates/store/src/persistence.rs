//! Storage facade used by the game loop.
//!
//! Loads are synchronous and happen once at startup. Saves are serialized
//! on the calling thread and handed to the [`SaveWorker`], so the tick
//! loop never waits on the filesystem.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use tetris_enhanced_core::{Achievements, CoreEvent, Leaderboard, Progress, Settings, Statistics};

use crate::config::{RecordKind, StoreConfig};
use crate::records::{encode, load_or_default};
use crate::worker::{SaveJob, SaveWorker};

pub struct Persistence {
    config: StoreConfig,
    worker: Option<SaveWorker>,
}

impl Persistence {
    /// Start the save worker. If its runtime cannot be built the game
    /// still runs, with saving disabled.
    pub fn start(config: StoreConfig) -> Self {
        let worker = match SaveWorker::start(
            config.data_dir.clone(),
            config.queue_capacity,
            config.shutdown_timeout,
        ) {
            Ok(worker) => Some(worker),
            Err(e) => {
                warn!(error = %e, "save worker unavailable, progress will not be saved");
                None
            }
        };
        info!(dir = %config.data_dir.display(), "storage ready");
        Self { config, worker }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether saves are being written
    pub fn saving_enabled(&self) -> bool {
        self.worker.is_some()
    }

    /// Load one record, or its default when missing or malformed.
    pub fn load<T: DeserializeOwned + Default>(&self, kind: RecordKind) -> T {
        load_or_default(&self.config.path_for(kind))
    }

    /// Load every progression record.
    pub fn load_progress(&self) -> Progress {
        let settings: Settings = self.load(RecordKind::Settings);
        let statistics: Statistics = self.load(RecordKind::Statistics);
        let achievements: Achievements = self.load(RecordKind::Achievements);
        let leaderboard: Leaderboard = self.load(RecordKind::Leaderboard);
        Progress::new(
            settings.normalized(),
            statistics,
            achievements.normalized(),
            leaderboard.normalized(),
        )
    }

    /// Queue a save of `value`. Returns false when the job was not queued.
    pub fn save<T: Serialize + ?Sized>(&self, kind: RecordKind, value: &T) -> bool {
        let Some(worker) = &self.worker else {
            return false;
        };
        match encode(value) {
            Ok(contents) => worker.submit(SaveJob::Write { kind, contents }),
            Err(e) => {
                warn!(record = kind.as_str(), error = %e, "encoding record failed");
                false
            }
        }
    }

    /// Save statistics with the running session's time included.
    pub fn save_statistics(&self, statistics: &Statistics) -> bool {
        self.save(RecordKind::Statistics, &statistics.persisted())
    }

    /// Save every progression record.
    pub fn save_progress(&self, progress: &Progress) {
        self.save(RecordKind::Settings, &progress.settings);
        self.save_statistics(&progress.statistics);
        self.save(RecordKind::Achievements, &progress.achievements);
        self.save(RecordKind::Leaderboard, &progress.leaderboard);
    }

    /// Delete every record file, key bindings included.
    pub fn factory_reset(&self) {
        let Some(worker) = &self.worker else {
            return;
        };
        for kind in RecordKind::ALL {
            worker.submit(SaveJob::Delete { kind });
        }
        info!("factory reset queued");
    }

    /// Queue the saves a core event calls for.
    pub fn observe(&self, event: &CoreEvent, progress: &Progress) {
        match event {
            CoreEvent::Go | CoreEvent::SessionEnded => {
                self.save_statistics(&progress.statistics);
            }
            CoreEvent::AchievementUnlocked(_) => {
                self.save(RecordKind::Achievements, &progress.achievements);
            }
            CoreEvent::SettingsChanged => {
                self.save(RecordKind::Settings, &progress.settings);
            }
            CoreEvent::LeaderboardUpdated { .. } => {
                self.save(RecordKind::Leaderboard, &progress.leaderboard);
            }
            CoreEvent::FactoryReset => self.factory_reset(),
            _ => {}
        }
    }

    /// Wait until every queued job has been written.
    pub fn flush(&self) -> bool {
        self.worker.as_ref().map(|w| w.flush()).unwrap_or(false)
    }

    /// Drain the queue (bounded) and stop the worker.
    pub fn shutdown(mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
        }
    }
}

/// Periodic statistics save driven by the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autosave {
    interval_ms: u32,
    elapsed_ms: u32,
}

impl Autosave {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    /// Advance by `elapsed_ms`; true when a save is due.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms = 0;
            true
        } else {
            false
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}
