//! Background save worker.
//!
//! The game loop is synchronous; the worker runs on its own tokio runtime
//! and receives already-serialized snapshots over a bounded channel. Jobs
//! are processed strictly in enqueue order. Submitting never blocks: when
//! the queue is full the job is dropped with a warning.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::RecordKind;
use crate::error::{StoreError, StoreResult};

/// Work for the save worker
#[derive(Debug)]
pub enum SaveJob {
    /// Replace the record file with `contents`
    Write { kind: RecordKind, contents: Vec<u8> },
    /// Remove the record file (missing files are fine)
    Delete { kind: RecordKind },
    /// Acknowledge once every earlier job has been processed
    Flush(oneshot::Sender<()>),
}

/// Running worker instance.
pub struct SaveWorker {
    rt: Option<Runtime>,
    tx: Option<mpsc::Sender<SaveJob>>,
    task: Option<JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl SaveWorker {
    /// Start a worker writing into `dir`.
    pub fn start(dir: PathBuf, capacity: usize, shutdown_timeout: Duration) -> StoreResult<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tetris-save")
            .enable_all()
            .build()
            .map_err(|e| StoreError::Runtime(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<SaveJob>(capacity.max(1));
        let task = rt.spawn(run(dir, rx));

        Ok(Self {
            rt: Some(rt),
            tx: Some(tx),
            task: Some(task),
            shutdown_timeout,
        })
    }

    /// Queue a job without blocking. Returns false if it was dropped.
    pub fn submit(&self, job: SaveJob) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        match tx.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!(job = job_name(&job), "save queue full, dropping job");
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                warn!(job = job_name(&job), "save worker stopped, dropping job");
                false
            }
        }
    }

    /// Block until every job queued so far has been processed, or the
    /// shutdown timeout elapses. Returns whether the queue drained.
    pub fn flush(&self) -> bool {
        let Some(rt) = &self.rt else {
            return false;
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        if !self.submit(SaveJob::Flush(ack_tx)) {
            return false;
        }
        let timeout = self.shutdown_timeout;
        rt.block_on(async move { matches!(tokio::time::timeout(timeout, ack_rx).await, Ok(Ok(()))) })
    }

    /// Stop accepting jobs and wait (bounded) for the queue to drain.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel lets the task finish after the last job
        drop(self.tx.take());

        let (Some(rt), Some(task)) = (self.rt.take(), self.task.take()) else {
            return;
        };
        let timeout = self.shutdown_timeout;
        let drained = rt.block_on(async move { tokio::time::timeout(timeout, task).await.is_ok() });
        if !drained {
            warn!(timeout_ms = timeout.as_millis() as u64, "save worker did not drain in time");
        }
        rt.shutdown_timeout(Duration::from_millis(100));
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn job_name(job: &SaveJob) -> &'static str {
    match job {
        SaveJob::Write { kind, .. } | SaveJob::Delete { kind } => kind.as_str(),
        SaveJob::Flush(_) => "flush",
    }
}

async fn run(dir: PathBuf, mut rx: mpsc::Receiver<SaveJob>) {
    while let Some(job) = rx.recv().await {
        match job {
            SaveJob::Write { kind, contents } => {
                if let Err(e) = write_record(&dir, kind, &contents).await {
                    warn!(record = kind.as_str(), error = %e, "saving record failed");
                } else {
                    debug!(record = kind.as_str(), bytes = contents.len(), "record saved");
                }
            }
            SaveJob::Delete { kind } => {
                if let Err(e) = delete_record(&dir, kind).await {
                    warn!(record = kind.as_str(), error = %e, "deleting record failed");
                }
            }
            SaveJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("save worker finished");
}

/// Write to a sibling temp file, then rename over the target.
async fn write_record(dir: &Path, kind: RecordKind, contents: &[u8]) -> StoreResult<()> {
    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(kind.file_name());
    let tmp = dir.join(format!("{}.tmp", kind.file_name()));
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, &target).await?;
    Ok(())
}

async fn delete_record(dir: &Path, kind: RecordKind) -> StoreResult<()> {
    match tokio::fs::remove_file(dir.join(kind.file_name())).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(dir: &Path) -> SaveWorker {
        SaveWorker::start(dir.to_path_buf(), 8, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_writes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let w = worker(dir.path());
        for n in 0..5 {
            assert!(w.submit(SaveJob::Write {
                kind: RecordKind::Statistics,
                contents: format!("{n}").into_bytes(),
            }));
        }
        assert!(w.flush());
        let text = std::fs::read_to_string(dir.path().join("tetris_statistics.json")).unwrap();
        assert_eq!(text, "4");
        assert!(!dir.path().join("tetris_statistics.json.tmp").exists());
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let w = worker(dir.path());
        assert!(w.submit(SaveJob::Delete {
            kind: RecordKind::Leaderboard
        }));
        assert!(w.flush());
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let dir = tempfile::tempdir().unwrap();
        let w = worker(dir.path());
        w.submit(SaveJob::Write {
            kind: RecordKind::Settings,
            contents: b"{}".to_vec(),
        });
        w.shutdown();
        assert!(dir.path().join("tetris_settings.json").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let w = worker(&nested);
        w.submit(SaveJob::Write {
            kind: RecordKind::Achievements,
            contents: b"{\"unlocked\":[]}".to_vec(),
        });
        assert!(w.flush());
        assert!(nested.join("tetris_achievements.json").exists());
    }

    fn settings_job() -> SaveJob {
        SaveJob::Write {
            kind: RecordKind::Settings,
            contents: b"{}".to_vec(),
        }
    }

    #[test]
    fn test_full_or_closed_queue_drops_jobs() {
        // Nobody drains `rx`, so the single slot stays occupied
        let (tx, rx) = mpsc::channel(1);
        let w = SaveWorker {
            rt: None,
            tx: Some(tx),
            task: None,
            shutdown_timeout: Duration::from_millis(10),
        };
        assert!(w.submit(settings_job()));
        assert!(!w.submit(settings_job()));

        drop(rx);
        assert!(!w.submit(settings_job()));
        assert!(!w.flush());
    }

    #[test]
    fn test_submit_after_stop_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = worker(dir.path());
        w.stop();
        assert!(!w.submit(settings_job()));
        assert!(!w.flush());
        assert!(!dir.path().join("tetris_settings.json").exists());
    }
}
