//! Durable storage for Tetris progression records.
//!
//! Each record lives in its own pretty-printed JSON file inside the data
//! directory. Reads happen once at startup and never fail: a missing or
//! malformed file yields the record's default. Writes are fire-and-forget
//! jobs processed in order by a background worker.
//!
//! ```no_run
//! use tetris_enhanced_store::{Persistence, StoreConfig};
//!
//! let store = Persistence::start(StoreConfig::from_env());
//! let progress = store.load_progress();
//! store.save_progress(&progress);
//! store.shutdown();
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod records;
pub mod worker;

pub use config::{RecordKind, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use persistence::{Autosave, Persistence};
pub use records::{encode, load_or_default, read_record};
pub use worker::{SaveJob, SaveWorker};
