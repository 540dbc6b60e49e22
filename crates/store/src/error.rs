use std::io;

use thiserror::Error;

/// Failures inside the storage layer.
///
/// None of these reach the player: loads fall back to defaults and the
/// save worker logs and moves on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("record is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save worker unavailable: {0}")]
    Runtime(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
