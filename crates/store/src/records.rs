//! Reading and encoding record files.
//!
//! A missing file, an unreadable file and a malformed file all load as the
//! record's default. Only the reason differs in the log.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StoreResult;

/// Read and parse a record. `Ok(None)` means the file does not exist.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Read a record, substituting the default on any failure.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_record(path) {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!(path = %path.display(), "record missing, using defaults");
            T::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "record unreadable, using defaults");
            T::default()
        }
    }
}

/// Serialize a record the way it is stored on disk (pretty JSON).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_enhanced_core::{Achievements, Settings, Statistics};

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let r: Option<Settings> = read_record(&dir.path().join("nope.json")).unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(read_record::<Statistics>(&path).is_err());
        assert_eq!(load_or_default::<Statistics>(&path), Statistics::default());
    }

    #[test]
    fn test_unknown_achievement_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ach.json");
        fs::write(&path, br#"{"unlocked":["first_piece","mystery"]}"#).unwrap();
        assert_eq!(load_or_default::<Achievements>(&path), Achievements::default());
    }

    #[test]
    fn test_encode_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.show_ghost = false;
        fs::write(&path, encode(&settings).unwrap()).unwrap();
        let back: Settings = load_or_default(&path);
        assert_eq!(back, settings);
    }
}
