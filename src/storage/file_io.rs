//! File I/O utilities with atomic writes
//!
//! The whole ledger lives in one JSON blob, so a torn write would lose
//! everything. Every write goes through a temp file that is flushed,
//! synced, and renamed into place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::DreError;

/// Read JSON from a file, returning a default value if the file doesn't
/// exist yet
pub fn read_json<T, P>(path: P) -> Result<T, DreError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(DreError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| DreError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read JSON from a file, failing if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, DreError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DreError::Storage(format!(
                "File not found: {}",
                path.display()
            )))
        }
        Err(e) => {
            return Err(DreError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| DreError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename).
///
/// The file is either completely written or left untouched; a crash
/// mid-write never leaves a half-serialized ledger behind.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), DreError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DreError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to stay
    // atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| DreError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| DreError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| DreError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| DreError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DreError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Check whether a file exists and parses as JSON
pub fn json_file_valid<P: AsRef<Path>>(path: P) -> bool {
    match File::open(path.as_ref()) {
        Ok(file) => {
            let reader = BufReader::new(file);
            serde_json::from_reader::<_, serde_json::Value>(reader).is_ok()
        }
        Err(_) => false,
    }
}
