//! Backup restoration for dre-cli
//!
//! Handles restoring the ledger from backup archives. The current ledger
//! is backed up first, so a bad restore is itself recoverable.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::paths::DrePaths;
use crate::config::settings::BackupRetention;
use crate::error::{DreError, DreResult};
use crate::storage::{write_json_atomic, LedgerFile, SCHEMA_VERSION};

use super::manager::{BackupArchive, BackupManager};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: DrePaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: DrePaths) -> Self {
        Self { paths }
    }

    /// Restore the ledger from a backup file
    ///
    /// The current ledger is archived to the backup directory before
    /// being overwritten.
    pub fn restore_from_file(&self, backup_path: &Path) -> DreResult<RestoreResult> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| DreError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| DreError::Json(format!("Failed to parse backup file: {}", e)))?;

        self.restore_from_archive(&archive)
    }

    /// Restore the ledger from a parsed backup archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> DreResult<RestoreResult> {
        self.paths.ensure_directories()?;

        if archive.schema_version > SCHEMA_VERSION {
            return Err(DreError::Backup(format!(
                "Backup was written by a newer version (schema {}, this build supports {})",
                archive.schema_version, SCHEMA_VERSION
            )));
        }

        // Parse the payload fully before touching the live document
        let ledger: LedgerFile = serde_json::from_value(archive.ledger.clone())
            .map_err(|e| DreError::Backup(format!("Backup ledger is not restorable: {}", e)))?;

        // Safety copy of whatever is currently on disk
        let safety_backup = if self.paths.ledger_file().exists() {
            let manager = BackupManager::new(self.paths.clone(), BackupRetention::default());
            Some(manager.create_backup()?)
        } else {
            None
        };

        write_json_atomic(self.paths.ledger_file(), &ledger)?;

        Ok(RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            safety_backup,
            records_restored: record_total(&ledger),
        })
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> DreResult<ValidationResult> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| DreError::Io(format!("Failed to read backup file: {}", e)))?;

        let archive: BackupArchive = serde_json::from_str(&contents)
            .map_err(|e| DreError::Json(format!("Failed to parse backup file: {}", e)))?;

        let ledger: Result<LedgerFile, _> = serde_json::from_value(archive.ledger.clone());

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            restorable: ledger.is_ok(),
            record_count: ledger.map(|l| record_total(&l)).unwrap_or(0),
        })
    }
}

fn record_total(ledger: &LedgerFile) -> usize {
    ledger.entities.len()
        + ledger.institutions.len()
        + ledger.categories.len()
        + ledger.bank_transactions.len()
        + ledger.cards.len()
        + ledger.card_transactions.len()
        + ledger.assets.len()
        + ledger.investment_snapshots.len()
        + ledger.fixed_assets.len()
        + ledger.liabilities.len()
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// Schema version of the restored backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Where the pre-restore ledger was archived, if one existed
    pub safety_backup: Option<PathBuf>,
    /// Total records in the restored document
    pub records_restored: usize,
}

impl RestoreResult {
    /// Get a summary of the restore
    pub fn summary(&self) -> String {
        match &self.safety_backup {
            Some(path) => format!(
                "Restored {} records from backup dated {} (previous ledger saved to {})",
                self.records_restored,
                self.backup_date.format("%Y-%m-%d %H:%M:%S UTC"),
                path.display()
            ),
            None => format!(
                "Restored {} records from backup dated {}",
                self.records_restored,
                self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// Schema version of the backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Whether the ledger payload parses into a restorable document
    pub restorable: bool,
    /// Total records in the payload
    pub record_count: usize,
}

impl ValidationResult {
    /// Get a summary of the validation
    pub fn summary(&self) -> String {
        if self.restorable {
            format!(
                "Valid backup (v{}): {} records, created {}",
                self.schema_version,
                self.record_count,
                self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
            )
        } else {
            format!(
                "Unrestorable backup (v{}): ledger payload does not parse",
                self.schema_version
            )
        }
    }
}
