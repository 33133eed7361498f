//! Storage layer for dre-cli
//!
//! The whole ledger is one JSON document, loaded whole at startup and
//! written back atomically after each mutating command.

pub mod file_io;
pub mod init;
pub mod ledger;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::{initialize_storage, needs_initialization, seeded_ledger};
pub use ledger::{LedgerFile, SCHEMA_VERSION};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::DrePaths;
use crate::error::DreError;
use crate::statement::LedgerSnapshot;

/// Owns the loaded ledger and knows where it lives on disk
pub struct Storage {
    paths: DrePaths,
    audit: AuditLogger,
    pub ledger: LedgerFile,
}

impl Storage {
    /// Open storage, loading the ledger document (or an empty one on
    /// first run)
    pub fn open(paths: DrePaths) -> Result<Self, DreError> {
        paths.ensure_directories()?;

        let ledger: LedgerFile = file_io::read_json(paths.ledger_file())?;
        if ledger.schema_version > SCHEMA_VERSION {
            return Err(DreError::Storage(format!(
                "Ledger was written by a newer version (schema {}, this build supports {})",
                ledger.schema_version, SCHEMA_VERSION
            )));
        }

        let audit = AuditLogger::new(paths.audit_log());
        Ok(Self {
            paths,
            audit,
            ledger,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &DrePaths {
        &self.paths
    }

    /// Persist the ledger document
    pub fn save(&self) -> Result<(), DreError> {
        file_io::write_json_atomic(self.paths.ledger_file(), &self.ledger)
    }

    /// Borrow the engine's read-only view of the loaded ledger
    pub fn snapshot(&self) -> LedgerSnapshot<'_> {
        self.ledger.snapshot()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Access the audit trail
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        after: &T,
    ) -> Result<(), DreError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, after))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), DreError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
    ) -> Result<(), DreError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, before))
    }
}
