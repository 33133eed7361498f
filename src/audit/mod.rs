//! Audit logging system for dre-cli
//!
//! Records create, update, delete operations with before/after values in
//! an append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: Represents a single audit log entry with timestamp,
//!   operation, record information, and optional before/after values.
//! - `AuditLogger`: Handles writing entries to the audit log file using a
//!   line-delimited JSON format (JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use dre::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(audit_log_path);
//!
//! let entry = AuditEntry::create(
//!     EntityType::Category,
//!     "cat-12345678",
//!     Some("Groceries".to_string()),
//!     &category,
//! );
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
