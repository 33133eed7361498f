//! Custom error types for dre-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for dre-cli operations
#[derive(Error, Debug)]
pub enum DreError {
    /// Configuration-related errors (settings file, paths)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV parsing/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A category declares a report group outside the fixed enumeration.
    /// This means the category dictionary and the statement engine have
    /// drifted apart and must not be silently absorbed.
    #[error("Unknown report group '{group}' (valid groups: {valid})")]
    UnknownReportGroup { group: String, valid: String },

    /// Period/window descriptor could not be parsed
    #[error("Invalid period: {0}")]
    Period(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backup errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl DreError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for institutions
    pub fn institution_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Institution",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for entities (PF/PJ owners)
    pub fn entity_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entity",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for bank transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for credit cards
    pub fn card_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Card",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for investment assets
    pub fn asset_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Asset",
            identifier: identifier.into(),
        }
    }

    /// Create an unknown-report-group error listing the valid labels
    pub fn unknown_report_group(group: impl Into<String>) -> Self {
        let valid = crate::models::ReportGroup::all()
            .iter()
            .map(|g| g.label())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownReportGroup {
            group: group.into(),
            valid,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for DreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for DreError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for dre-cli operations
pub type DreResult<T> = Result<T, DreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DreError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = DreError::category_not_found("Dividends");
        assert_eq!(err.to_string(), "Category not found: Dividends");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unknown_report_group_lists_valid_labels() {
        let err = DreError::unknown_report_group("Misc stuff");
        let msg = err.to_string();
        assert!(msg.contains("Misc stuff"));
        assert!(msg.contains("Operating revenue"));
        assert!(msg.contains("Internal transfers"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let dre_err: DreError = io_err.into();
        assert!(matches!(dre_err, DreError::Io(_)));
    }
}
