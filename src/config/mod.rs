//! Configuration module for dre-cli
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Report defaults (view mode, window kind)

pub mod paths;
pub mod settings;

pub use paths::DrePaths;
pub use settings::{BackupRetention, Settings};
