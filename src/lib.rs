//! dre-cli - Terminal-based personal income statement and wealth tracking
//!
//! This library provides the core functionality for the dre-cli
//! application. It keeps a household ledger of bank transactions, card
//! purchases, investments, and static positions, and derives a management
//! income statement (a DRE) and a net worth statement from it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (entities, transactions, cards, etc.)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `statement`: The income statement engine
//! - `reports`: Terminal and CSV presentation of the statements
//! - `audit`: Audit logging system
//! - `backup`: Automatic backup management
//!
//! # Example
//!
//! ```rust,ignore
//! use dre::config::{paths::DrePaths, settings::Settings};
//!
//! let paths = DrePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod statement;
pub mod storage;

pub use error::DreError;
