//! Service layer for dre-cli
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, reference checks, and cross-record operations.

pub mod card;
pub mod category;
pub mod entity;
pub mod holding;
pub mod import;
pub mod institution;
pub mod investment;
pub mod period;
pub mod transaction;

pub use card::{CardService, RecordPurchaseInput};
pub use category::CategoryService;
pub use entity::EntityService;
pub use holding::{FixedAssetService, LiabilityService};
pub use import::{ImportReport, ImportRowError, ImportService};
pub use institution::InstitutionService;
pub use investment::{InvestmentService, RecordSnapshotInput};
pub use period::PeriodService;
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
