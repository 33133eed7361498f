//! Core data models for the wealth dashboard
//!
//! This module contains the data structures the income-statement engine and
//! the reports consume: entities, institutions, categories with their fixed
//! report groups, bank and card transactions, investment snapshots, fixed
//! assets, and liabilities.

pub mod card;
pub mod category;
pub mod ids;
pub mod institution;
pub mod investment;
pub mod money;
pub mod period;
pub mod transaction;
pub mod worth;

pub use card::{
    CardNetwork, CardTransaction, CardTransactionStatus, CreditCard,
};
pub use category::{Category, CategoryKind, ReportGroup};
pub use ids::{
    AssetId, CardId, CardTransactionId, CategoryId, EntityId, FixedAssetId, InstitutionId,
    LiabilityId, PurchaseGroupId, SnapshotId, TransactionId,
};
pub use institution::{Entity, EntityKind, Institution, InstitutionKind};
pub use investment::{Asset, AssetClass, InvestmentSnapshot};
pub use money::Money;
pub use period::{month_abbrev, month_name, MonthYear, ReportWindow, ViewMode, WindowKind};
pub use transaction::{BankTransaction, Direction, LineKind};
pub use worth::{FixedAsset, FixedAssetKind, Liability, LiabilityKind};
