//! Display formatting for terminal output
//!
//! Formats data models for terminal display: tables, registers, and
//! detail views. Reports carry their own formatting; this module covers
//! the management commands.

pub mod card;
pub mod category;
pub mod institution;
pub mod investment;
pub mod transaction;
pub mod worth;

pub use card::{format_card_list, format_purchase_register};
pub use category::{format_category_details, format_category_list, format_category_tree};
pub use institution::{format_entity_list, format_institution_details, format_institution_list};
pub use investment::{format_asset_list, format_snapshot_list};
pub use transaction::{
    format_transaction_details, format_transaction_register, format_transaction_row,
};
pub use worth::{format_fixed_asset_list, format_liability_list};
