//! Storage initialization
//!
//! Handles first-run setup: a starter entity, its main bank account, and
//! a minimal category dictionary covering revenue, survival cost, and the
//! two structural transfer categories.

use crate::config::paths::DrePaths;
use crate::error::DreError;
use crate::models::{
    Category, CategoryKind, Entity, EntityKind, Institution, InstitutionKind, Money, ReportGroup,
};

use super::file_io::write_json_atomic;
use super::ledger::LedgerFile;

/// Initialize storage for a fresh installation
///
/// Writes a seeded ledger document if none exists yet.
pub fn initialize_storage(paths: &DrePaths) -> Result<(), DreError> {
    paths.ensure_directories()?;

    if !paths.ledger_file().exists() {
        let ledger = seeded_ledger();
        write_json_atomic(paths.ledger_file(), &ledger)?;
    }

    Ok(())
}

/// A fresh ledger with the starter records every installation gets
pub fn seeded_ledger() -> LedgerFile {
    let mut ledger = LedgerFile::default();

    let entity = Entity::new("Main holding", EntityKind::Business);
    let entity_id = entity.id;
    ledger.entities.push(entity);

    ledger.institutions.push(Institution::new(
        "Main bank",
        InstitutionKind::Bank,
        entity_id,
        Money::zero(),
    ));

    ledger.categories.push(Category::new(
        "Dividends",
        ReportGroup::OperatingRevenue,
        CategoryKind::Income,
    ));
    ledger.categories.push(Category::new(
        "Groceries",
        ReportGroup::SurvivalCost,
        CategoryKind::Expense,
    ));
    // The two structural categories: lines classified here are tagged by
    // kind and never reach the statement
    ledger.categories.push(Category::new(
        "Card invoice payment",
        ReportGroup::InternalTransfers,
        CategoryKind::Transfer,
    ));
    ledger.categories.push(Category::new(
        "Internal transfer",
        ReportGroup::InternalTransfers,
        CategoryKind::Transfer,
    ));

    ledger
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &DrePaths) -> bool {
    !paths.ledger_file().exists()
}
