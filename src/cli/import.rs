//! CSV import CLI commands
//!
//! Implements CLI commands for importing bank transactions, card
//! purchases, and categories from fixed-layout CSV files.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use csv::Reader;

use crate::error::{DreError, DreResult};
use crate::services::{CardService, ImportReport, ImportService, InstitutionService};
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import bank transactions (columns: date,description,amount[,category])
    Bank {
        /// CSV file path
        file: PathBuf,
        /// Target institution name or ID
        #[arg(short, long)]
        institution: String,
    },

    /// Import card purchases (columns: date,description,total,installments[,category])
    Card {
        /// CSV file path
        file: PathBuf,
        /// Target card name or ID
        #[arg(short, long)]
        card: String,
    },

    /// Import categories (columns: name,group,kind)
    Categories {
        /// CSV file path
        file: PathBuf,
    },
}

/// Handle an import command
pub fn handle_import_command(storage: &mut Storage, cmd: ImportCommands) -> DreResult<()> {
    match cmd {
        ImportCommands::Bank { file, institution } => {
            let target = InstitutionService::new(storage)
                .find(&institution)
                .ok_or_else(|| DreError::institution_not_found(&institution))?;

            let mut reader = open_csv(&file)?;
            let mut service = ImportService::new(storage);
            let report = service.import_bank(&mut reader, target.id, target.entity_id)?;

            println!("Imported bank transactions into '{}'", target.name);
            print_report(&report);
        }

        ImportCommands::Card { file, card } => {
            let target = CardService::new(storage)
                .find_card(&card)
                .ok_or_else(|| DreError::card_not_found(&card))?;

            let mut reader = open_csv(&file)?;
            let mut service = ImportService::new(storage);
            let report = service.import_card(&mut reader, target.id)?;

            println!("Imported card purchases onto '{}'", target.name);
            print_report(&report);
        }

        ImportCommands::Categories { file } => {
            let mut reader = open_csv(&file)?;
            let mut service = ImportService::new(storage);
            let report = service.import_categories(&mut reader)?;

            println!("Imported categories");
            print_report(&report);
        }
    }

    Ok(())
}

/// Open a CSV file with a header row
fn open_csv(path: &Path) -> DreResult<Reader<std::fs::File>> {
    Reader::from_path(path)
        .map_err(|e| DreError::Import(format!("Failed to open {}: {}", path.display(), e)))
}

/// Print an import outcome, including quarantined rows
fn print_report(report: &ImportReport) {
    println!("  Imported: {}", report.imported);
    println!("  Skipped:  {} (duplicates)", report.skipped);
    if !report.errors.is_empty() {
        println!("  Quarantined rows: {}", report.errors.len());
        for error in &report.errors {
            println!("    Row {}: {}", error.row, error.message);
        }
    }
}
