//! Category CLI commands
//!
//! Implements CLI commands for the category dictionary. Report groups are
//! a fixed set, so there is no group CRUD, only a listing.

use clap::Subcommand;

use crate::display::{format_category_details, format_category_list, format_category_tree};
use crate::error::{DreError, DreResult};
use crate::models::ReportGroup;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories (organized by report group)
    List {
        /// Flat table instead of the grouped tree
        #[arg(long)]
        flat: bool,
    },

    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Report group (e.g., "survival_cost" or "Operating revenue")
        #[arg(short, long)]
        group: String,
        /// Category kind (income, expense, transfer)
        #[arg(short, long, default_value = "expense")]
        kind: String,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New kind (income, expense, transfer)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Move a category to a different report group
    Move {
        /// Category name or ID
        category: String,
        /// Target report group
        #[arg(short, long)]
        to: String,
    },

    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },

    /// List the fixed report groups in statement order
    Groups,
}

/// Handle a category command
pub fn handle_category_command(storage: &mut Storage, cmd: CategoryCommands) -> DreResult<()> {
    match cmd {
        CategoryCommands::List { flat } => {
            let service = CategoryService::new(storage);
            let categories = service.list();
            if flat {
                print!("{}", format_category_list(&categories));
            } else {
                print!("{}", format_category_tree(&categories));
            }
        }

        CategoryCommands::Create { name, group, kind } => {
            let group = CategoryService::parse_report_group(&group)?;
            let kind = CategoryService::parse_kind(&kind)?;

            let mut service = CategoryService::new(storage);
            let category = service.create(&name, group, kind)?;

            println!("Created category: {}", category.name);
            println!("  Group: {}", category.group);
            println!("  Kind:  {}", category.kind);
            println!("  ID:    {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let service = CategoryService::new(storage);
            let found = service
                .find(&category)
                .ok_or_else(|| DreError::category_not_found(&category))?;

            let usage = storage.ledger.category_usage(found.id);
            print!("{}", format_category_details(&found, usage));
        }

        CategoryCommands::Edit {
            category,
            name,
            kind,
        } => {
            if name.is_none() && kind.is_none() {
                println!("No changes specified. Use --name or --kind.");
                return Ok(());
            }

            let kind = match kind {
                Some(s) => Some(CategoryService::parse_kind(&s)?),
                None => None,
            };

            let mut service = CategoryService::new(storage);
            let found = service
                .find(&category)
                .ok_or_else(|| DreError::category_not_found(&category))?;

            let mut updated = found.clone();
            if let Some(new_name) = name {
                updated = service.rename(found.id, &new_name)?;
            }
            if let Some(new_kind) = kind {
                updated = service.set_kind(found.id, new_kind)?;
            }

            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Move { category, to } => {
            let group = CategoryService::parse_report_group(&to)?;

            let mut service = CategoryService::new(storage);
            let found = service
                .find(&category)
                .ok_or_else(|| DreError::category_not_found(&category))?;

            let moved = service.regroup(found.id, group)?;
            println!("Moved '{}' to group '{}'", moved.name, moved.group);
        }

        CategoryCommands::Delete { category } => {
            let mut service = CategoryService::new(storage);
            let found = service
                .find(&category)
                .ok_or_else(|| DreError::category_not_found(&category))?;

            service.delete(found.id)?;
            println!("Deleted category: {}", found.name);
        }

        CategoryCommands::Groups => {
            println!("Report groups (statement order):");
            for &group in ReportGroup::all() {
                println!("  {}", group.label());
            }
        }
    }

    Ok(())
}
