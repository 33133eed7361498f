//! Institution CLI commands
//!
//! Implements CLI commands for banks, brokerages, and wallets.

use clap::Subcommand;

use crate::cli::parse_money;
use crate::display::{format_institution_details, format_institution_list};
use crate::error::{DreError, DreResult};
use crate::models::InstitutionKind;
use crate::services::{EntityService, InstitutionService};
use crate::storage::Storage;

/// Institution subcommands
#[derive(Subcommand)]
pub enum InstitutionCommands {
    /// Create a new institution
    Create {
        /// Institution name
        name: String,
        /// Institution kind (bank, brokerage, wallet)
        #[arg(short, long, default_value = "bank")]
        kind: String,
        /// Owning entity name or ID
        #[arg(short, long)]
        entity: String,
        /// Opening balance (e.g., "1500.00")
        #[arg(short, long, default_value = "0")]
        opening: String,
    },

    /// List institutions
    List {
        /// Only institutions owned by this entity
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Show institution details
    Show {
        /// Institution name or ID
        institution: String,
    },

    /// Edit an institution
    Edit {
        /// Institution name or ID
        institution: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New opening balance
        #[arg(short, long)]
        opening: Option<String>,
    },

    /// Delete an institution
    Delete {
        /// Institution name or ID
        institution: String,
    },
}

/// Handle an institution command
pub fn handle_institution_command(
    storage: &mut Storage,
    cmd: InstitutionCommands,
) -> DreResult<()> {
    match cmd {
        InstitutionCommands::Create {
            name,
            kind,
            entity,
            opening,
        } => {
            let kind = InstitutionKind::parse(&kind).ok_or_else(|| {
                DreError::Validation(format!(
                    "Invalid institution kind '{}'. Use bank, brokerage, or wallet",
                    kind
                ))
            })?;
            let opening = parse_money(&opening, "opening balance")?;

            let owner = EntityService::new(storage)
                .find(&entity)
                .ok_or_else(|| DreError::entity_not_found(&entity))?;

            let mut service = InstitutionService::new(storage);
            let institution = service.create(&name, kind, owner.id, opening)?;

            println!("Created institution: {}", institution.name);
            println!("  Kind:   {}", institution.kind);
            println!("  Entity: {}", owner.name);
            println!("  ID:     {}", institution.id);
        }

        InstitutionCommands::List { entity } => {
            let entities = EntityService::new(storage).list();

            let institutions = match entity {
                Some(identifier) => {
                    let owner = EntityService::new(storage)
                        .find(&identifier)
                        .ok_or_else(|| DreError::entity_not_found(&identifier))?;
                    InstitutionService::new(storage).list_for_entity(owner.id)
                }
                None => InstitutionService::new(storage).list(),
            };

            print!("{}", format_institution_list(&institutions, &entities));
        }

        InstitutionCommands::Show { institution } => {
            let service = InstitutionService::new(storage);
            let found = service
                .find(&institution)
                .ok_or_else(|| DreError::institution_not_found(&institution))?;
            let balance = service.current_balance(found.id);

            let owner = EntityService::new(storage).get(found.entity_id);
            print!(
                "{}",
                format_institution_details(&found, owner.as_ref(), balance)
            );
        }

        InstitutionCommands::Edit {
            institution,
            name,
            opening,
        } => {
            if name.is_none() && opening.is_none() {
                println!("No changes specified. Use --name or --opening.");
                return Ok(());
            }

            let opening = match opening {
                Some(s) => Some(parse_money(&s, "opening balance")?),
                None => None,
            };

            let mut service = InstitutionService::new(storage);
            let found = service
                .find(&institution)
                .ok_or_else(|| DreError::institution_not_found(&institution))?;

            let updated = service.update(found.id, name.as_deref(), opening)?;
            println!("Updated institution: {}", updated.name);
        }

        InstitutionCommands::Delete { institution } => {
            let mut service = InstitutionService::new(storage);
            let found = service
                .find(&institution)
                .ok_or_else(|| DreError::institution_not_found(&institution))?;

            let deleted = service.delete(found.id)?;
            println!("Deleted institution: {}", deleted.name);
        }
    }

    Ok(())
}
