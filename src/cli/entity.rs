//! Entity CLI commands
//!
//! Implements CLI commands for entity (person / legal entity) management.

use clap::Subcommand;

use crate::display::format_entity_list;
use crate::error::{DreError, DreResult};
use crate::models::EntityKind;
use crate::services::EntityService;
use crate::storage::Storage;

/// Entity subcommands
#[derive(Subcommand)]
pub enum EntityCommands {
    /// Create a new entity
    Create {
        /// Entity name
        name: String,
        /// Entity kind (personal, business)
        #[arg(short, long, default_value = "personal")]
        kind: String,
    },

    /// List all entities
    List,

    /// Rename an entity
    Rename {
        /// Entity name or ID
        entity: String,
        /// New name
        #[arg(short, long)]
        name: String,
    },

    /// Delete an entity
    Delete {
        /// Entity name or ID
        entity: String,
    },
}

/// Handle an entity command
pub fn handle_entity_command(storage: &mut Storage, cmd: EntityCommands) -> DreResult<()> {
    match cmd {
        EntityCommands::Create { name, kind } => {
            let kind = EntityKind::parse(&kind).ok_or_else(|| {
                DreError::Validation(format!(
                    "Invalid entity kind '{}'. Use personal or business",
                    kind
                ))
            })?;

            let mut service = EntityService::new(storage);
            let entity = service.create(&name, kind)?;

            println!("Created entity: {}", entity.name);
            println!("  Kind: {}", entity.kind);
            println!("  ID:   {}", entity.id);
        }

        EntityCommands::List => {
            let service = EntityService::new(storage);
            print!("{}", format_entity_list(&service.list()));
        }

        EntityCommands::Rename { entity, name } => {
            let mut service = EntityService::new(storage);
            let found = service
                .find(&entity)
                .ok_or_else(|| DreError::entity_not_found(&entity))?;

            let renamed = service.rename(found.id, &name)?;
            println!("Renamed entity: {}", renamed.name);
        }

        EntityCommands::Delete { entity } => {
            let mut service = EntityService::new(storage);
            let found = service
                .find(&entity)
                .ok_or_else(|| DreError::entity_not_found(&entity))?;

            let deleted = service.delete(found.id)?;
            println!("Deleted entity: {}", deleted.name);
        }
    }

    Ok(())
}
