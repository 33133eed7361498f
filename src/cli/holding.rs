//! Fixed asset and liability CLI commands
//!
//! Implements CLI commands for the static net-worth positions: fixed
//! assets tracked at market value and liabilities at outstanding balance.

use clap::Subcommand;

use crate::cli::parse_money;
use crate::display::{format_fixed_asset_list, format_liability_list};
use crate::error::{DreError, DreResult};
use crate::services::{EntityService, FixedAssetService, LiabilityService};
use crate::storage::Storage;

/// Fixed asset subcommands
#[derive(Subcommand)]
pub enum FixedCommands {
    /// Register a fixed asset
    Create {
        /// Asset name
        name: String,
        /// Asset kind (property, vehicle, stake, equipment, other)
        #[arg(short, long, default_value = "other")]
        kind: String,
        /// Owning entity name or ID
        #[arg(short, long)]
        entity: String,
        /// Acquisition value
        #[arg(short, long)]
        acquisition: String,
        /// Current market value, defaults to the acquisition value
        #[arg(short, long)]
        market: Option<String>,
    },

    /// List fixed assets
    List,

    /// Update a fixed asset's market value
    Revalue {
        /// Asset name or ID
        asset: String,
        /// New market value
        value: String,
    },

    /// Delete a fixed asset
    Delete {
        /// Asset name or ID
        asset: String,
    },
}

/// Liability subcommands
#[derive(Subcommand)]
pub enum LiabilityCommands {
    /// Register a liability
    Create {
        /// Liability name
        name: String,
        /// Liability kind (financing, loan, installment, other)
        #[arg(short, long, default_value = "other")]
        kind: String,
        /// Owning entity name or ID
        #[arg(short, long)]
        entity: String,
        /// Outstanding balance
        #[arg(short, long)]
        balance: String,
    },

    /// List liabilities
    List,

    /// Update a liability's outstanding balance
    #[command(name = "set-balance")]
    SetBalance {
        /// Liability name or ID
        liability: String,
        /// New outstanding balance
        value: String,
    },

    /// Delete a liability
    Delete {
        /// Liability name or ID
        liability: String,
    },
}

/// Handle a fixed asset command
pub fn handle_fixed_command(storage: &mut Storage, cmd: FixedCommands) -> DreResult<()> {
    match cmd {
        FixedCommands::Create {
            name,
            kind,
            entity,
            acquisition,
            market,
        } => {
            let kind = FixedAssetService::parse_kind(&kind)?;
            let acquisition = parse_money(&acquisition, "acquisition value")?;
            let market = match market {
                Some(s) => parse_money(&s, "market value")?,
                None => acquisition,
            };

            let owner = EntityService::new(storage)
                .find(&entity)
                .ok_or_else(|| DreError::entity_not_found(&entity))?;

            let mut service = FixedAssetService::new(storage);
            let asset = service.create(&name, kind, owner.id, acquisition, market)?;

            println!("Created fixed asset: {}", asset.name);
            println!("  Kind:   {}", asset.kind);
            println!("  Market: {}", asset.market_value);
            println!("  ID:     {}", asset.id);
        }

        FixedCommands::List => {
            let service = FixedAssetService::new(storage);
            print!("{}", format_fixed_asset_list(&service.list()));
        }

        FixedCommands::Revalue { asset, value } => {
            let value = parse_money(&value, "market value")?;

            let mut service = FixedAssetService::new(storage);
            let found = service.find(&asset).ok_or_else(|| DreError::NotFound {
                entity_type: "Fixed asset",
                identifier: asset.clone(),
            })?;

            let updated = service.revalue(found.id, value)?;
            println!(
                "Revalued '{}' to {} (appreciation {})",
                updated.name,
                updated.market_value,
                updated.appreciation()
            );
        }

        FixedCommands::Delete { asset } => {
            let mut service = FixedAssetService::new(storage);
            let found = service.find(&asset).ok_or_else(|| DreError::NotFound {
                entity_type: "Fixed asset",
                identifier: asset.clone(),
            })?;

            let deleted = service.delete(found.id)?;
            println!("Deleted fixed asset: {}", deleted.name);
        }
    }

    Ok(())
}

/// Handle a liability command
pub fn handle_liability_command(storage: &mut Storage, cmd: LiabilityCommands) -> DreResult<()> {
    match cmd {
        LiabilityCommands::Create {
            name,
            kind,
            entity,
            balance,
        } => {
            let kind = LiabilityService::parse_kind(&kind)?;
            let balance = parse_money(&balance, "outstanding balance")?;

            let owner = EntityService::new(storage)
                .find(&entity)
                .ok_or_else(|| DreError::entity_not_found(&entity))?;

            let mut service = LiabilityService::new(storage);
            let liability = service.create(&name, kind, owner.id, balance)?;

            println!("Created liability: {}", liability.name);
            println!("  Kind:        {}", liability.kind);
            println!("  Outstanding: {}", liability.outstanding_balance);
            println!("  ID:          {}", liability.id);
        }

        LiabilityCommands::List => {
            let service = LiabilityService::new(storage);
            print!("{}", format_liability_list(&service.list()));
        }

        LiabilityCommands::SetBalance { liability, value } => {
            let value = parse_money(&value, "outstanding balance")?;

            let mut service = LiabilityService::new(storage);
            let found = service.find(&liability).ok_or_else(|| DreError::NotFound {
                entity_type: "Liability",
                identifier: liability.clone(),
            })?;

            let updated = service.set_balance(found.id, value)?;
            println!(
                "Updated '{}' outstanding balance to {}",
                updated.name, updated.outstanding_balance
            );
        }

        LiabilityCommands::Delete { liability } => {
            let mut service = LiabilityService::new(storage);
            let found = service.find(&liability).ok_or_else(|| DreError::NotFound {
                entity_type: "Liability",
                identifier: liability.clone(),
            })?;

            let deleted = service.delete(found.id)?;
            println!("Deleted liability: {}", deleted.name);
        }
    }

    Ok(())
}
