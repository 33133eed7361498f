//! Investment CLI commands
//!
//! Implements CLI commands for investment assets and their monthly
//! snapshots.

use clap::Subcommand;

use crate::cli::{parse_money, parse_month_or_current};
use crate::display::{format_asset_list, format_snapshot_list};
use crate::error::{DreError, DreResult};
use crate::models::month_name;
use crate::services::{InstitutionService, InvestmentService, RecordSnapshotInput};
use crate::storage::Storage;

/// Investment subcommands
#[derive(Subcommand)]
pub enum InvestmentCommands {
    /// Register a new investment asset
    Create {
        /// Asset name
        name: String,
        /// Asset class (liquidity, equities, long-term)
        #[arg(short, long, default_value = "liquidity")]
        class: String,
        /// Custodian institution name or ID
        #[arg(short, long)]
        institution: String,
    },

    /// List investment assets
    List,

    /// Record a monthly snapshot for an asset
    Snapshot {
        /// Asset name or ID
        asset: String,
        /// Closing balance at the end of the month
        #[arg(long)]
        closing: String,
        /// Snapshot month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Contributions during the month
        #[arg(long, default_value = "0")]
        contributions: String,
        /// Withdrawals during the month
        #[arg(long, default_value = "0")]
        withdrawals: String,
        /// Yield for the month (computed from the prior snapshot when omitted)
        #[arg(long = "yield")]
        yield_amount: Option<String>,
    },

    /// List snapshots
    Snapshots {
        /// Filter by asset name or ID
        #[arg(short, long)]
        asset: Option<String>,
    },

    /// Delete a snapshot
    #[command(name = "delete-snapshot")]
    DeleteSnapshot {
        /// Snapshot ID
        snapshot: String,
    },

    /// Delete an asset
    Delete {
        /// Asset name or ID
        asset: String,
    },
}

/// Handle an investment command
pub fn handle_investment_command(storage: &mut Storage, cmd: InvestmentCommands) -> DreResult<()> {
    match cmd {
        InvestmentCommands::Create {
            name,
            class,
            institution,
        } => {
            let class = InvestmentService::parse_class(&class)?;

            let custodian = InstitutionService::new(storage)
                .find(&institution)
                .ok_or_else(|| DreError::institution_not_found(&institution))?;

            let mut service = InvestmentService::new(storage);
            let asset = service.create_asset(&name, class, custodian.id, custodian.entity_id)?;

            println!("Created asset: {}", asset.name);
            println!("  Class:       {}", asset.class);
            println!("  Institution: {}", custodian.name);
            println!("  ID:          {}", asset.id);
        }

        InvestmentCommands::List => {
            let service = InvestmentService::new(storage);
            let assets = service.list_assets();
            let institutions = storage.ledger.institutions.clone();
            print!("{}", format_asset_list(&assets, &institutions));
        }

        InvestmentCommands::Snapshot {
            asset,
            closing,
            month,
            contributions,
            withdrawals,
            yield_amount,
        } => {
            let month = parse_month_or_current(month.as_deref())?;
            let closing_balance = parse_money(&closing, "closing balance")?;
            let contributions = parse_money(&contributions, "contributions")?;
            let withdrawals = parse_money(&withdrawals, "withdrawals")?;
            let yield_amount = match yield_amount {
                Some(s) => Some(parse_money(&s, "yield")?),
                None => None,
            };

            let mut service = InvestmentService::new(storage);
            let target = service
                .find_asset(&asset)
                .ok_or_else(|| DreError::asset_not_found(&asset))?;

            let input = RecordSnapshotInput {
                asset_id: target.id,
                month,
                closing_balance,
                contributions,
                withdrawals,
                yield_amount,
            };
            let snapshot = service.record_snapshot(input)?;

            println!(
                "Recorded snapshot for '{}' ({} {})",
                target.name,
                month_name(snapshot.month.month),
                snapshot.month.year
            );
            println!("  Closing: {}", snapshot.closing_balance);
            println!("  Yield:   {}", snapshot.yield_amount);
        }

        InvestmentCommands::Snapshots { asset } => {
            let asset_id = match &asset {
                Some(identifier) => {
                    let found = InvestmentService::new(storage)
                        .find_asset(identifier)
                        .ok_or_else(|| DreError::asset_not_found(identifier))?;
                    Some(found.id)
                }
                None => None,
            };

            let service = InvestmentService::new(storage);
            let snapshots = service.list_snapshots(asset_id);
            let assets = storage.ledger.assets.clone();

            print!("{}", format_snapshot_list(&snapshots, &assets));
        }

        InvestmentCommands::DeleteSnapshot { snapshot } => {
            let mut service = InvestmentService::new(storage);
            let found = service
                .find_snapshot(&snapshot)
                .ok_or_else(|| DreError::NotFound {
                    entity_type: "Snapshot",
                    identifier: snapshot.clone(),
                })?;

            let deleted = service.delete_snapshot(found.id)?;
            println!(
                "Deleted snapshot for {} {}",
                month_name(deleted.month.month),
                deleted.month.year
            );
        }

        InvestmentCommands::Delete { asset } => {
            let mut service = InvestmentService::new(storage);
            let found = service
                .find_asset(&asset)
                .ok_or_else(|| DreError::asset_not_found(&asset))?;

            let deleted = service.delete_asset(found.id)?;
            println!("Deleted asset: {}", deleted.name);
        }
    }

    Ok(())
}
