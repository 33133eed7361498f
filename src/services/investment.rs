//! Investment service
//!
//! Assets and their monthly snapshots. One snapshot per asset per month;
//! the month's yield is computed from the prior snapshot's closing
//! balance net of the month's cash flows, unless the caller supplies it.

use crate::audit::EntityType;
use crate::error::{DreError, DreResult};
use crate::models::{
    Asset, AssetClass, AssetId, EntityId, InstitutionId, InvestmentSnapshot, Money, MonthYear,
    SnapshotId,
};
use crate::storage::Storage;

/// Service for investment assets and snapshots
pub struct InvestmentService<'a> {
    storage: &'a mut Storage,
}

/// Input for recording a monthly snapshot
#[derive(Debug, Clone)]
pub struct RecordSnapshotInput {
    pub asset_id: AssetId,
    pub month: MonthYear,
    pub closing_balance: Money,
    pub contributions: Money,
    pub withdrawals: Money,
    /// Computed from the prior snapshot when absent
    pub yield_amount: Option<Money>,
}

impl<'a> InvestmentService<'a> {
    /// Create a new investment service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Parse an asset class name
    pub fn parse_class(name: &str) -> DreResult<AssetClass> {
        AssetClass::parse(name).ok_or_else(|| {
            DreError::Validation(format!(
                "Unknown asset class '{}'. Use liquidity, equities, or long_term.",
                name
            ))
        })
    }

    /// Register a new investment asset
    pub fn create_asset(
        &mut self,
        name: &str,
        class: AssetClass,
        institution_id: InstitutionId,
        entity_id: EntityId,
    ) -> DreResult<Asset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation("Asset name cannot be empty".into()));
        }

        if self.storage.ledger.institution(institution_id).is_none() {
            return Err(DreError::institution_not_found(institution_id.to_string()));
        }
        if self.storage.ledger.entity(entity_id).is_none() {
            return Err(DreError::entity_not_found(entity_id.to_string()));
        }

        if self.storage.ledger.asset_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Asset",
                identifier: name.to_string(),
            });
        }

        let asset = Asset::new(name, class, institution_id, entity_id);
        asset
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.assets.push(asset.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Asset,
            asset.id.to_string(),
            Some(asset.name.clone()),
            &asset,
        )?;

        Ok(asset)
    }

    /// Get an asset by ID
    pub fn get_asset(&self, id: AssetId) -> Option<Asset> {
        self.storage.ledger.asset(id).cloned()
    }

    /// Find an asset by name (case-insensitive) or ID string
    pub fn find_asset(&self, identifier: &str) -> Option<Asset> {
        if let Some(asset) = self.storage.ledger.asset_by_name(identifier) {
            return Some(asset.clone());
        }

        if let Some(asset) = self
            .storage
            .ledger
            .assets
            .iter()
            .find(|a| a.id.to_string() == identifier)
        {
            return Some(asset.clone());
        }

        identifier
            .parse::<AssetId>()
            .ok()
            .and_then(|id| self.storage.ledger.asset(id).cloned())
    }

    /// List all assets, sorted by name
    pub fn list_assets(&self) -> Vec<Asset> {
        let mut assets = self.storage.ledger.assets.clone();
        assets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        assets
    }

    /// Delete an asset
    ///
    /// Refused while snapshots still reference it.
    pub fn delete_asset(&mut self, id: AssetId) -> DreResult<Asset> {
        let asset = self
            .storage
            .ledger
            .asset(id)
            .cloned()
            .ok_or_else(|| DreError::asset_not_found(id.to_string()))?;

        let references = self
            .storage
            .ledger
            .investment_snapshots
            .iter()
            .filter(|s| s.asset_id == id)
            .count();
        if references > 0 {
            return Err(DreError::Validation(format!(
                "Cannot delete asset '{}': {} snapshots still reference it",
                asset.name, references
            )));
        }

        self.storage.ledger.remove_asset(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Asset,
            asset.id.to_string(),
            Some(asset.name.clone()),
            &asset,
        )?;

        Ok(asset)
    }

    /// Record a monthly snapshot for an asset
    pub fn record_snapshot(&mut self, input: RecordSnapshotInput) -> DreResult<InvestmentSnapshot> {
        let asset = self
            .storage
            .ledger
            .asset(input.asset_id)
            .cloned()
            .ok_or_else(|| DreError::asset_not_found(input.asset_id.to_string()))?;

        if self
            .storage
            .ledger
            .snapshot_for(input.asset_id, input.month)
            .is_some()
        {
            return Err(DreError::Duplicate {
                entity_type: "Snapshot",
                identifier: format!("{} {}", asset.name, input.month),
            });
        }

        let yield_amount = match input.yield_amount {
            Some(amount) => amount,
            None => {
                let prior_closing = self
                    .storage
                    .ledger
                    .latest_snapshot_before(input.asset_id, input.month)
                    .map(|s| s.closing_balance)
                    .unwrap_or_else(Money::zero);
                InvestmentSnapshot::compute_yield(
                    input.closing_balance,
                    prior_closing,
                    input.contributions,
                    input.withdrawals,
                )
            }
        };

        let snapshot = InvestmentSnapshot::new(
            input.asset_id,
            input.month,
            input.closing_balance,
            input.contributions,
            input.withdrawals,
            yield_amount,
        );
        snapshot
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.investment_snapshots.push(snapshot.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Snapshot,
            snapshot.id.to_string(),
            Some(format!("{} {}", asset.name, snapshot.month)),
            &snapshot,
        )?;

        Ok(snapshot)
    }

    /// Resolve a snapshot from its short display form or full UUID
    pub fn find_snapshot(&self, identifier: &str) -> Option<InvestmentSnapshot> {
        if let Some(snapshot) = self
            .storage
            .ledger
            .investment_snapshots
            .iter()
            .find(|s| s.id.to_string() == identifier)
        {
            return Some(snapshot.clone());
        }

        identifier
            .parse::<SnapshotId>()
            .ok()
            .and_then(|id| self.storage.ledger.snapshot_record(id).cloned())
    }

    /// List snapshots, optionally for one asset, oldest month first
    pub fn list_snapshots(&self, asset_id: Option<AssetId>) -> Vec<InvestmentSnapshot> {
        let mut snapshots: Vec<_> = self
            .storage
            .ledger
            .investment_snapshots
            .iter()
            .filter(|s| asset_id.map_or(true, |id| s.asset_id == id))
            .cloned()
            .collect();
        snapshots.sort_by_key(|s| s.month);
        snapshots
    }

    /// Delete a snapshot
    pub fn delete_snapshot(&mut self, id: SnapshotId) -> DreResult<InvestmentSnapshot> {
        let snapshot = self
            .storage
            .ledger
            .snapshot_record(id)
            .cloned()
            .ok_or_else(|| DreError::NotFound {
                entity_type: "Snapshot",
                identifier: id.to_string(),
            })?;

        self.storage.ledger.remove_snapshot(id);
        self.storage.save()?;

        let asset_name = self
            .storage
            .ledger
            .asset(snapshot.asset_id)
            .map(|a| a.name.clone());
        self.storage.log_delete(
            EntityType::Snapshot,
            snapshot.id.to_string(),
            asset_name.map(|name| format!("{} {}", name, snapshot.month)),
            &snapshot,
        )?;

        Ok(snapshot)
    }
}
