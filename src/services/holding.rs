//! Fixed asset and liability services
//!
//! The non-financial sides of net worth. Fixed assets are revalued by
//! updating their market value; liabilities are amortized by updating
//! the outstanding balance.

use crate::audit::EntityType;
use crate::error::{DreError, DreResult};
use crate::models::{
    EntityId, FixedAsset, FixedAssetId, FixedAssetKind, Liability, LiabilityId, LiabilityKind,
    Money,
};
use crate::storage::Storage;

/// Service for fixed assets
pub struct FixedAssetService<'a> {
    storage: &'a mut Storage,
}

impl<'a> FixedAssetService<'a> {
    /// Create a new fixed asset service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Parse a fixed asset kind name
    pub fn parse_kind(name: &str) -> DreResult<FixedAssetKind> {
        FixedAssetKind::parse(name).ok_or_else(|| {
            DreError::Validation(format!(
                "Unknown fixed asset kind '{}'. Use property, vehicle, stake, equipment, or other.",
                name
            ))
        })
    }

    /// Register a fixed asset
    pub fn create(
        &mut self,
        name: &str,
        kind: FixedAssetKind,
        entity_id: EntityId,
        acquisition_value: Money,
        market_value: Money,
    ) -> DreResult<FixedAsset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation(
                "Fixed asset name cannot be empty".into(),
            ));
        }

        if self.storage.ledger.entity(entity_id).is_none() {
            return Err(DreError::entity_not_found(entity_id.to_string()));
        }

        if self.storage.ledger.fixed_asset_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Fixed asset",
                identifier: name.to_string(),
            });
        }

        let asset = FixedAsset::new(name, kind, entity_id, acquisition_value, market_value);
        asset
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.fixed_assets.push(asset.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::FixedAsset,
            asset.id.to_string(),
            Some(asset.name.clone()),
            &asset,
        )?;

        Ok(asset)
    }

    /// Find a fixed asset by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> Option<FixedAsset> {
        if let Some(asset) = self.storage.ledger.fixed_asset_by_name(identifier) {
            return Some(asset.clone());
        }

        if let Some(asset) = self
            .storage
            .ledger
            .fixed_assets
            .iter()
            .find(|a| a.id.to_string() == identifier)
        {
            return Some(asset.clone());
        }

        identifier
            .parse::<FixedAssetId>()
            .ok()
            .and_then(|id| self.storage.ledger.fixed_asset(id).cloned())
    }

    /// List all fixed assets, sorted by name
    pub fn list(&self) -> Vec<FixedAsset> {
        let mut assets = self.storage.ledger.fixed_assets.clone();
        assets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        assets
    }

    /// Update a fixed asset's market value
    pub fn revalue(&mut self, id: FixedAssetId, market_value: Money) -> DreResult<FixedAsset> {
        let before = self
            .storage
            .ledger
            .fixed_asset(id)
            .cloned()
            .ok_or_else(|| DreError::NotFound {
                entity_type: "Fixed asset",
                identifier: id.to_string(),
            })?;

        let mut after = before.clone();
        after.market_value = market_value;
        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(asset) = self.storage.ledger.fixed_asset_mut(id) {
            *asset = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::FixedAsset,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete a fixed asset
    pub fn delete(&mut self, id: FixedAssetId) -> DreResult<FixedAsset> {
        let asset = self
            .storage
            .ledger
            .fixed_asset(id)
            .cloned()
            .ok_or_else(|| DreError::NotFound {
                entity_type: "Fixed asset",
                identifier: id.to_string(),
            })?;

        self.storage.ledger.remove_fixed_asset(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::FixedAsset,
            asset.id.to_string(),
            Some(asset.name.clone()),
            &asset,
        )?;

        Ok(asset)
    }
}

/// Service for liabilities
pub struct LiabilityService<'a> {
    storage: &'a mut Storage,
}

impl<'a> LiabilityService<'a> {
    /// Create a new liability service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Parse a liability kind name
    pub fn parse_kind(name: &str) -> DreResult<LiabilityKind> {
        LiabilityKind::parse(name).ok_or_else(|| {
            DreError::Validation(format!(
                "Unknown liability kind '{}'. Use financing, loan, installment, or other.",
                name
            ))
        })
    }

    /// Register a liability
    pub fn create(
        &mut self,
        name: &str,
        kind: LiabilityKind,
        entity_id: EntityId,
        outstanding_balance: Money,
    ) -> DreResult<Liability> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation(
                "Liability name cannot be empty".into(),
            ));
        }

        if self.storage.ledger.entity(entity_id).is_none() {
            return Err(DreError::entity_not_found(entity_id.to_string()));
        }

        if self.storage.ledger.liability_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Liability",
                identifier: name.to_string(),
            });
        }

        let liability = Liability::new(name, kind, entity_id, outstanding_balance);
        liability
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.liabilities.push(liability.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Liability,
            liability.id.to_string(),
            Some(liability.name.clone()),
            &liability,
        )?;

        Ok(liability)
    }

    /// Find a liability by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> Option<Liability> {
        if let Some(liability) = self.storage.ledger.liability_by_name(identifier) {
            return Some(liability.clone());
        }

        if let Some(liability) = self
            .storage
            .ledger
            .liabilities
            .iter()
            .find(|l| l.id.to_string() == identifier)
        {
            return Some(liability.clone());
        }

        identifier
            .parse::<LiabilityId>()
            .ok()
            .and_then(|id| self.storage.ledger.liability(id).cloned())
    }

    /// List all liabilities, sorted by name
    pub fn list(&self) -> Vec<Liability> {
        let mut liabilities = self.storage.ledger.liabilities.clone();
        liabilities.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        liabilities
    }

    /// Update a liability's outstanding balance
    pub fn set_balance(&mut self, id: LiabilityId, balance: Money) -> DreResult<Liability> {
        let before = self
            .storage
            .ledger
            .liability(id)
            .cloned()
            .ok_or_else(|| DreError::NotFound {
                entity_type: "Liability",
                identifier: id.to_string(),
            })?;

        let mut after = before.clone();
        after.outstanding_balance = balance;
        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(liability) = self.storage.ledger.liability_mut(id) {
            *liability = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Liability,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete a liability
    pub fn delete(&mut self, id: LiabilityId) -> DreResult<Liability> {
        let liability = self
            .storage
            .ledger
            .liability(id)
            .cloned()
            .ok_or_else(|| DreError::NotFound {
                entity_type: "Liability",
                identifier: id.to_string(),
            })?;

        self.storage.ledger.remove_liability(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Liability,
            liability.id.to_string(),
            Some(liability.name.clone()),
            &liability,
        )?;

        Ok(liability)
    }
}
