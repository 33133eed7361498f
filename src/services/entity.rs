//! Entity service
//!
//! Owner entities partition the ledger: every institution, card, asset,
//! fixed asset, and liability belongs to exactly one. Deleting an entity
//! is refused while anything still references it.

use crate::audit::EntityType;
use crate::error::{DreError, DreResult};
use crate::models::{Entity, EntityId, EntityKind};
use crate::storage::Storage;

/// Service for owner entity management
pub struct EntityService<'a> {
    storage: &'a mut Storage,
}

impl<'a> EntityService<'a> {
    /// Create a new entity service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Create a new entity
    pub fn create(&mut self, name: &str, kind: EntityKind) -> DreResult<Entity> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation("Entity name cannot be empty".into()));
        }

        if self.storage.ledger.entity_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Entity",
                identifier: name.to_string(),
            });
        }

        let entity = Entity::new(name, kind);
        entity
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.entities.push(entity.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Entity,
            entity.id.to_string(),
            Some(entity.name.clone()),
            &entity,
        )?;

        Ok(entity)
    }

    /// Get an entity by ID
    pub fn get(&self, id: EntityId) -> Option<Entity> {
        self.storage.ledger.entity(id).cloned()
    }

    /// Find an entity by name (case-insensitive) or ID string
    ///
    /// Accepts the short prefixed form list output prints as well as a
    /// full UUID.
    pub fn find(&self, identifier: &str) -> Option<Entity> {
        if let Some(entity) = self.storage.ledger.entity_by_name(identifier) {
            return Some(entity.clone());
        }

        if let Some(entity) = self
            .storage
            .ledger
            .entities
            .iter()
            .find(|e| e.id.to_string() == identifier)
        {
            return Some(entity.clone());
        }

        identifier
            .parse::<EntityId>()
            .ok()
            .and_then(|id| self.storage.ledger.entity(id).cloned())
    }

    /// List all entities, sorted by name
    pub fn list(&self) -> Vec<Entity> {
        let mut entities = self.storage.ledger.entities.clone();
        entities.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        entities
    }

    /// Rename an entity
    pub fn rename(&mut self, id: EntityId, name: &str) -> DreResult<Entity> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation("Entity name cannot be empty".into()));
        }

        if let Some(existing) = self.storage.ledger.entity_by_name(name) {
            if existing.id != id {
                return Err(DreError::Duplicate {
                    entity_type: "Entity",
                    identifier: name.to_string(),
                });
            }
        }

        let before = self
            .storage
            .ledger
            .entity(id)
            .cloned()
            .ok_or_else(|| DreError::entity_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.name = name.to_string();
        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(entity) = self.storage.ledger.entity_mut(id) {
            *entity = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Entity,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete an entity
    ///
    /// Refused while institutions, cards, assets, transactions, fixed
    /// assets, or liabilities still reference it.
    pub fn delete(&mut self, id: EntityId) -> DreResult<Entity> {
        let entity = self
            .storage
            .ledger
            .entity(id)
            .cloned()
            .ok_or_else(|| DreError::entity_not_found(id.to_string()))?;

        let references = self.reference_count(id);
        if references > 0 {
            return Err(DreError::Validation(format!(
                "Cannot delete entity '{}': {} records still reference it",
                entity.name, references
            )));
        }

        self.storage.ledger.remove_entity(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Entity,
            entity.id.to_string(),
            Some(entity.name.clone()),
            &entity,
        )?;

        Ok(entity)
    }

    /// How many records point at this entity
    fn reference_count(&self, id: EntityId) -> usize {
        let ledger = &self.storage.ledger;
        ledger
            .institutions
            .iter()
            .filter(|i| i.entity_id == id)
            .count()
            + ledger.cards.iter().filter(|c| c.entity_id == id).count()
            + ledger.assets.iter().filter(|a| a.entity_id == id).count()
            + ledger
                .bank_transactions
                .iter()
                .filter(|t| t.entity_id == id)
                .count()
            + ledger
                .fixed_assets
                .iter()
                .filter(|f| f.entity_id == id)
                .count()
            + ledger
                .liabilities
                .iter()
                .filter(|l| l.entity_id == id)
                .count()
    }
}
