//! Institution service
//!
//! Banks, wallets, and brokers. Bank transactions and investment assets
//! hang off an institution, so deletion is guarded by a reference count.

use crate::audit::EntityType;
use crate::error::{DreError, DreResult};
use crate::models::{EntityId, Institution, InstitutionId, InstitutionKind, Money};
use crate::storage::Storage;

/// Service for institution management
pub struct InstitutionService<'a> {
    storage: &'a mut Storage,
}

impl<'a> InstitutionService<'a> {
    /// Create a new institution service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Create a new institution under an entity
    pub fn create(
        &mut self,
        name: &str,
        kind: InstitutionKind,
        entity_id: EntityId,
        opening_balance: Money,
    ) -> DreResult<Institution> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation(
                "Institution name cannot be empty".into(),
            ));
        }

        if self.storage.ledger.entity(entity_id).is_none() {
            return Err(DreError::entity_not_found(entity_id.to_string()));
        }

        if self.storage.ledger.institution_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Institution",
                identifier: name.to_string(),
            });
        }

        let institution = Institution::new(name, kind, entity_id, opening_balance);
        institution
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.institutions.push(institution.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Institution,
            institution.id.to_string(),
            Some(institution.name.clone()),
            &institution,
        )?;

        Ok(institution)
    }

    /// Get an institution by ID
    pub fn get(&self, id: InstitutionId) -> Option<Institution> {
        self.storage.ledger.institution(id).cloned()
    }

    /// Find an institution by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> Option<Institution> {
        if let Some(institution) = self.storage.ledger.institution_by_name(identifier) {
            return Some(institution.clone());
        }

        if let Some(institution) = self
            .storage
            .ledger
            .institutions
            .iter()
            .find(|i| i.id.to_string() == identifier)
        {
            return Some(institution.clone());
        }

        identifier
            .parse::<InstitutionId>()
            .ok()
            .and_then(|id| self.storage.ledger.institution(id).cloned())
    }

    /// List all institutions, sorted by name
    pub fn list(&self) -> Vec<Institution> {
        let mut institutions = self.storage.ledger.institutions.clone();
        institutions.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        institutions
    }

    /// List institutions belonging to one entity
    pub fn list_for_entity(&self, entity_id: EntityId) -> Vec<Institution> {
        let mut institutions: Vec<_> = self
            .storage
            .ledger
            .institutions
            .iter()
            .filter(|i| i.entity_id == entity_id)
            .cloned()
            .collect();
        institutions.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        institutions
    }

    /// Current balance: opening balance plus every signed bank movement
    pub fn current_balance(&self, id: InstitutionId) -> Money {
        let opening = self
            .storage
            .ledger
            .institution(id)
            .map(|i| i.opening_balance)
            .unwrap_or_else(Money::zero);
        let movements: Money = self
            .storage
            .ledger
            .bank_transactions
            .iter()
            .filter(|t| t.institution_id == id)
            .map(|t| t.signed_amount())
            .sum();
        opening + movements
    }

    /// Update an institution's name and/or opening balance
    pub fn update(
        &mut self,
        id: InstitutionId,
        name: Option<&str>,
        opening_balance: Option<Money>,
    ) -> DreResult<Institution> {
        let before = self
            .storage
            .ledger
            .institution(id)
            .cloned()
            .ok_or_else(|| DreError::institution_not_found(id.to_string()))?;

        let mut after = before.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(DreError::Validation(
                    "Institution name cannot be empty".into(),
                ));
            }
            if let Some(existing) = self.storage.ledger.institution_by_name(new_name) {
                if existing.id != id {
                    return Err(DreError::Duplicate {
                        entity_type: "Institution",
                        identifier: new_name.to_string(),
                    });
                }
            }
            after.name = new_name.to_string();
        }

        if let Some(balance) = opening_balance {
            after.opening_balance = balance;
        }

        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(institution) = self.storage.ledger.institution_mut(id) {
            *institution = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Institution,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete an institution
    ///
    /// Refused while bank transactions or assets still reference it.
    pub fn delete(&mut self, id: InstitutionId) -> DreResult<Institution> {
        let institution = self
            .storage
            .ledger
            .institution(id)
            .cloned()
            .ok_or_else(|| DreError::institution_not_found(id.to_string()))?;

        let references = self
            .storage
            .ledger
            .bank_transactions
            .iter()
            .filter(|t| t.institution_id == id)
            .count()
            + self
                .storage
                .ledger
                .assets
                .iter()
                .filter(|a| a.institution_id == id)
                .count();
        if references > 0 {
            return Err(DreError::Validation(format!(
                "Cannot delete institution '{}': {} records still reference it",
                institution.name, references
            )));
        }

        self.storage.ledger.remove_institution(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Institution,
            institution.id.to_string(),
            Some(institution.name.clone()),
            &institution,
        )?;

        Ok(institution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DrePaths;
    use crate::models::{BankTransaction, Direction, Entity, EntityKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, EntityId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::open(paths).unwrap();

        let entity = Entity::new("Household", EntityKind::Personal);
        let entity_id = entity.id;
        storage.ledger.entities.push(entity);

        (temp_dir, storage, entity_id)
    }

    #[test]
    fn test_create_institution() {
        let (_temp_dir, mut storage, entity_id) = create_test_storage();
        let mut service = InstitutionService::new(&mut storage);

        let institution = service
            .create(
                "Checking",
                InstitutionKind::Bank,
                entity_id,
                Money::from_units(1_000),
            )
            .unwrap();

        assert_eq!(institution.name, "Checking");
        assert_eq!(institution.opening_balance, Money::from_units(1_000));
    }

    #[test]
    fn test_create_with_unknown_entity() {
        let (_temp_dir, mut storage, _entity_id) = create_test_storage();
        let mut service = InstitutionService::new(&mut storage);

        let result = service.create(
            "Checking",
            InstitutionKind::Bank,
            EntityId::new(),
            Money::zero(),
        );
        assert!(matches!(result, Err(DreError::NotFound { .. })));
    }

    #[test]
    fn test_duplicate_name_refused() {
        let (_temp_dir, mut storage, entity_id) = create_test_storage();
        let mut service = InstitutionService::new(&mut storage);

        service
            .create("Checking", InstitutionKind::Bank, entity_id, Money::zero())
            .unwrap();
        let result = service.create("CHECKING", InstitutionKind::Wallet, entity_id, Money::zero());
        assert!(matches!(result, Err(DreError::Duplicate { .. })));
    }

    #[test]
    fn test_update_opening_balance() {
        let (_temp_dir, mut storage, entity_id) = create_test_storage();
        let mut service = InstitutionService::new(&mut storage);

        let institution = service
            .create("Checking", InstitutionKind::Bank, entity_id, Money::zero())
            .unwrap();

        let updated = service
            .update(institution.id, None, Some(Money::from_units(500)))
            .unwrap();
        assert_eq!(updated.opening_balance, Money::from_units(500));
        assert_eq!(updated.name, "Checking");
    }

    #[test]
    fn test_current_balance_includes_movements() {
        let (_temp_dir, mut storage, entity_id) = create_test_storage();

        let institution = {
            let mut service = InstitutionService::new(&mut storage);
            service
                .create(
                    "Checking",
                    InstitutionKind::Bank,
                    entity_id,
                    Money::from_units(1_000),
                )
                .unwrap()
        };

        storage.ledger.bank_transactions.push(BankTransaction::new(
            entity_id,
            institution.id,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            Direction::In,
            Money::from_units(250),
        ));
        storage.ledger.bank_transactions.push(BankTransaction::new(
            entity_id,
            institution.id,
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            Direction::Out,
            Money::from_units(100),
        ));

        let service = InstitutionService::new(&mut storage);
        assert_eq!(
            service.current_balance(institution.id),
            Money::from_units(1_150)
        );
    }

    #[test]
    fn test_delete_with_transactions_refused() {
        let (_temp_dir, mut storage, entity_id) = create_test_storage();

        let institution = {
            let mut service = InstitutionService::new(&mut storage);
            service
                .create("Checking", InstitutionKind::Bank, entity_id, Money::zero())
                .unwrap()
        };

        storage.ledger.bank_transactions.push(BankTransaction::new(
            entity_id,
            institution.id,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            Direction::In,
            Money::from_units(100),
        ));

        let mut service = InstitutionService::new(&mut storage);
        let result = service.delete(institution.id);
        assert!(matches!(result, Err(DreError::Validation(_))));
    }

    #[test]
    fn test_delete_unreferenced() {
        let (_temp_dir, mut storage, entity_id) = create_test_storage();
        let mut service = InstitutionService::new(&mut storage);

        let institution = service
            .create("Wallet", InstitutionKind::Wallet, entity_id, Money::zero())
            .unwrap();
        service.delete(institution.id).unwrap();
        assert!(service.get(institution.id).is_none());
    }
}
