//! Credit card service
//!
//! Card management plus purchase recording. A purchase of N installments
//! expands into N records sharing a purchase group: the cents split
//! evenly with the remainder on installment 1, installment i lands on the
//! invoice of purchase month + (i - 1), and only installment 1 carries
//! the full purchase value (the accrual view reads exactly that record).

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{DreError, DreResult};
use crate::models::{
    CardId, CardNetwork, CardTransaction, CardTransactionId, CardTransactionStatus, CategoryId,
    CreditCard, EntityId, Money, MonthYear, PurchaseGroupId,
};
use crate::storage::Storage;

/// Service for credit card management
pub struct CardService<'a> {
    storage: &'a mut Storage,
}

/// Input for recording a card purchase
#[derive(Debug, Clone)]
pub struct RecordPurchaseInput {
    pub card_id: CardId,
    pub purchase_date: NaiveDate,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub total: Money,
    pub installments: u32,
}

impl<'a> CardService<'a> {
    /// Create a new card service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Parse a card network name
    pub fn parse_network(name: &str) -> DreResult<CardNetwork> {
        CardNetwork::parse(name).ok_or_else(|| {
            DreError::Validation(format!(
                "Unknown card network '{}'. Use visa, mastercard, elo, amex, or other.",
                name
            ))
        })
    }

    /// Register a new credit card
    pub fn create_card(
        &mut self,
        name: &str,
        network: CardNetwork,
        entity_id: EntityId,
        closing_day: u32,
        due_day: u32,
        limit: Money,
    ) -> DreResult<CreditCard> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation("Card name cannot be empty".into()));
        }

        if self.storage.ledger.entity(entity_id).is_none() {
            return Err(DreError::entity_not_found(entity_id.to_string()));
        }

        if self.storage.ledger.card_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Card",
                identifier: name.to_string(),
            });
        }

        let card = CreditCard::new(name, network, entity_id, closing_day, due_day, limit);
        card.validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.cards.push(card.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;

        Ok(card)
    }

    /// Get a card by ID
    pub fn get_card(&self, id: CardId) -> Option<CreditCard> {
        self.storage.ledger.card(id).cloned()
    }

    /// Find a card by name (case-insensitive) or ID string
    pub fn find_card(&self, identifier: &str) -> Option<CreditCard> {
        if let Some(card) = self.storage.ledger.card_by_name(identifier) {
            return Some(card.clone());
        }

        if let Some(card) = self
            .storage
            .ledger
            .cards
            .iter()
            .find(|c| c.id.to_string() == identifier)
        {
            return Some(card.clone());
        }

        identifier
            .parse::<CardId>()
            .ok()
            .and_then(|id| self.storage.ledger.card(id).cloned())
    }

    /// List all cards, sorted by name
    pub fn list_cards(&self) -> Vec<CreditCard> {
        let mut cards = self.storage.ledger.cards.clone();
        cards.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        cards
    }

    /// Delete a card
    ///
    /// Refused while purchases still reference it.
    pub fn delete_card(&mut self, id: CardId) -> DreResult<CreditCard> {
        let card = self
            .storage
            .ledger
            .card(id)
            .cloned()
            .ok_or_else(|| DreError::card_not_found(id.to_string()))?;

        let references = self
            .storage
            .ledger
            .card_transactions
            .iter()
            .filter(|t| t.card_id == id)
            .count();
        if references > 0 {
            return Err(DreError::Validation(format!(
                "Cannot delete card '{}': {} installment records still reference it",
                card.name, references
            )));
        }

        self.storage.ledger.remove_card(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;

        Ok(card)
    }

    /// Record a purchase, expanding it into its installment schedule
    pub fn record_purchase(&mut self, input: RecordPurchaseInput) -> DreResult<Vec<CardTransaction>> {
        if self.storage.ledger.card(input.card_id).is_none() {
            return Err(DreError::card_not_found(input.card_id.to_string()));
        }
        if let Some(category_id) = input.category_id {
            if self.storage.ledger.category(category_id).is_none() {
                return Err(DreError::category_not_found(category_id.to_string()));
            }
        }
        if input.installments == 0 {
            return Err(DreError::Validation(
                "Installment count must be at least 1".into(),
            ));
        }

        let description = input.description.trim().to_string();
        let installments = self.expand_purchase(&input, description);

        for installment in &installments {
            installment
                .validate()
                .map_err(|e| DreError::Validation(e.to_string()))?;
        }

        self.storage
            .ledger
            .card_transactions
            .extend(installments.iter().cloned());
        self.storage.save()?;

        let entries: Vec<AuditEntry> = installments
            .iter()
            .map(|t| {
                AuditEntry::create(
                    EntityType::CardTransaction,
                    t.id.to_string(),
                    Some(format!("{} {}", t.description, t.installment_label()).trim().to_string()),
                    t,
                )
            })
            .collect();
        self.storage.audit().log_batch(&entries)?;

        Ok(installments)
    }

    /// Build the installment records for one purchase
    fn expand_purchase(
        &self,
        input: &RecordPurchaseInput,
        description: String,
    ) -> Vec<CardTransaction> {
        if input.installments == 1 {
            return vec![CardTransaction::single(
                input.card_id,
                input.purchase_date,
                description,
                input.category_id,
                input.total,
            )];
        }

        let group = PurchaseGroupId::new();
        let purchase_month = MonthYear::from_date(input.purchase_date);
        let slices = input.total.split_even(input.installments);

        slices
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                let index = i as u32 + 1;
                let mut installment = CardTransaction::single(
                    input.card_id,
                    input.purchase_date,
                    description.clone(),
                    input.category_id,
                    amount,
                );
                installment.purchase_group = group;
                installment.invoice_month = purchase_month.shift(i as i32);
                installment.installment_index = index;
                installment.installment_count = input.installments;
                installment.total_purchase_amount = if index == 1 {
                    input.total
                } else {
                    Money::zero()
                };
                installment
            })
            .collect()
    }

    /// All installments of one purchase, in installment order
    pub fn purchase(&self, group: PurchaseGroupId) -> Vec<CardTransaction> {
        self.storage
            .ledger
            .purchase_installments(group)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Resolve a purchase group from its short display form or full UUID
    pub fn find_purchase(&self, identifier: &str) -> Option<PurchaseGroupId> {
        if let Some(txn) = self
            .storage
            .ledger
            .card_transactions
            .iter()
            .find(|t| t.purchase_group.to_string() == identifier)
        {
            return Some(txn.purchase_group);
        }

        identifier
            .parse::<PurchaseGroupId>()
            .ok()
            .filter(|group| !self.storage.ledger.purchase_installments(*group).is_empty())
    }

    /// Get a single installment record by ID
    pub fn get_installment(&self, id: CardTransactionId) -> Option<CardTransaction> {
        self.storage.ledger.card_transaction(id).cloned()
    }

    /// List installment records, optionally per card and/or invoice month,
    /// ordered by invoice month then purchase date
    pub fn list_purchases(
        &self,
        card_id: Option<CardId>,
        invoice_month: Option<MonthYear>,
    ) -> Vec<CardTransaction> {
        let mut purchases: Vec<_> = self
            .storage
            .ledger
            .card_transactions
            .iter()
            .filter(|t| card_id.map_or(true, |id| t.card_id == id))
            .filter(|t| invoice_month.map_or(true, |m| t.invoice_month == m))
            .cloned()
            .collect();

        purchases.sort_by(|a, b| {
            a.invoice_month
                .cmp(&b.invoice_month)
                .then_with(|| a.purchase_date.cmp(&b.purchase_date))
                .then_with(|| a.installment_index.cmp(&b.installment_index))
        });

        purchases
    }

    /// Assign every installment of a purchase to a category
    pub fn classify_purchase(
        &mut self,
        group: PurchaseGroupId,
        category_id: Option<CategoryId>,
    ) -> DreResult<usize> {
        if let Some(category_id) = category_id {
            if self.storage.ledger.category(category_id).is_none() {
                return Err(DreError::category_not_found(category_id.to_string()));
            }
        }

        let ids: Vec<CardTransactionId> = self
            .storage
            .ledger
            .purchase_installments(group)
            .iter()
            .map(|t| t.id)
            .collect();
        if ids.is_empty() {
            return Err(DreError::NotFound {
                entity_type: "Purchase",
                identifier: group.to_string(),
            });
        }

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let before = match self.storage.ledger.card_transaction(id) {
                Some(t) => t.clone(),
                None => continue,
            };
            let mut after = before.clone();
            after.category_id = category_id;
            if let Some(txn) = self.storage.ledger.card_transaction_mut(id) {
                *txn = after.clone();
            }
            entries.push(AuditEntry::update(
                EntityType::CardTransaction,
                id.to_string(),
                Some(after.description.clone()),
                &before,
                &after,
            ));
        }

        self.storage.save()?;
        self.storage.audit().log_batch(&entries)?;

        Ok(entries.len())
    }

    /// Mark every open installment on one card's invoice month as paid,
    /// returning how many changed
    pub fn mark_invoice_paid(&mut self, card_id: CardId, month: MonthYear) -> DreResult<usize> {
        if self.storage.ledger.card(card_id).is_none() {
            return Err(DreError::card_not_found(card_id.to_string()));
        }

        let ids: Vec<CardTransactionId> = self
            .storage
            .ledger
            .card_transactions
            .iter()
            .filter(|t| t.card_id == card_id && t.invoice_month == month && t.status.is_open())
            .map(|t| t.id)
            .collect();

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let before = match self.storage.ledger.card_transaction(id) {
                Some(t) => t.clone(),
                None => continue,
            };
            let mut after = before.clone();
            after.status = CardTransactionStatus::Paid;
            if let Some(txn) = self.storage.ledger.card_transaction_mut(id) {
                *txn = after.clone();
            }
            entries.push(AuditEntry::update(
                EntityType::CardTransaction,
                id.to_string(),
                Some(after.description.clone()),
                &before,
                &after,
            ));
        }

        self.storage.save()?;
        self.storage.audit().log_batch(&entries)?;

        Ok(entries.len())
    }

    /// Delete a whole purchase (every installment of its group)
    pub fn delete_purchase(&mut self, group: PurchaseGroupId) -> DreResult<usize> {
        let removed: Vec<CardTransaction> = self
            .storage
            .ledger
            .purchase_installments(group)
            .into_iter()
            .cloned()
            .collect();
        if removed.is_empty() {
            return Err(DreError::NotFound {
                entity_type: "Purchase",
                identifier: group.to_string(),
            });
        }

        self.storage.ledger.remove_purchase(group);
        self.storage.save()?;

        let entries: Vec<AuditEntry> = removed
            .iter()
            .map(|t| {
                AuditEntry::delete(
                    EntityType::CardTransaction,
                    t.id.to_string(),
                    Some(format!("{} {}", t.description, t.installment_label()).trim().to_string()),
                    t,
                )
            })
            .collect();
        self.storage.audit().log_batch(&entries)?;

        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DrePaths;
    use crate::models::{Category, CategoryKind, Entity, EntityKind, ReportGroup};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, EntityId, CategoryId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::open(paths).unwrap();

        let entity = Entity::new("Household", EntityKind::Personal);
        let category = Category::new("Travel", ReportGroup::ComfortCost, CategoryKind::Expense);
        let (entity_id, category_id) = (entity.id, category.id);
        storage.ledger.entities.push(entity);
        storage.ledger.categories.push(category);

        (temp_dir, storage, entity_id, category_id)
    }

    fn test_card(service: &mut CardService<'_>, entity_id: EntityId) -> CreditCard {
        service
            .create_card(
                "Black card",
                CardNetwork::Visa,
                entity_id,
                5,
                15,
                Money::from_units(10_000),
            )
            .unwrap()
    }

    fn purchase_input(
        card_id: CardId,
        category_id: Option<CategoryId>,
        total: Money,
        installments: u32,
    ) -> RecordPurchaseInput {
        RecordPurchaseInput {
            card_id,
            purchase_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            description: "Flight tickets".to_string(),
            category_id,
            total,
            installments,
        }
    }

    #[test]
    fn test_create_card() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);

        let card = test_card(&mut service, entity_id);
        assert_eq!(card.name, "Black card");
        assert_eq!(card.closing_day, 5);
    }

    #[test]
    fn test_duplicate_card_name_refused() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);

        test_card(&mut service, entity_id);
        let result = service.create_card(
            "black card",
            CardNetwork::Mastercard,
            entity_id,
            1,
            10,
            Money::zero(),
        );
        assert!(matches!(result, Err(DreError::Duplicate { .. })));
    }

    #[test]
    fn test_single_installment_purchase() {
        let (_temp_dir, mut storage, entity_id, category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        let records = service
            .record_purchase(purchase_input(
                card.id,
                Some(category_id),
                Money::from_units(200),
                1,
            ))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, Money::from_units(200));
        assert_eq!(records[0].total_purchase_amount, Money::from_units(200));
        assert_eq!(records[0].invoice_month, MonthYear::new(1, 2026));
        assert_eq!(records[0].installment_label(), "");
    }

    #[test]
    fn test_installment_expansion() {
        let (_temp_dir, mut storage, entity_id, category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        let records = service
            .record_purchase(purchase_input(
                card.id,
                Some(category_id),
                Money::from_units(1_200),
                12,
            ))
            .unwrap();

        assert_eq!(records.len(), 12);

        // Even split, full value on the first record only
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.amount, Money::from_units(100));
            assert_eq!(record.installment_index, i as u32 + 1);
            assert_eq!(record.installment_count, 12);
            assert_eq!(record.invoice_month, MonthYear::new(1, 2026).shift(i as i32));
            assert_eq!(record.purchase_group, records[0].purchase_group);
            if i == 0 {
                assert_eq!(record.total_purchase_amount, Money::from_units(1_200));
            } else {
                assert!(record.total_purchase_amount.is_zero());
            }
            assert!(record.validate().is_ok());
        }

        // Last invoice lands in December
        assert_eq!(records[11].invoice_month, MonthYear::new(12, 2026));
    }

    #[test]
    fn test_uneven_split_remainder_on_first() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        let records = service
            .record_purchase(purchase_input(card.id, None, Money::from_units(1_000), 3))
            .unwrap();

        assert_eq!(records[0].amount, Money::from_cents(33_334));
        assert_eq!(records[1].amount, Money::from_cents(33_333));
        assert_eq!(records[2].amount, Money::from_cents(33_333));

        let sum: Money = records.iter().map(|r| r.amount).sum();
        assert_eq!(sum, Money::from_units(1_000));
    }

    #[test]
    fn test_purchase_with_unknown_card() {
        let (_temp_dir, mut storage, _entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);

        let result = service.record_purchase(purchase_input(
            CardId::new(),
            None,
            Money::from_units(100),
            1,
        ));
        assert!(matches!(result, Err(DreError::NotFound { .. })));
    }

    #[test]
    fn test_zero_installments_refused() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        let result =
            service.record_purchase(purchase_input(card.id, None, Money::from_units(100), 0));
        assert!(matches!(result, Err(DreError::Validation(_))));
    }

    #[test]
    fn test_delete_purchase_removes_schedule() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        let records = service
            .record_purchase(purchase_input(card.id, None, Money::from_units(600), 6))
            .unwrap();
        let group = records[0].purchase_group;

        let removed = service.delete_purchase(group).unwrap();
        assert_eq!(removed, 6);
        assert!(service.purchase(group).is_empty());
    }

    #[test]
    fn test_mark_invoice_paid() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        service
            .record_purchase(purchase_input(card.id, None, Money::from_units(300), 3))
            .unwrap();

        let paid = service
            .mark_invoice_paid(card.id, MonthYear::new(1, 2026))
            .unwrap();
        assert_eq!(paid, 1);

        let january = service.list_purchases(Some(card.id), Some(MonthYear::new(1, 2026)));
        assert!(january.iter().all(|t| !t.status.is_open()));

        let february = service.list_purchases(Some(card.id), Some(MonthYear::new(2, 2026)));
        assert!(february.iter().all(|t| t.status.is_open()));

        // Second run is a no-op
        let again = service
            .mark_invoice_paid(card.id, MonthYear::new(1, 2026))
            .unwrap();
        assert_eq!(again, 0);
    }

    #[test]
    fn test_classify_purchase_applies_to_all_installments() {
        let (_temp_dir, mut storage, entity_id, category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        let records = service
            .record_purchase(purchase_input(card.id, None, Money::from_units(400), 4))
            .unwrap();
        let group = records[0].purchase_group;

        let updated = service.classify_purchase(group, Some(category_id)).unwrap();
        assert_eq!(updated, 4);
        assert!(service
            .purchase(group)
            .iter()
            .all(|t| t.category_id == Some(category_id)));
    }

    #[test]
    fn test_delete_card_with_purchases_refused() {
        let (_temp_dir, mut storage, entity_id, _category_id) = create_test_storage();
        let mut service = CardService::new(&mut storage);
        let card = test_card(&mut service, entity_id);

        service
            .record_purchase(purchase_input(card.id, None, Money::from_units(100), 1))
            .unwrap();

        let result = service.delete_card(card.id);
        assert!(matches!(result, Err(DreError::Validation(_))));
    }
}
