//! Bank transaction service
//!
//! CRUD plus classification for bank movements. Reference checks happen
//! here (entity, institution, category), so the aggregation engine can
//! treat whatever it finds in the ledger as best-effort input.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{DreError, DreResult};
use crate::models::{
    BankTransaction, CategoryId, Direction, EntityId, InstitutionId, LineKind, Money, ReportWindow,
    TransactionId,
};
use crate::storage::Storage;

/// Service for bank transaction management
pub struct TransactionService<'a> {
    storage: &'a mut Storage,
}

/// Input for creating a new bank transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub entity_id: EntityId,
    pub institution_id: InstitutionId,
    pub date: NaiveDate,
    pub direction: Direction,
    pub amount: Money,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub line_kind: Option<LineKind>,
    pub cash_date: Option<NaiveDate>,
    pub accrual_date: Option<NaiveDate>,
}

/// Options for filtering transaction listings
///
/// Listings filter on the posting date; cash/accrual recognition is the
/// statement engine's concern, not the ledger view's.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub window: Option<ReportWindow>,
    pub institution_id: Option<InstitutionId>,
    pub category_id: Option<CategoryId>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by report window
    pub fn window(mut self, window: ReportWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Filter by institution
    pub fn institution(mut self, institution_id: InstitutionId) -> Self {
        self.institution_id = Some(institution_id);
        self
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Create a new bank transaction
    pub fn create(&mut self, input: CreateTransactionInput) -> DreResult<BankTransaction> {
        if self.storage.ledger.entity(input.entity_id).is_none() {
            return Err(DreError::entity_not_found(input.entity_id.to_string()));
        }
        if self.storage.ledger.institution(input.institution_id).is_none() {
            return Err(DreError::institution_not_found(
                input.institution_id.to_string(),
            ));
        }
        if let Some(category_id) = input.category_id {
            if self.storage.ledger.category(category_id).is_none() {
                return Err(DreError::category_not_found(category_id.to_string()));
            }
        }

        let mut txn = BankTransaction::new(
            input.entity_id,
            input.institution_id,
            input.date,
            input.direction,
            input.amount,
        );
        txn.category_id = input.category_id;
        txn.cash_date = input.cash_date;
        txn.accrual_date = input.accrual_date;
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(line_kind) = input.line_kind {
            txn.set_line_kind(line_kind);
        }

        txn.validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.bank_transactions.push(txn.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Option<BankTransaction> {
        self.storage.ledger.bank_transaction(id).cloned()
    }

    /// Find a transaction by ID string (short display form or full UUID)
    pub fn find(&self, identifier: &str) -> Option<BankTransaction> {
        if let Some(txn) = self
            .storage
            .ledger
            .bank_transactions
            .iter()
            .find(|t| t.id.to_string() == identifier)
        {
            return Some(txn.clone());
        }

        identifier
            .parse::<TransactionId>()
            .ok()
            .and_then(|id| self.storage.ledger.bank_transaction(id).cloned())
    }

    /// List transactions, newest first, with optional filtering
    pub fn list(&self, filter: TransactionFilter) -> Vec<BankTransaction> {
        let mut transactions: Vec<_> = self
            .storage
            .ledger
            .bank_transactions
            .iter()
            .filter(|t| {
                filter
                    .window
                    .map_or(true, |w| w.contains(Some(t.date)))
            })
            .filter(|t| {
                filter
                    .institution_id
                    .map_or(true, |id| t.institution_id == id)
            })
            .filter(|t| filter.category_id.map_or(true, |id| t.category_id == Some(id)))
            .cloned()
            .collect();

        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        transactions
    }

    /// Update a transaction's core fields
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        id: TransactionId,
        date: Option<NaiveDate>,
        direction: Option<Direction>,
        amount: Option<Money>,
        description: Option<String>,
        cash_date: Option<Option<NaiveDate>>,
        accrual_date: Option<Option<NaiveDate>>,
    ) -> DreResult<BankTransaction> {
        let before = self
            .storage
            .ledger
            .bank_transaction(id)
            .cloned()
            .ok_or_else(|| DreError::transaction_not_found(id.to_string()))?;

        let mut after = before.clone();

        if let Some(new_date) = date {
            after.date = new_date;
        }
        if let Some(new_direction) = direction {
            after.direction = new_direction;
        }
        if let Some(new_amount) = amount {
            after.amount = new_amount;
        }
        if let Some(new_description) = description {
            after.description = new_description.trim().to_string();
        }
        // Some(None) clears the override, Some(Some(d)) sets it
        if let Some(new_cash_date) = cash_date {
            after.cash_date = new_cash_date;
        }
        if let Some(new_accrual_date) = accrual_date {
            after.accrual_date = new_accrual_date;
        }

        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(txn) = self.storage.ledger.bank_transaction_mut(id) {
            *txn = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {}", after.date, after.description)),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Assign a transaction to a category (or clear it with `None`)
    pub fn classify(
        &mut self,
        id: TransactionId,
        category_id: Option<CategoryId>,
    ) -> DreResult<BankTransaction> {
        if let Some(category_id) = category_id {
            if self.storage.ledger.category(category_id).is_none() {
                return Err(DreError::category_not_found(category_id.to_string()));
            }
        }

        let before = self
            .storage
            .ledger
            .bank_transaction(id)
            .cloned()
            .ok_or_else(|| DreError::transaction_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.category_id = category_id;

        if let Some(txn) = self.storage.ledger.bank_transaction_mut(id) {
            *txn = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {}", after.date, after.description)),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Change a transaction's line kind
    ///
    /// Marking a line as an invoice payment or internal transfer also
    /// drops its `affects_statement` flag.
    pub fn set_line_kind(
        &mut self,
        id: TransactionId,
        line_kind: LineKind,
    ) -> DreResult<BankTransaction> {
        let before = self
            .storage
            .ledger
            .bank_transaction(id)
            .cloned()
            .ok_or_else(|| DreError::transaction_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.set_line_kind(line_kind);
        if !line_kind.is_structural_exclusion() {
            after.affects_statement = true;
        }

        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(txn) = self.storage.ledger.bank_transaction_mut(id) {
            *txn = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {}", after.date, after.description)),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Set whether an operational line feeds the statement
    pub fn set_flag(&mut self, id: TransactionId, affects_statement: bool) -> DreResult<BankTransaction> {
        let before = self
            .storage
            .ledger
            .bank_transaction(id)
            .cloned()
            .ok_or_else(|| DreError::transaction_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.affects_statement = affects_statement;

        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(txn) = self.storage.ledger.bank_transaction_mut(id) {
            *txn = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {}", after.date, after.description)),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete a transaction
    pub fn delete(&mut self, id: TransactionId) -> DreResult<BankTransaction> {
        let txn = self
            .storage
            .ledger
            .bank_transaction(id)
            .cloned()
            .ok_or_else(|| DreError::transaction_not_found(id.to_string()))?;

        self.storage.ledger.remove_bank_transaction(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {}", txn.date, txn.description)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Total number of bank transactions
    pub fn count(&self) -> usize {
        self.storage.ledger.bank_transactions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DrePaths;
    use crate::models::{
        Category, CategoryKind, Entity, EntityKind, Institution, InstitutionKind, ReportGroup,
    };
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, EntityId, InstitutionId, CategoryId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::open(paths).unwrap();

        let entity = Entity::new("Household", EntityKind::Personal);
        let institution = Institution::new(
            "Checking",
            InstitutionKind::Bank,
            entity.id,
            Money::zero(),
        );
        let category = Category::new("Dividends", ReportGroup::OperatingRevenue, CategoryKind::Income);

        let (entity_id, institution_id, category_id) = (entity.id, institution.id, category.id);
        storage.ledger.entities.push(entity);
        storage.ledger.institutions.push(institution);
        storage.ledger.categories.push(category);

        (temp_dir, storage, entity_id, institution_id, category_id)
    }

    fn base_input(
        entity_id: EntityId,
        institution_id: InstitutionId,
        category_id: Option<CategoryId>,
    ) -> CreateTransactionInput {
        CreateTransactionInput {
            entity_id,
            institution_id,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            direction: Direction::In,
            amount: Money::from_units(1_000),
            category_id,
            description: Some("Quarterly dividend".to_string()),
            line_kind: None,
            cash_date: None,
            accrual_date: None,
        }
    }

    #[test]
    fn test_create_transaction() {
        let (_temp_dir, mut storage, entity_id, institution_id, category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let txn = service
            .create(base_input(entity_id, institution_id, Some(category_id)))
            .unwrap();

        assert_eq!(txn.amount, Money::from_units(1_000));
        assert_eq!(txn.category_id, Some(category_id));
        assert!(txn.affects_statement);
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn test_create_with_unknown_institution() {
        let (_temp_dir, mut storage, entity_id, _institution_id, _category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let input = base_input(entity_id, InstitutionId::new(), None);
        let result = service.create(input);
        assert!(matches!(result, Err(DreError::NotFound { .. })));
    }

    #[test]
    fn test_create_with_unknown_category() {
        let (_temp_dir, mut storage, entity_id, institution_id, _category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let input = base_input(entity_id, institution_id, Some(CategoryId::new()));
        let result = service.create(input);
        assert!(matches!(result, Err(DreError::NotFound { .. })));
    }

    #[test]
    fn test_create_invoice_payment_clears_flag() {
        let (_temp_dir, mut storage, entity_id, institution_id, _category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let mut input = base_input(entity_id, institution_id, None);
        input.direction = Direction::Out;
        input.line_kind = Some(LineKind::InvoicePayment);

        let txn = service.create(input).unwrap();
        assert_eq!(txn.line_kind, LineKind::InvoicePayment);
        assert!(!txn.affects_statement);
    }

    #[test]
    fn test_classify_and_clear() {
        let (_temp_dir, mut storage, entity_id, institution_id, category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let txn = service
            .create(base_input(entity_id, institution_id, None))
            .unwrap();
        assert_eq!(txn.category_id, None);

        let classified = service.classify(txn.id, Some(category_id)).unwrap();
        assert_eq!(classified.category_id, Some(category_id));

        let cleared = service.classify(txn.id, None).unwrap();
        assert_eq!(cleared.category_id, None);
    }

    #[test]
    fn test_update_fields() {
        let (_temp_dir, mut storage, entity_id, institution_id, category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let txn = service
            .create(base_input(entity_id, institution_id, Some(category_id)))
            .unwrap();

        let updated = service
            .update(
                txn.id,
                None,
                None,
                Some(Money::from_units(1_200)),
                None,
                Some(Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())),
                None,
            )
            .unwrap();

        assert_eq!(updated.amount, Money::from_units(1_200));
        assert_eq!(
            updated.cash_date,
            Some(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        );

        // Some(None) clears the override again
        let cleared = service
            .update(txn.id, None, None, None, None, Some(None), None)
            .unwrap();
        assert_eq!(cleared.cash_date, None);
    }

    #[test]
    fn test_set_line_kind_round_trip() {
        let (_temp_dir, mut storage, entity_id, institution_id, _category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let txn = service
            .create(base_input(entity_id, institution_id, None))
            .unwrap();

        let excluded = service
            .set_line_kind(txn.id, LineKind::InternalTransfer)
            .unwrap();
        assert!(!excluded.affects_statement);

        let restored = service
            .set_line_kind(txn.id, LineKind::Operational)
            .unwrap();
        assert!(restored.affects_statement);
    }

    #[test]
    fn test_flag_on_excluded_kind_refused() {
        let (_temp_dir, mut storage, entity_id, institution_id, _category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let mut input = base_input(entity_id, institution_id, None);
        input.line_kind = Some(LineKind::InvoicePayment);
        let txn = service.create(input).unwrap();

        let result = service.set_flag(txn.id, true);
        assert!(matches!(result, Err(DreError::Validation(_))));
    }

    #[test]
    fn test_list_filtered_by_window() {
        let (_temp_dir, mut storage, entity_id, institution_id, category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let mut january = base_input(entity_id, institution_id, Some(category_id));
        january.date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        service.create(january).unwrap();

        let mut february = base_input(entity_id, institution_id, Some(category_id));
        february.date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        service.create(february).unwrap();

        let filter = TransactionFilter::new().window(ReportWindow::monthly(1, 2026));
        let listed = service.list(filter);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].date.format("%m").to_string(), "01");

        let all = service.list(TransactionFilter::new());
        assert_eq!(all.len(), 2);
        // Newest first
        assert!(all[0].date > all[1].date);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, mut storage, entity_id, institution_id, _category_id) =
            create_test_storage();
        let mut service = TransactionService::new(&mut storage);

        let txn = service
            .create(base_input(entity_id, institution_id, None))
            .unwrap();
        assert_eq!(service.count(), 1);

        service.delete(txn.id).unwrap();
        assert_eq!(service.count(), 0);
        assert!(service.get(txn.id).is_none());
    }
}
