//! CSV import service
//!
//! Non-interactive imports with fixed column layouts. A row that fails to
//! parse is quarantined into the report with its row number and reason;
//! the rest of the file still imports. Layouts (header row required):
//!
//! - bank transactions: `date,description,amount[,category]`
//!   (signed amount, negative = outflow)
//! - card purchases: `date,description,total,installments[,category]`
//! - categories: `name,group,kind`

use std::collections::HashSet;

use chrono::NaiveDate;
use csv::{Reader, StringRecord};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{DreError, DreResult};
use crate::models::{
    BankTransaction, CardId, Category, CategoryId, CategoryKind, Direction, EntityId,
    InstitutionId, Money, ReportGroup,
};
use crate::services::card::{CardService, RecordPurchaseInput};
use crate::storage::Storage;

/// A quarantined row and why it was refused
#[derive(Debug, Clone)]
pub struct ImportRowError {
    /// 1-based data row number, header excluded
    pub row: usize,
    pub message: String,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Rows turned into records
    pub imported: usize,
    /// Rows skipped as duplicates of existing records
    pub skipped: usize,
    /// Rows quarantined with their errors
    pub errors: Vec<ImportRowError>,
}

impl ImportReport {
    fn quarantine(&mut self, row: usize, message: impl Into<String>) {
        self.errors.push(ImportRowError {
            row,
            message: message.into(),
        });
    }
}

/// Service for CSV imports
pub struct ImportService<'a> {
    storage: &'a mut Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Import bank transactions from `date,description,amount[,category]`
    ///
    /// Amounts are signed: positive rows become inflows, negative rows
    /// outflows. Duplicates are detected by the derived import ID over
    /// date, amount, and description.
    pub fn import_bank<R: std::io::Read>(
        &mut self,
        reader: &mut Reader<R>,
        institution_id: InstitutionId,
        entity_id: EntityId,
    ) -> DreResult<ImportReport> {
        if self.storage.ledger.institution(institution_id).is_none() {
            return Err(DreError::institution_not_found(institution_id.to_string()));
        }
        if self.storage.ledger.entity(entity_id).is_none() {
            return Err(DreError::entity_not_found(entity_id.to_string()));
        }

        let mut seen: HashSet<String> = self
            .storage
            .ledger
            .bank_transactions
            .iter()
            .filter_map(|t| t.import_id.clone())
            .collect();

        let mut report = ImportReport::default();
        let mut imported = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    report.quarantine(row, format!("Unreadable row: {}", e));
                    continue;
                }
            };

            match self.parse_bank_row(&record, institution_id, entity_id) {
                Ok(txn) => {
                    let import_id = txn.generate_import_id();
                    if seen.contains(&import_id) {
                        report.skipped += 1;
                        continue;
                    }
                    seen.insert(import_id);
                    imported.push(txn);
                    report.imported += 1;
                }
                Err(message) => report.quarantine(row, message),
            }
        }

        if !imported.is_empty() {
            let entries: Vec<AuditEntry> = imported
                .iter()
                .map(|t| {
                    AuditEntry::create(
                        EntityType::Transaction,
                        t.id.to_string(),
                        Some(t.description.clone()),
                        t,
                    )
                })
                .collect();

            self.storage.ledger.bank_transactions.extend(imported);
            self.storage.save()?;
            self.storage.audit().log_batch(&entries)?;
        }

        Ok(report)
    }

    fn parse_bank_row(
        &self,
        record: &StringRecord,
        institution_id: InstitutionId,
        entity_id: EntityId,
    ) -> Result<BankTransaction, String> {
        let date = parse_date(required_field(record, 0, "date")?)?;
        let description = required_field(record, 1, "description")?;
        let amount = parse_amount(required_field(record, 2, "amount")?)?;
        if amount.is_zero() {
            return Err("Amount must not be zero".to_string());
        }

        let category_id = self.resolve_category(optional_field(record, 3))?;

        let direction = if amount.is_negative() {
            Direction::Out
        } else {
            Direction::In
        };

        let mut txn =
            BankTransaction::new(entity_id, institution_id, date, direction, amount.abs());
        txn.description = description.to_string();
        txn.category_id = category_id;
        txn.import_id = Some(txn.generate_import_id());

        txn.validate().map_err(|e| e.to_string())?;
        Ok(txn)
    }

    /// Import card purchases from `date,description,total,installments[,category]`
    ///
    /// Each row becomes a purchase expanded into its installment schedule.
    /// A row matching an existing purchase on the same card (date,
    /// description, total) is skipped.
    pub fn import_card<R: std::io::Read>(
        &mut self,
        reader: &mut Reader<R>,
        card_id: CardId,
    ) -> DreResult<ImportReport> {
        if self.storage.ledger.card(card_id).is_none() {
            return Err(DreError::card_not_found(card_id.to_string()));
        }

        let mut seen: HashSet<(NaiveDate, String, i64)> = self
            .storage
            .ledger
            .card_transactions
            .iter()
            .filter(|t| t.card_id == card_id && t.installment_index == 1)
            .map(|t| {
                (
                    t.purchase_date,
                    t.description.to_lowercase(),
                    t.total_purchase_amount.cents(),
                )
            })
            .collect();

        let mut report = ImportReport::default();

        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    report.quarantine(row, format!("Unreadable row: {}", e));
                    continue;
                }
            };

            let input = match self.parse_card_row(&record, card_id) {
                Ok(input) => input,
                Err(message) => {
                    report.quarantine(row, message);
                    continue;
                }
            };

            let key = (
                input.purchase_date,
                input.description.to_lowercase(),
                input.total.cents(),
            );
            if seen.contains(&key) {
                report.skipped += 1;
                continue;
            }

            match CardService::new(self.storage).record_purchase(input) {
                Ok(_) => {
                    seen.insert(key);
                    report.imported += 1;
                }
                Err(e) => report.quarantine(row, e.to_string()),
            }
        }

        Ok(report)
    }

    fn parse_card_row(
        &self,
        record: &StringRecord,
        card_id: CardId,
    ) -> Result<RecordPurchaseInput, String> {
        let purchase_date = parse_date(required_field(record, 0, "date")?)?;
        let description = required_field(record, 1, "description")?.to_string();
        let total = parse_amount(required_field(record, 2, "total")?)?;
        if !total.is_positive() {
            return Err(format!("Purchase total must be positive (got {})", total));
        }

        let installments_str = required_field(record, 3, "installments")?;
        let installments: u32 = installments_str
            .parse()
            .map_err(|_| format!("Invalid installment count '{}'", installments_str))?;
        if installments == 0 {
            return Err("Installment count must be at least 1".to_string());
        }

        let category_id = self.resolve_category(optional_field(record, 4))?;

        Ok(RecordPurchaseInput {
            card_id,
            purchase_date,
            description,
            category_id,
            total,
            installments,
        })
    }

    /// Import categories from `name,group,kind`
    ///
    /// A row naming a report group outside the fixed statement structure is
    /// quarantined; the dictionary never absorbs an unknown group.
    pub fn import_categories<R: std::io::Read>(
        &mut self,
        reader: &mut Reader<R>,
    ) -> DreResult<ImportReport> {
        let mut seen: HashSet<String> = self
            .storage
            .ledger
            .categories
            .iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        let mut report = ImportReport::default();
        let mut imported = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    report.quarantine(row, format!("Unreadable row: {}", e));
                    continue;
                }
            };

            let category = match parse_category_row(&record) {
                Ok(category) => category,
                Err(message) => {
                    report.quarantine(row, message);
                    continue;
                }
            };

            if seen.contains(&category.name.to_lowercase()) {
                report.skipped += 1;
                continue;
            }

            seen.insert(category.name.to_lowercase());
            imported.push(category);
            report.imported += 1;
        }

        if !imported.is_empty() {
            let entries: Vec<AuditEntry> = imported
                .iter()
                .map(|c| {
                    AuditEntry::create(
                        EntityType::Category,
                        c.id.to_string(),
                        Some(c.name.clone()),
                        c,
                    )
                })
                .collect();

            self.storage.ledger.categories.extend(imported);
            self.storage.save()?;
            self.storage.audit().log_batch(&entries)?;
        }

        Ok(report)
    }

    fn resolve_category(&self, field: Option<&str>) -> Result<Option<CategoryId>, String> {
        match field {
            None => Ok(None),
            Some(name) => self
                .storage
                .ledger
                .category_by_name(name)
                .map(|c| Some(c.id))
                .ok_or_else(|| format!("Unknown category '{}'", name)),
        }
    }
}

fn parse_category_row(record: &StringRecord) -> Result<Category, String> {
    let name = required_field(record, 0, "name")?;
    let group_str = required_field(record, 1, "group")?;
    let group = ReportGroup::parse(group_str)
        .ok_or_else(|| DreError::unknown_report_group(group_str).to_string())?;

    let kind_str = required_field(record, 2, "kind")?;
    let kind = CategoryKind::parse(kind_str).ok_or_else(|| {
        format!(
            "Unknown category kind '{}'. Use income, expense, or transfer.",
            kind_str
        )
    })?;

    let category = Category::new(name, group, kind);
    category.validate().map_err(|e| e.to_string())?;
    Ok(category)
}

fn required_field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, String> {
    let value = record.get(index).map(|s| s.trim()).unwrap_or_default();
    if value.is_empty() {
        return Err(format!("Missing {} column", name));
    }
    Ok(value)
}

fn optional_field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Parse a date, trying ISO then day-first layouts
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(format!("Could not parse date '{}'", s))
}

/// Parse an amount, tolerating thousands separators and accounting negatives
fn parse_amount(s: &str) -> Result<Money, String> {
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != ' ').collect();

    let (negative, value) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, &cleaned[1..cleaned.len() - 1])
    } else {
        (false, cleaned.as_str())
    };

    Money::parse(value)
        .map(|m| if negative { -m } else { m })
        .map_err(|e| format!("Could not parse amount '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DrePaths;
    use crate::models::{
        CardNetwork, CreditCard, Entity, EntityKind, Institution, InstitutionKind, MonthYear,
    };
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, EntityId, InstitutionId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::open(paths).unwrap();

        let entity = Entity::new("Household", EntityKind::Personal);
        let institution = Institution::new(
            "Main bank",
            InstitutionKind::Bank,
            entity.id,
            Money::zero(),
        );
        let (entity_id, institution_id) = (entity.id, institution.id);
        storage.ledger.entities.push(entity);
        storage.ledger.institutions.push(institution);

        (temp_dir, storage, entity_id, institution_id)
    }

    fn seed_category(storage: &mut Storage, name: &str, group: ReportGroup, kind: CategoryKind) {
        storage
            .ledger
            .categories
            .push(Category::new(name, group, kind));
    }

    #[test]
    fn test_import_bank_rows() {
        let (_temp_dir, mut storage, entity_id, institution_id) = create_test_storage();
        seed_category(
            &mut storage,
            "Groceries",
            ReportGroup::SurvivalCost,
            CategoryKind::Expense,
        );
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,amount,category\n\
                        2026-01-15,Supermarket,-250.00,Groceries\n\
                        2026-01-20,Consulting invoice,1000.00,";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service
            .import_bank(&mut reader, institution_id, entity_id)
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());

        let txns = &storage.ledger.bank_transactions;
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].direction, Direction::Out);
        assert_eq!(txns[0].amount, Money::from_units(250));
        assert!(txns[0].category_id.is_some());
        assert_eq!(txns[1].direction, Direction::In);
        assert!(txns[1].category_id.is_none());
    }

    #[test]
    fn test_import_bank_is_idempotent() {
        let (_temp_dir, mut storage, entity_id, institution_id) = create_test_storage();
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,amount\n2026-01-15,Supermarket,-250.00";

        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let first = service
            .import_bank(&mut reader, institution_id, entity_id)
            .unwrap();
        assert_eq!(first.imported, 1);

        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let second = service
            .import_bank(&mut reader, institution_id, entity_id)
            .unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(storage.ledger.bank_transactions.len(), 1);
    }

    #[test]
    fn test_bad_rows_are_quarantined() {
        let (_temp_dir, mut storage, entity_id, institution_id) = create_test_storage();
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,amount,category\n\
                        not-a-date,Supermarket,-250.00,\n\
                        2026-01-16,Pharmacy,banana,\n\
                        2026-01-17,Cinema,-80.00,No such category\n\
                        2026-01-18,Consulting,1000.00,";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service
            .import_bank(&mut reader, institution_id, entity_id)
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.errors[0].row, 1);
        assert!(report.errors[0].message.contains("date"));
        assert!(report.errors[1].message.contains("amount"));
        assert!(report.errors[2].message.contains("No such category"));
        assert_eq!(storage.ledger.bank_transactions.len(), 1);
    }

    #[test]
    fn test_import_bank_unknown_institution() {
        let (_temp_dir, mut storage, entity_id, _institution_id) = create_test_storage();
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,amount\n2026-01-15,Supermarket,-250.00";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let result = service.import_bank(&mut reader, InstitutionId::new(), entity_id);
        assert!(matches!(result, Err(DreError::NotFound { .. })));
    }

    #[test]
    fn test_import_card_purchases() {
        let (_temp_dir, mut storage, entity_id, _institution_id) = create_test_storage();
        let card = CreditCard::new(
            "Black card",
            CardNetwork::Visa,
            entity_id,
            5,
            12,
            Money::zero(),
        );
        let card_id = card.id;
        storage.ledger.cards.push(card);
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,total,installments\n\
                        2026-01-10,Laptop,1200.00,12\n\
                        2026-01-12,Dinner,180.00,1";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service.import_card(&mut reader, card_id).unwrap();

        assert_eq!(report.imported, 2);
        assert!(report.errors.is_empty());
        // 12 installments plus the single purchase
        assert_eq!(storage.ledger.card_transactions.len(), 13);

        let laptop: Vec<_> = storage
            .ledger
            .card_transactions
            .iter()
            .filter(|t| t.description == "Laptop")
            .collect();
        assert_eq!(laptop.len(), 12);
        assert!(laptop
            .iter()
            .any(|t| t.invoice_month == MonthYear::new(12, 2026)));
    }

    #[test]
    fn test_import_card_skips_existing_purchase() {
        let (_temp_dir, mut storage, entity_id, _institution_id) = create_test_storage();
        let card = CreditCard::new(
            "Black card",
            CardNetwork::Visa,
            entity_id,
            5,
            12,
            Money::zero(),
        );
        let card_id = card.id;
        storage.ledger.cards.push(card);
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,total,installments\n2026-01-10,Laptop,1200.00,12";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        service.import_card(&mut reader, card_id).unwrap();

        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let second = service.import_card(&mut reader, card_id).unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(storage.ledger.card_transactions.len(), 12);
    }

    #[test]
    fn test_import_card_bad_installments() {
        let (_temp_dir, mut storage, entity_id, _institution_id) = create_test_storage();
        let card = CreditCard::new(
            "Black card",
            CardNetwork::Visa,
            entity_id,
            5,
            12,
            Money::zero(),
        );
        let card_id = card.id;
        storage.ledger.cards.push(card);
        let mut service = ImportService::new(&mut storage);

        let csv_data = "date,description,total,installments\n\
                        2026-01-10,Laptop,1200.00,0\n\
                        2026-01-11,Phone,900.00,many";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service.import_card(&mut reader, card_id).unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_import_categories() {
        let (_temp_dir, mut storage, _entity_id, _institution_id) = create_test_storage();
        let mut service = ImportService::new(&mut storage);

        let csv_data = "name,group,kind\n\
                        Dividends,Operating revenue,income\n\
                        Groceries,Survival living cost,expense";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service.import_categories(&mut reader).unwrap();

        assert_eq!(report.imported, 2);
        assert!(report.errors.is_empty());
        assert_eq!(storage.ledger.categories.len(), 2);
    }

    #[test]
    fn test_unknown_report_group_is_quarantined() {
        let (_temp_dir, mut storage, _entity_id, _institution_id) = create_test_storage();
        let mut service = ImportService::new(&mut storage);

        let csv_data = "name,group,kind\n\
                        Miscellaneous,Random bucket,expense\n\
                        Dividends,Operating revenue,income";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service.import_categories(&mut reader).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("Random bucket"));
        assert!(report.errors[0].message.contains("Operating revenue"));
        assert_eq!(storage.ledger.categories.len(), 1);
    }

    #[test]
    fn test_duplicate_category_skipped() {
        let (_temp_dir, mut storage, _entity_id, _institution_id) = create_test_storage();
        seed_category(
            &mut storage,
            "Groceries",
            ReportGroup::SurvivalCost,
            CategoryKind::Expense,
        );
        let mut service = ImportService::new(&mut storage);

        let csv_data = "name,group,kind\ngroceries,Survival living cost,expense";
        let mut reader = Reader::from_reader(csv_data.as_bytes());
        let report = service.import_categories(&mut reader).unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1,234.56").unwrap(), Money::from_cents(123_456));
        assert_eq!(parse_amount("(50.00)").unwrap(), Money::from_cents(-5_000));
        assert_eq!(parse_amount("R$ 10.50").unwrap(), Money::from_cents(1_050));
        assert!(parse_amount("banana").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(parse_date("2026-01-15").unwrap(), expected);
        assert_eq!(parse_date("15/01/2026").unwrap(), expected);
        assert!(parse_date("01-15-2026").is_err());
    }
}
