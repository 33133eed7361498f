//! Category service
//!
//! Categories are the left column of the income statement: each one maps
//! to exactly one of the fixed report groups. Group names arriving as
//! strings (CLI flags, CSV imports) are checked here, so an unknown group
//! is rejected before it can reach the ledger.

use crate::audit::EntityType;
use crate::error::{DreError, DreResult};
use crate::models::{Category, CategoryId, CategoryKind, ReportGroup};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a mut Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Parse a report group name, with the closed list in the error
    pub fn parse_report_group(name: &str) -> DreResult<ReportGroup> {
        ReportGroup::parse(name).ok_or_else(|| DreError::unknown_report_group(name))
    }

    /// Parse a category kind name
    pub fn parse_kind(name: &str) -> DreResult<CategoryKind> {
        CategoryKind::parse(name).ok_or_else(|| {
            DreError::Validation(format!(
                "Unknown category kind '{}'. Use income, expense, or transfer.",
                name
            ))
        })
    }

    /// Create a new category
    pub fn create(
        &mut self,
        name: &str,
        group: ReportGroup,
        kind: CategoryKind,
    ) -> DreResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation("Category name cannot be empty".into()));
        }

        if self.storage.ledger.category_by_name(name).is_some() {
            return Err(DreError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = Category::new(name, group, kind);
        category
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        self.storage.ledger.categories.push(category.clone());
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Option<Category> {
        self.storage.ledger.category(id).cloned()
    }

    /// Find a category by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> Option<Category> {
        if let Some(category) = self.storage.ledger.category_by_name(identifier) {
            return Some(category.clone());
        }

        if let Some(category) = self
            .storage
            .ledger
            .categories
            .iter()
            .find(|c| c.id.to_string() == identifier)
        {
            return Some(category.clone());
        }

        identifier
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| self.storage.ledger.category(id).cloned())
    }

    /// List all categories in statement order: by group, then by name
    pub fn list(&self) -> Vec<Category> {
        let mut categories = self.storage.ledger.categories.clone();
        categories.sort_by(|a, b| {
            a.group
                .sort_order()
                .cmp(&b.group.sort_order())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        categories
    }

    /// List the categories of one report group, by name
    pub fn list_by_group(&self, group: ReportGroup) -> Vec<Category> {
        let mut categories: Vec<_> = self
            .storage
            .ledger
            .categories
            .iter()
            .filter(|c| c.group == group)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        categories
    }

    /// Rename a category
    pub fn rename(&mut self, id: CategoryId, name: &str) -> DreResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DreError::Validation("Category name cannot be empty".into()));
        }

        if let Some(existing) = self.storage.ledger.category_by_name(name) {
            if existing.id != id {
                return Err(DreError::Duplicate {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
        }

        let before = self
            .storage
            .ledger
            .category(id)
            .cloned()
            .ok_or_else(|| DreError::category_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.name = name.to_string();
        after
            .validate()
            .map_err(|e| DreError::Validation(e.to_string()))?;

        if let Some(category) = self.storage.ledger.category_mut(id) {
            *category = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Category,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Move a category to a different report group
    ///
    /// Every transaction referencing the category moves with it; the next
    /// statement run reflects the new grouping.
    pub fn regroup(&mut self, id: CategoryId, group: ReportGroup) -> DreResult<Category> {
        let before = self
            .storage
            .ledger
            .category(id)
            .cloned()
            .ok_or_else(|| DreError::category_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.group = group;

        if let Some(category) = self.storage.ledger.category_mut(id) {
            *category = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Category,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Change a category's kind
    pub fn set_kind(&mut self, id: CategoryId, kind: CategoryKind) -> DreResult<Category> {
        let before = self
            .storage
            .ledger
            .category(id)
            .cloned()
            .ok_or_else(|| DreError::category_not_found(id.to_string()))?;

        let mut after = before.clone();
        after.kind = kind;

        if let Some(category) = self.storage.ledger.category_mut(id) {
            *category = after.clone();
        }
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Category,
            id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Delete a category
    ///
    /// Refused while transactions still reference it; deleting anyway
    /// would orphan them into the unclassified bucket.
    pub fn delete(&mut self, id: CategoryId) -> DreResult<Category> {
        let category = self
            .storage
            .ledger
            .category(id)
            .cloned()
            .ok_or_else(|| DreError::category_not_found(id.to_string()))?;

        let usage = self.storage.ledger.category_usage(id);
        if usage > 0 {
            return Err(DreError::Validation(format!(
                "Cannot delete category '{}': {} transactions still reference it",
                category.name, usage
            )));
        }

        self.storage.ledger.remove_category(id);
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DrePaths;
    use crate::models::{
        BankTransaction, Direction, Entity, EntityKind, Institution, InstitutionKind, Money,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = CategoryService::new(&mut storage);

        let category = service
            .create("Groceries", ReportGroup::SurvivalCost, CategoryKind::Expense)
            .unwrap();
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.group, ReportGroup::SurvivalCost);
    }

    #[test]
    fn test_duplicate_name_refused() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = CategoryService::new(&mut storage);

        service
            .create("Groceries", ReportGroup::SurvivalCost, CategoryKind::Expense)
            .unwrap();
        let result = service.create("groceries", ReportGroup::ComfortCost, CategoryKind::Expense);
        assert!(matches!(result, Err(DreError::Duplicate { .. })));
    }

    #[test]
    fn test_parse_report_group() {
        assert_eq!(
            CategoryService::parse_report_group("Operating revenue").unwrap(),
            ReportGroup::OperatingRevenue
        );
        assert_eq!(
            CategoryService::parse_report_group("survival_cost").unwrap(),
            ReportGroup::SurvivalCost
        );

        let result = CategoryService::parse_report_group("Miscellaneous");
        match result {
            Err(DreError::UnknownReportGroup { group, valid }) => {
                assert_eq!(group, "Miscellaneous");
                assert!(valid.contains("Operating revenue"));
            }
            other => panic!("expected UnknownReportGroup, got {:?}", other),
        }
    }

    #[test]
    fn test_regroup() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = CategoryService::new(&mut storage);

        let category = service
            .create("Streaming", ReportGroup::SurvivalCost, CategoryKind::Expense)
            .unwrap();
        let moved = service
            .regroup(category.id, ReportGroup::ComfortCost)
            .unwrap();
        assert_eq!(moved.group, ReportGroup::ComfortCost);
    }

    #[test]
    fn test_delete_in_use_refused() {
        let (_temp_dir, mut storage) = create_test_storage();

        let entity = Entity::new("Household", EntityKind::Personal);
        let institution = Institution::new(
            "Checking",
            InstitutionKind::Bank,
            entity.id,
            Money::zero(),
        );
        let (entity_id, institution_id) = (entity.id, institution.id);
        storage.ledger.entities.push(entity);
        storage.ledger.institutions.push(institution);

        let category = {
            let mut service = CategoryService::new(&mut storage);
            service
                .create("Groceries", ReportGroup::SurvivalCost, CategoryKind::Expense)
                .unwrap()
        };

        let mut txn = BankTransaction::new(
            entity_id,
            institution_id,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            Direction::Out,
            Money::from_units(80),
        );
        txn.category_id = Some(category.id);
        storage.ledger.bank_transactions.push(txn);

        let mut service = CategoryService::new(&mut storage);
        let result = service.delete(category.id);
        assert!(matches!(result, Err(DreError::Validation(_))));
    }

    #[test]
    fn test_delete_unused() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = CategoryService::new(&mut storage);

        let category = service
            .create("One-off", ReportGroup::NonOperating, CategoryKind::Expense)
            .unwrap();
        service.delete(category.id).unwrap();
        assert!(service.get(category.id).is_none());
    }

    #[test]
    fn test_list_in_statement_order() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = CategoryService::new(&mut storage);

        service
            .create("Travel", ReportGroup::ComfortCost, CategoryKind::Expense)
            .unwrap();
        service
            .create("Dividends", ReportGroup::OperatingRevenue, CategoryKind::Income)
            .unwrap();
        service
            .create("Groceries", ReportGroup::SurvivalCost, CategoryKind::Expense)
            .unwrap();

        let listed = service.list();
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dividends", "Groceries", "Travel"]);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, mut storage) = create_test_storage();
        let mut service = CategoryService::new(&mut storage);

        let category = service
            .create("Groceries", ReportGroup::SurvivalCost, CategoryKind::Expense)
            .unwrap();

        let found = service.find(&category.id.to_string()).unwrap();
        assert_eq!(found.id, category.id);
    }
}
