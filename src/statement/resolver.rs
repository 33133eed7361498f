//! Category resolution for statement lines
//!
//! A line's category reference may be unset, or may point at a category
//! that no longer exists. Both cases make the line an orphan: it stays out
//! of every group total and is counted in the aggregate's unclassified
//! counter so the caller knows the report is under-stated.

use std::collections::HashMap;

use crate::models::{Category, CategoryId};

/// Indexed lookup from category id to category
#[derive(Debug)]
pub struct CategoryResolver<'a> {
    by_id: HashMap<CategoryId, &'a Category>,
}

impl<'a> CategoryResolver<'a> {
    /// Build the index over the current category dictionary
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Resolve a reference. `None` in, or a dangling id, resolves to
    /// `None`: the line is an orphan.
    pub fn resolve(&self, reference: Option<CategoryId>) -> Option<&'a Category> {
        reference.and_then(|id| self.by_id.get(&id).copied())
    }

    /// Number of categories in the dictionary
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
