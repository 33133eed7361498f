//! Category display formatting
//!
//! Formats the category dictionary for terminal output, grouped by
//! report group in statement order.

use crate::models::{Category, ReportGroup};

/// Format categories as a tree grouped by report group
///
/// Groups appear in statement order; groups with no categories are
/// omitted.
pub fn format_category_tree(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'dre init' to create default categories.".to_string();
    }

    let mut output = String::new();
    let mut first = true;

    for &group in ReportGroup::all() {
        let mut members: Vec<&Category> = categories.iter().filter(|c| c.group == group).collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        if !first {
            output.push('\n');
        }
        first = false;

        output.push_str(&format!("{}\n", group.label()));
        for (i, category) in members.iter().enumerate() {
            let prefix = if i == members.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            output.push_str(&format!(
                "  {}{} ({})\n",
                prefix, category.name, category.kind
            ));
        }
    }

    output
}

/// Format a flat category list with group and kind columns
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<28}  {:<8}  {}\n",
        "Category",
        "Group",
        "Kind",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<28}  {:-<8}  {:-<12}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for category in categories {
        output.push_str(&format!(
            "{:<name_width$}  {:<28}  {:<8}  {}\n",
            category.name,
            category.group.label(),
            category.kind.to_string(),
            category.id,
            name_width = name_width,
        ));
    }

    output
}

/// Format a single category's details
pub fn format_category_details(category: &Category, usage_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:     {}\n", category.id));
    output.push_str(&format!("  Group:  {}\n", category.group.label()));
    output.push_str(&format!("  Kind:   {}\n", category.kind));
    output.push_str(&format!("  Used by {} line(s)\n", usage_count));
    output.push('\n');
    output.push_str(&format!(
        "  Created: {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
