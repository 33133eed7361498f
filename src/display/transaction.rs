//! Bank transaction display formatting
//!
//! Formats bank lines for terminal display, including the register view
//! and line-kind markers.

use crate::models::{BankTransaction, Category, Institution, LineKind};

/// Format a single bank line for display (register row)
pub fn format_transaction_row(txn: &BankTransaction, categories: &[Category]) -> String {
    let kind_marker = match txn.line_kind {
        LineKind::Operational => " ",
        LineKind::InvoicePayment => "F",
        LineKind::InternalTransfer => "T",
    };

    let category_display = txn
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("(unclassified)");

    format!(
        "{} {} {} {} {:>12}",
        kind_marker,
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.description, 24),
        truncate(category_display, 18),
        txn.signed_amount()
    )
}

/// Format a list of bank lines as a register
pub fn format_transaction_register(
    transactions: &[BankTransaction],
    categories: &[Category],
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:10} {:24} {:18} {:>12}\n",
        "K", "Date", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, categories));
        output.push('\n');
    }

    output.push_str(&"-".repeat(70));
    output.push('\n');

    let total: crate::models::Money = transactions.iter().map(|t| t.signed_amount()).sum();
    output.push_str(&format!("{:>57} {:>12}\n", "Net:", total));

    output
}

/// Format a single bank line's details
pub fn format_transaction_details(
    txn: &BankTransaction,
    categories: &[Category],
    institutions: &[Institution],
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.signed_amount()));
    output.push_str(&format!("Direction:   {}\n", txn.direction));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    let institution_name = institutions
        .iter()
        .find(|i| i.id == txn.institution_id)
        .map(|i| i.name.as_str())
        .unwrap_or("(unknown)");
    output.push_str(&format!("Institution: {}\n", institution_name));

    match txn
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
    {
        Some(category) => {
            output.push_str(&format!("Category:    {}\n", category.name));
            output.push_str(&format!("Group:       {}\n", category.group.label()));
        }
        None => output.push_str("Category:    (unclassified)\n"),
    }

    output.push_str(&format!("Line kind:   {}\n", txn.line_kind));
    if !txn.affects_statement {
        output.push_str("Excluded from the income statement.\n");
    }

    if let Some(cash) = txn.cash_date {
        output.push_str(&format!("Cash date:   {}\n", cash.format("%Y-%m-%d")));
    }
    if let Some(accrual) = txn.accrual_date {
        output.push_str(&format!("Accrual date: {}\n", accrual.format("%Y-%m-%d")));
    }
    if let Some(import_id) = &txn.import_id {
        output.push_str(&format!("Import id:   {}\n", import_id));
    }

    output
}

/// Truncate a string to a maximum length, padding shorter ones
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryKind, Direction, Entity, EntityId, EntityKind, InstitutionId, InstitutionKind,
        Money, ReportGroup,
    };
    use chrono::NaiveDate;

    fn sample_txn(categories: &[Category]) -> BankTransaction {
        BankTransaction::with_details(
            EntityId::new(),
            InstitutionId::new(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            Direction::Out,
            Money::from_cents(5_000),
            categories.first().map(|c| c.id),
            "Supermarket",
            crate::models::LineKind::Operational,
        )
    }

    #[test]
    fn test_format_transaction_row() {
        let categories = vec![Category::new(
            "Groceries",
            ReportGroup::SurvivalCost,
            CategoryKind::Expense,
        )];
        let txn = sample_txn(&categories);

        let formatted = format_transaction_row(&txn, &categories);
        assert!(formatted.contains("2026-01-15"));
        assert!(formatted.contains("Supermarket"));
        assert!(formatted.contains("Groceries"));
        assert!(formatted.contains("-$50.00"));
    }

    #[test]
    fn test_unclassified_marker() {
        let txn = sample_txn(&[]);
        let formatted = format_transaction_row(&txn, &[]);
        assert!(formatted.contains("(unclassified)"));
    }

    #[test]
    fn test_format_empty_register() {
        let formatted = format_transaction_register(&[], &[]);
        assert!(formatted.contains("No transactions found"));
    }

    #[test]
    fn test_register_net_total() {
        let categories = vec![Category::new(
            "Groceries",
            ReportGroup::SurvivalCost,
            CategoryKind::Expense,
        )];
        let transactions = vec![sample_txn(&categories), sample_txn(&categories)];

        let formatted = format_transaction_register(&transactions, &categories);
        assert!(formatted.contains("Net:"));
        assert!(formatted.contains("-$100.00"));
    }

    #[test]
    fn test_format_transaction_details() {
        let entity = Entity::new("Household", EntityKind::Personal);
        let institution = crate::models::Institution::new(
            "Main bank",
            InstitutionKind::Bank,
            entity.id,
            Money::zero(),
        );
        let categories = vec![Category::new(
            "Groceries",
            ReportGroup::SurvivalCost,
            CategoryKind::Expense,
        )];
        let mut txn = sample_txn(&categories);
        txn.institution_id = institution.id;

        let formatted =
            format_transaction_details(&txn, &categories, std::slice::from_ref(&institution));
        assert!(formatted.contains("Main bank"));
        assert!(formatted.contains("Survival living cost"));
        assert!(formatted.contains("operational"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short     ");
        let result = truncate("A very long description", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with('…'));
    }
}
