//! Credit card display formatting
//!
//! Formats cards and their installment registers for terminal output.

use crate::models::{CardTransaction, Category, CreditCard, Money};

/// Format a list of credit cards as a table
pub fn format_card_list(cards: &[CreditCard]) -> String {
    if cards.is_empty() {
        return "No cards found.".to_string();
    }

    let name_width = cards.iter().map(|c| c.name.len()).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:>8}  {:>8}  {:>14}\n",
        "Name",
        "Network",
        "Closing",
        "Due",
        "Limit",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:->8}  {:->8}  {:->14}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for card in cards {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:>8}  {:>8}  {:>14}\n",
            card.name,
            card.network.to_string(),
            card.closing_day,
            card.due_day,
            card.limit.to_string(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a list of card installments as a register
///
/// Rows show the purchase, its installment position, the invoice month
/// it lands on, and its settlement status.
pub fn format_purchase_register(
    purchases: &[CardTransaction],
    categories: &[Category],
) -> String {
    if purchases.is_empty() {
        return "No card purchases found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:24} {:18} {:>7} {:>9} {:>12} {:12}\n",
        "Date", "Description", "Category", "Inst", "Invoice", "Amount", "Status"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for purchase in purchases {
        let category_display = purchase
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or("(unclassified)");

        output.push_str(&format!(
            "{} {} {} {:>4}/{:<2} {:>9} {:>12} {:12}\n",
            purchase.purchase_date.format("%Y-%m-%d"),
            truncate(&purchase.description, 24),
            truncate(category_display, 18),
            purchase.installment_index,
            purchase.installment_count,
            purchase.invoice_month.to_string(),
            purchase.amount,
            purchase.status.to_string(),
        ));
    }

    output.push_str(&"-".repeat(100));
    output.push('\n');

    let total: Money = purchases.iter().map(|p| p.amount).sum();
    output.push_str(&format!("{:>85} {:>12}\n", "Total:", total));

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
    use crate::models::{CardNetwork, EntityId};
    use chrono::NaiveDate;

    fn sample_card() -> CreditCard {
        CreditCard::new(
            "Mastercard Black",
            CardNetwork::Mastercard,
            EntityId::new(),
            5,
            15,
            Money::from_units(20_000),
        )
    }

    #[test]
    fn test_format_card_list() {
        let cards = vec![sample_card()];
        let output = format_card_list(&cards);

        assert!(output.contains("Mastercard Black"));
        assert!(output.contains("Mastercard"));
        assert!(output.contains("$20000.00"));
    }

    #[test]
    fn test_format_empty_card_list() {
        let output = format_card_list(&[]);
        assert!(output.contains("No cards found"));
    }

    #[test]
    fn test_format_purchase_register() {
        let card = sample_card();
        let purchase = CardTransaction::single(
            card.id,
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            "Office chair",
            None,
            Money::from_units(900),
        );

        let output = format_purchase_register(std::slice::from_ref(&purchase), &[]);
        assert!(output.contains("Office chair"));
        assert!(output.contains("1/1"));
        assert!(output.contains("pending"));
        assert!(output.contains("Total:"));
        assert!(output.contains("$900.00"));
    }

    #[test]
    fn test_format_empty_purchase_register() {
        let output = format_purchase_register(&[], &[]);
        assert!(output.contains("No card purchases found"));
    }
}
