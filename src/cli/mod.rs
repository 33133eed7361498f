//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

use chrono::NaiveDate;

use crate::error::{DreError, DreResult};
use crate::models::{Money, MonthYear, ViewMode};

pub mod audit;
pub mod backup;
pub mod card;
pub mod category;
pub mod entity;
pub mod holding;
pub mod import;
pub mod institution;
pub mod investment;
pub mod report;
pub mod transaction;

pub use audit::{handle_audit_command, AuditCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use card::{handle_card_command, CardCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use entity::{handle_entity_command, EntityCommands};
pub use holding::{
    handle_fixed_command, handle_liability_command, FixedCommands, LiabilityCommands,
};
pub use import::{handle_import_command, ImportCommands};
pub use institution::{handle_institution_command, InstitutionCommands};
pub use investment::{handle_investment_command, InvestmentCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Parse a money argument, naming the flag in the error
pub(crate) fn parse_money(input: &str, what: &str) -> DreResult<Money> {
    Money::parse(input).map_err(|e| {
        DreError::Validation(format!(
            "Invalid {} '{}': {}. Use a value like '1500' or '1500.00'",
            what, input, e
        ))
    })
}

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(input: &str) -> DreResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| DreError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", input)))
}

/// Parse an optional date argument, defaulting to today
pub(crate) fn parse_date_or_today(input: Option<&str>) -> DreResult<NaiveDate> {
    match input {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse a YYYY-MM month argument
pub(crate) fn parse_month(input: &str) -> DreResult<MonthYear> {
    let invalid = || DreError::Validation(format!("Invalid month '{}'. Use YYYY-MM", input));

    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    let reference = MonthYear::new(month, year);
    if !reference.is_valid() {
        return Err(invalid());
    }
    Ok(reference)
}

/// Parse an optional month argument, defaulting to the current month
pub(crate) fn parse_month_or_current(input: Option<&str>) -> DreResult<MonthYear> {
    match input {
        Some(s) => parse_month(s),
        None => Ok(MonthYear::current()),
    }
}

/// Parse an optional view argument, falling back to the configured default
pub(crate) fn parse_view(input: Option<&str>, default: ViewMode) -> DreResult<ViewMode> {
    match input {
        Some(s) => ViewMode::parse(s)
            .ok_or_else(|| DreError::Validation(format!("Invalid view '{}'. Use cash or accrual", s))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1500", "amount").unwrap(), Money::from_units(1_500));
        assert_eq!(
            parse_money("1500.50", "amount").unwrap(),
            Money::from_cents(150_050)
        );

        let err = parse_money("abc", "amount").unwrap_err();
        assert!(err.to_string().contains("Invalid amount 'abc'"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-03").unwrap(), MonthYear::new(3, 2026));
        assert_eq!(parse_month("2026-12").unwrap(), MonthYear::new(12, 2026));
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("2026").is_err());
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn test_parse_view_defaults() {
        assert_eq!(parse_view(None, ViewMode::Accrual).unwrap(), ViewMode::Accrual);
        assert_eq!(parse_view(Some("cash"), ViewMode::Accrual).unwrap(), ViewMode::Cash);
        assert!(parse_view(Some("imaginary"), ViewMode::Cash).is_err());
    }
}
