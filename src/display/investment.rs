//! Investment display formatting
//!
//! Formats assets and their monthly snapshots for terminal output.

use crate::models::{Asset, Institution, InvestmentSnapshot};

/// Format a list of assets as a table
pub fn format_asset_list(assets: &[Asset], institutions: &[Institution]) -> String {
    if assets.is_empty() {
        return "No assets found.".to_string();
    }

    let name_width = assets.iter().map(|a| a.name.len()).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:<20}  {}\n",
        "Name",
        "Class",
        "Institution",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:-<20}  {:-<12}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for asset in assets {
        let institution_name = institutions
            .iter()
            .find(|i| i.id == asset.institution_id)
            .map(|i| i.name.as_str())
            .unwrap_or("(unknown)");

        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:<20}  {}\n",
            asset.name,
            asset.class.to_string(),
            institution_name,
            asset.id,
            name_width = name_width,
        ));
    }

    output
}

/// Format a list of snapshots as a table
///
/// Callers pass the snapshots already filtered to one asset (or mixed,
/// for a global listing with the asset name resolved per row).
pub fn format_snapshot_list(snapshots: &[InvestmentSnapshot], assets: &[Asset]) -> String {
    if snapshots.is_empty() {
        return "No snapshots found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:9} {:20} {:>14} {:>12} {:>12} {:>12}\n",
        "Month", "Asset", "Closing", "Contrib", "Withdraw", "Yield"
    ));
    output.push_str(&"-".repeat(85));
    output.push('\n');

    for snapshot in snapshots {
        let asset_name = assets
            .iter()
            .find(|a| a.id == snapshot.asset_id)
            .map(|a| a.name.as_str())
            .unwrap_or("(unknown)");

        output.push_str(&format!(
            "{:9} {:20} {:>14} {:>12} {:>12} {:>12}\n",
            snapshot.month.to_string(),
            truncate(asset_name, 20),
            snapshot.closing_balance,
            snapshot.contributions,
            snapshot.withdrawals,
            snapshot.yield_amount,
        ));
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
        AssetClass, EntityKind, InstitutionKind, Money, MonthYear,
    };
    use crate::models::{Entity, Institution};

    fn sample() -> (Entity, Institution, Asset) {
        let entity = Entity::new("Household", EntityKind::Personal);
        let brokerage = Institution::new(
            "Brokerage",
            InstitutionKind::Brokerage,
            entity.id,
            Money::zero(),
        );
        let asset = Asset::new(
            "Index fund",
            AssetClass::Equities,
            brokerage.id,
            entity.id,
        );
        (entity, brokerage, asset)
    }

    #[test]
    fn test_format_asset_list() {
        let (_entity, brokerage, asset) = sample();

        let output = format_asset_list(
            std::slice::from_ref(&asset),
            std::slice::from_ref(&brokerage),
        );
        assert!(output.contains("Index fund"));
        assert!(output.contains("equities"));
        assert!(output.contains("Brokerage"));
    }

    #[test]
    fn test_format_empty_asset_list() {
        let output = format_asset_list(&[], &[]);
        assert!(output.contains("No assets found"));
    }

    #[test]
    fn test_format_snapshot_list() {
        let (_entity, _brokerage, asset) = sample();
        let snapshot = InvestmentSnapshot::new(
            asset.id,
            MonthYear::new(1, 2026),
            Money::from_units(10_100),
            Money::from_units(10_000),
            Money::zero(),
            Money::from_units(100),
        );

        let output =
            format_snapshot_list(std::slice::from_ref(&snapshot), std::slice::from_ref(&asset));
        assert!(output.contains("2026-01"));
        assert!(output.contains("Index fund"));
        assert!(output.contains("$10100.00"));
        assert!(output.contains("$100.00"));
    }
}
