//! Fixed asset and liability display formatting

use crate::models::{FixedAsset, Liability, Money};

/// Format a list of fixed assets as a table
pub fn format_fixed_asset_list(assets: &[FixedAsset]) -> String {
    if assets.is_empty() {
        return "No fixed assets found.".to_string();
    }

    let name_width = assets.iter().map(|a| a.name.len()).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {:>14}  {:>14}\n",
        "Name",
        "Kind",
        "Acquired",
        "Market",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:->14}  {:->14}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for asset in assets {
        output.push_str(&format!(
            "{:<name_width$}  {:<10}  {:>14}  {:>14}\n",
            asset.name,
            asset.kind.to_string(),
            asset.acquisition_value.to_string(),
            asset.market_value.to_string(),
            name_width = name_width,
        ));
    }

    let total: Money = assets.iter().map(|a| a.market_value).sum();
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:->14}  {:->14}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {:>14}  {:>14}\n",
        "TOTAL",
        "",
        "",
        total.to_string(),
        name_width = name_width,
    ));

    output
}

/// Format a list of liabilities as a table
pub fn format_liability_list(liabilities: &[Liability]) -> String {
    if liabilities.is_empty() {
        return "No liabilities found.".to_string();
    }

    let name_width = liabilities
        .iter()
        .map(|l| l.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:>14}\n",
        "Name",
        "Kind",
        "Outstanding",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:->14}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for liability in liabilities {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:>14}\n",
            liability.name,
            liability.kind.to_string(),
            liability.outstanding_balance.to_string(),
            name_width = name_width,
        ));
    }

    let total: Money = liabilities.iter().map(|l| l.outstanding_balance).sum();
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:->14}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:>14}\n",
        "TOTAL",
        "",
        total.to_string(),
        name_width = name_width,
    ));

    output
}
