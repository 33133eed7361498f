//! Net worth report
//!
//! A point-in-time photograph at the end of a reference month: cash
//! accounts (opening balance plus transaction deltas), investments (latest
//! snapshot at or before the month), fixed assets at market value, minus
//! liabilities and open card invoices. Optionally filtered to one holding
//! entity.

use std::io::Write;

use crate::error::{DreError, DreResult};
use crate::models::{month_name, EntityId, Money, MonthYear};
use crate::storage::Storage;

const WIDTH: usize = 70;

/// One valued position inside a section
#[derive(Debug, Clone)]
pub struct NetWorthItem {
    pub name: String,
    /// Kind detail shown next to the name
    pub detail: String,
    /// Signed contribution to net worth
    pub value: Money,
}

/// One section of the net worth statement
#[derive(Debug, Clone)]
pub struct NetWorthSection {
    pub label: &'static str,
    pub items: Vec<NetWorthItem>,
    pub total: Money,
}

impl NetWorthSection {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            items: Vec::new(),
            total: Money::zero(),
        }
    }

    fn add(&mut self, item: NetWorthItem) {
        self.total += item.value;
        self.items.push(item);
    }
}

/// Net worth at the end of a reference month
#[derive(Debug, Clone)]
pub struct NetWorthReport {
    pub reference: MonthYear,
    /// Entity filter, when one was applied
    pub entity_name: Option<String>,
    /// Cash accounts, investments, fixed assets, liabilities, open invoices
    pub sections: Vec<NetWorthSection>,
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub net_worth: Money,
}

impl NetWorthReport {
    /// Value every position at the end of the reference month
    pub fn generate(
        storage: &Storage,
        reference: MonthYear,
        entity: Option<EntityId>,
    ) -> DreResult<Self> {
        let ledger = &storage.ledger;
        let entity_name = match entity {
            Some(id) => Some(
                ledger
                    .entity(id)
                    .map(|e| e.name.clone())
                    .ok_or_else(|| DreError::entity_not_found(id.to_string()))?,
            ),
            None => None,
        };

        let cutoff = reference
            .shift(1)
            .first_day()
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| DreError::Validation(format!("Invalid reference month {}", reference)))?;

        let owned = |owner: EntityId| entity.map_or(true, |id| id == owner);

        // Cash accounts: opening balance plus every signed movement
        // through the cutoff
        let mut banks = NetWorthSection::new("Cash accounts");
        for institution in &ledger.institutions {
            if !institution.kind.holds_cash_balance() || !owned(institution.entity_id) {
                continue;
            }
            let deltas: Money = ledger
                .bank_transactions
                .iter()
                .filter(|t| t.institution_id == institution.id && t.date <= cutoff)
                .map(|t| t.signed_amount())
                .sum();
            banks.add(NetWorthItem {
                name: institution.name.clone(),
                detail: institution.kind.to_string(),
                value: institution.opening_balance + deltas,
            });
        }

        // Investments: each asset at its latest snapshot on or before the
        // reference month; assets with no snapshot yet contribute nothing
        let mut investments = NetWorthSection::new("Investments");
        for asset in &ledger.assets {
            if !owned(asset.entity_id) {
                continue;
            }
            if let Some(snapshot) = ledger.latest_snapshot_through(asset.id, reference) {
                investments.add(NetWorthItem {
                    name: asset.name.clone(),
                    detail: asset.class.to_string(),
                    value: snapshot.closing_balance,
                });
            }
        }

        let mut fixed = NetWorthSection::new("Fixed assets");
        for asset in &ledger.fixed_assets {
            if !owned(asset.entity_id) {
                continue;
            }
            fixed.add(NetWorthItem {
                name: asset.name.clone(),
                detail: asset.kind.to_string(),
                value: asset.market_value,
            });
        }

        let mut liabilities = NetWorthSection::new("Liabilities");
        for liability in &ledger.liabilities {
            if !owned(liability.entity_id) {
                continue;
            }
            liabilities.add(NetWorthItem {
                name: liability.name.clone(),
                detail: liability.kind.to_string(),
                value: -liability.outstanding_balance,
            });
        }

        // Open card invoices: unpaid installments already invoiced by the
        // reference month
        let mut invoices = NetWorthSection::new("Open card invoices");
        for card in &ledger.cards {
            if !owned(card.entity_id) {
                continue;
            }
            let open: Money = ledger
                .card_transactions
                .iter()
                .filter(|t| {
                    t.card_id == card.id && t.status.is_open() && t.invoice_month <= reference
                })
                .map(|t| t.amount)
                .sum();
            if !open.is_zero() {
                invoices.add(NetWorthItem {
                    name: card.name.clone(),
                    detail: card.network.to_string(),
                    value: -open,
                });
            }
        }

        let total_assets = banks.total + investments.total + fixed.total;
        let total_liabilities = liabilities.total + invoices.total;
        let net_worth = total_assets + total_liabilities;

        Ok(Self {
            reference,
            entity_name,
            sections: vec![banks, investments, fixed, liabilities, invoices],
            total_assets,
            total_liabilities,
            net_worth,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Net worth at end of {} {}\n",
            month_name(self.reference.month),
            self.reference.year
        ));
        if let Some(name) = &self.entity_name {
            output.push_str(&format!("Entity: {}\n", name));
        }
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        for section in &self.sections {
            if section.items.is_empty() {
                continue;
            }
            output.push_str(&format!("\n{}\n", section.label.to_uppercase()));
            for item in &section.items {
                output.push_str(&format!(
                    "  {:<30} {:<12} {:>14}\n",
                    item.name, item.detail, item.value
                ));
            }
            output.push_str(&format!(
                "  {:<43} {:>14}\n",
                "Subtotal:", section.total
            ));
        }

        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<45} {:>14}\n",
            "Total assets", self.total_assets
        ));
        output.push_str(&format!(
            "{:<45} {:>14}\n",
            "Total liabilities",
            self.total_liabilities.abs()
        ));
        output.push_str(&format!("{:<45} {:>14}\n", "Net worth", self.net_worth));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> DreResult<()> {
        writeln!(writer, "Section,Name,Detail,Value")
            .map_err(|e| DreError::Export(e.to_string()))?;

        for section in &self.sections {
            for item in &section.items {
                writeln!(
                    writer,
                    "{},{},{},{:.2}",
                    section.label,
                    item.name,
                    item.detail,
                    item.value.cents() as f64 / 100.0
                )
                .map_err(|e| DreError::Export(e.to_string()))?;
            }
        }

        writeln!(writer).map_err(|e| DreError::Export(e.to_string()))?;
        writeln!(
            writer,
            "SUMMARY,Total assets,,{:.2}",
            self.total_assets.cents() as f64 / 100.0
        )
        .map_err(|e| DreError::Export(e.to_string()))?;
        writeln!(
            writer,
            "SUMMARY,Total liabilities,,{:.2}",
            self.total_liabilities.cents() as f64 / 100.0
        )
        .map_err(|e| DreError::Export(e.to_string()))?;
        writeln!(
            writer,
            "SUMMARY,Net worth,,{:.2}",
            self.net_worth.cents() as f64 / 100.0
        )
        .map_err(|e| DreError::Export(e.to_string()))?;

        Ok(())
    }

    /// Number of valued positions across every section
    pub fn position_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
