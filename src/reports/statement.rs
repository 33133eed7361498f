//! Management income statement report
//!
//! Renders one aggregation run as the fixed-structure statement: operating
//! revenue, the three cost-of-living groups, the operating result, the
//! wealth section, and the global result. Vertical analysis (AV%) relates
//! each group to operating revenue and is left blank when revenue is zero.

use std::io::Write;

use crate::error::{DreError, DreResult};
use crate::models::{Money, ReportGroup, ReportWindow, ViewMode};
use crate::statement::{aggregate, AggregateResult, GroupBreakdown};
use crate::storage::Storage;

const WIDTH: usize = 80;

/// Income statement for one window and view mode
#[derive(Debug, Clone)]
pub struct StatementReport {
    pub result: AggregateResult,
}

impl StatementReport {
    /// Run the engine over the stored ledger
    pub fn generate(storage: &Storage, window: ReportWindow, view: ViewMode) -> DreResult<Self> {
        let result = aggregate(&storage.ledger.snapshot(), window, view);
        Ok(Self { result })
    }

    /// Vertical analysis of a signed total against operating revenue
    ///
    /// `None` when revenue is zero; the column renders blank instead of a
    /// division artifact.
    pub fn vertical_pct(&self, total: Money) -> Option<f64> {
        let revenue = self.result.operating_revenue;
        if revenue.is_zero() {
            return None;
        }
        Some(total.cents().abs() as f64 / revenue.cents().abs() as f64 * 100.0)
    }

    fn av_cell(&self, total: Money) -> String {
        match self.vertical_pct(total) {
            Some(pct) => format!("{:>7.1}%", pct),
            None => format!("{:>8}", ""),
        }
    }

    fn view_label(&self) -> &'static str {
        match self.result.view {
            ViewMode::Cash => "cash view",
            ViewMode::Accrual => "accrual view",
        }
    }

    fn push_group(&self, output: &mut String, breakdown: &GroupBreakdown, detail: bool) {
        output.push_str(&format!(
            "{:<35} {:>12} {}\n",
            breakdown.group.label(),
            breakdown.total,
            self.av_cell(breakdown.total)
        ));

        for category in &breakdown.categories {
            output.push_str(&format!("  {:<33} {:>12}\n", category.name, category.total));
            if detail {
                for line in &category.lines {
                    output.push_str(&format!(
                        "    {}  {:<32} {:>12}\n",
                        line.date,
                        truncate(&format!("{} ({})", line.description, line.source), 32),
                        line.amount
                    ));
                }
            }
        }
    }

    fn push_total(&self, output: &mut String, label: &str, total: Money) {
        output.push_str(&format!(
            "{:<35} {:>12} {}\n",
            label,
            total,
            self.av_cell(total)
        ));
    }

    /// Format the report for terminal display
    ///
    /// `detail` adds the contributing lines under each category.
    pub fn format_terminal(&self, detail: bool) -> String {
        let mut output = String::new();

        output.push_str("Income statement\n");
        output.push_str(&format!(
            "{} ({})\n",
            self.result.window.label(),
            self.view_label()
        ));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!("{:<35} {:>12} {:>8}\n", "", "Amount", "AV%"));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for &group in ReportGroup::all() {
            if group.is_operating() {
                if let Some(breakdown) = self.result.group(group) {
                    self.push_group(&mut output, breakdown, detail);
                }
            }
        }

        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        self.push_total(&mut output, "Operating result", self.result.operating_result);
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for group in [
            ReportGroup::NonOperating,
            ReportGroup::FinancialVariation,
            ReportGroup::RealizedInvestments,
        ] {
            if let Some(breakdown) = self.result.group(group) {
                self.push_group(&mut output, breakdown, detail);
            }
        }

        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        self.push_total(&mut output, "Wealth result", self.result.wealth_result);
        self.push_total(&mut output, "Global result", self.result.global_result);

        let transfers = self.result.group_total(ReportGroup::InternalTransfers);
        if !transfers.is_zero() {
            output.push_str(&format!(
                "\n{:<35} {:>12}   (excluded from results)\n",
                ReportGroup::InternalTransfers.label(),
                transfers
            ));
        }

        if self.result.unclassified > 0 {
            output.push_str(&format!(
                "\nUnclassified lines: {} (sum {})\n",
                self.result.unclassified, self.result.unclassified_amount
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> DreResult<()> {
        writeln!(writer, "Window,View,Group,Category,Amount,AV Pct")
            .map_err(|e| DreError::Export(e.to_string()))?;

        let window = self.result.window.label();
        let view = self.view_label();

        for breakdown in &self.result.groups {
            writeln!(
                writer,
                "{},{},{},,{:.2},{}",
                window,
                view,
                breakdown.group.label(),
                breakdown.total.cents() as f64 / 100.0,
                self.vertical_pct(breakdown.total)
                    .map(|p| format!("{:.1}", p))
                    .unwrap_or_default()
            )
            .map_err(|e| DreError::Export(e.to_string()))?;

            for category in &breakdown.categories {
                writeln!(
                    writer,
                    "{},{},{},{},{:.2},",
                    window,
                    view,
                    breakdown.group.label(),
                    category.name,
                    category.total.cents() as f64 / 100.0
                )
                .map_err(|e| DreError::Export(e.to_string()))?;
            }
        }

        for (label, total) in [
            ("Operating result", self.result.operating_result),
            ("Wealth result", self.result.wealth_result),
            ("Global result", self.result.global_result),
        ] {
            writeln!(
                writer,
                "{},{},{},,{:.2},{}",
                window,
                view,
                label,
                total.cents() as f64 / 100.0,
                self.vertical_pct(total)
                    .map(|p| format!("{:.1}", p))
                    .unwrap_or_default()
            )
            .map_err(|e| DreError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
