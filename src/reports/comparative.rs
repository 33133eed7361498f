//! Year-over-year comparison report
//!
//! Two annual statement columns side by side with a variation column.
//! Each column is exactly what the standalone annual report for that year
//! shows; the variation is undefined (rendered "n/a") when the prior
//! year's total is zero.

use std::io::Write;

use crate::error::{DreError, DreResult};
use crate::models::{ReportGroup, ViewMode};
use crate::statement::{compare_years, ComparativeResult, TotalComparison};
use crate::storage::Storage;

const WIDTH: usize = 80;

/// Year-over-year statement comparison
#[derive(Debug, Clone)]
pub struct ComparativeReport {
    pub comparison: ComparativeResult,
}

impl ComparativeReport {
    /// Compare one fiscal year against the year before it
    pub fn generate(storage: &Storage, year: i32, view: ViewMode) -> DreResult<Self> {
        let comparison = compare_years(&storage.ledger.snapshot(), year, view);
        Ok(Self { comparison })
    }

    fn view_label(&self) -> &'static str {
        match self.comparison.view {
            ViewMode::Cash => "cash view",
            ViewMode::Accrual => "accrual view",
        }
    }

    fn push_total(&self, output: &mut String, label: &str, row: &TotalComparison) {
        output.push_str(&format!(
            "{:<30} {:>14} {:>14} {:>9}\n",
            label,
            row.current.to_string(),
            row.prior.to_string(),
            row.variation.to_string()
        ));
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Comparative income statement\n");
        output.push_str(&format!(
            "{} vs {} ({})\n",
            self.comparison.current_year(),
            self.comparison.prior_year(),
            self.view_label()
        ));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>14} {:>14} {:>9}\n",
            "",
            self.comparison.current_year(),
            self.comparison.prior_year(),
            "Var"
        ));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for row in &self.comparison.groups {
            if row.group == ReportGroup::InternalTransfers
                && row.current.is_zero()
                && row.prior.is_zero()
            {
                continue;
            }
            output.push_str(&format!(
                "{:<30} {:>14} {:>14} {:>9}\n",
                row.group.label(),
                row.current.to_string(),
                row.prior.to_string(),
                row.variation.to_string()
            ));
        }

        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        self.push_total(
            &mut output,
            "Operating result",
            &self.comparison.operating_result,
        );
        self.push_total(&mut output, "Wealth result", &self.comparison.wealth_result);
        self.push_total(&mut output, "Global result", &self.comparison.global_result);

        let unclassified =
            self.comparison.current.unclassified + self.comparison.prior.unclassified;
        if unclassified > 0 {
            output.push_str(&format!("\nUnclassified lines: {}\n", unclassified));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> DreResult<()> {
        writeln!(
            writer,
            "Group,Current Year,Current,Prior Year,Prior,Variation Pct"
        )
        .map_err(|e| DreError::Export(e.to_string()))?;

        let current_year = self.comparison.current_year();
        let prior_year = self.comparison.prior_year();

        for row in &self.comparison.groups {
            writeln!(
                writer,
                "{},{},{:.2},{},{:.2},{}",
                row.group.label(),
                current_year,
                row.current.cents() as f64 / 100.0,
                prior_year,
                row.prior.cents() as f64 / 100.0,
                row.variation
                    .as_pct()
                    .map(|p| format!("{:.1}", p))
                    .unwrap_or_default()
            )
            .map_err(|e| DreError::Export(e.to_string()))?;
        }

        for (label, row) in [
            ("Operating result", &self.comparison.operating_result),
            ("Wealth result", &self.comparison.wealth_result),
            ("Global result", &self.comparison.global_result),
        ] {
            writeln!(
                writer,
                "{},{},{:.2},{},{:.2},{}",
                label,
                current_year,
                row.current.cents() as f64 / 100.0,
                prior_year,
                row.prior.cents() as f64 / 100.0,
                row.variation
                    .as_pct()
                    .map(|p| format!("{:.1}", p))
                    .unwrap_or_default()
            )
            .map_err(|e| DreError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DrePaths;
    use crate::models::{
        BankTransaction, Category, CategoryKind, Direction, Entity, EntityKind, Institution,
        InstitutionKind, LineKind, Money,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn seed_two_years(storage: &mut Storage) {
        let entity = Entity::new("Household", EntityKind::Personal);
        let bank = Institution::new("Main bank", InstitutionKind::Bank, entity.id, Money::zero());
        let salary = Category::new("Salary", ReportGroup::OperatingRevenue, CategoryKind::Income);

        for (year, units) in [(2025, 1_000), (2026, 1_500)] {
            storage
                .ledger
                .bank_transactions
                .push(BankTransaction::with_details(
                    entity.id,
                    bank.id,
                    date(year, 6, 1),
                    Direction::In,
                    Money::from_units(units),
                    Some(salary.id),
                    "Salary",
                    LineKind::Operational,
                ));
        }

        storage.ledger.entities.push(entity);
        storage.ledger.institutions.push(bank);
        storage.ledger.categories.push(salary);
    }

    #[test]
    fn test_generate_comparative() {
        let (_temp_dir, mut storage) = create_test_storage();
        seed_two_years(&mut storage);

        let report = ComparativeReport::generate(&storage, 2026, ViewMode::Accrual).unwrap();

        assert_eq!(report.comparison.current_year(), 2026);
        assert_eq!(
            report.comparison.operating_revenue.current,
            Money::from_units(1_500)
        );
        assert_eq!(
            report.comparison.operating_revenue.prior,
            Money::from_units(1_000)
        );
    }

    #[test]
    fn test_terminal_format() {
        let (_temp_dir, mut storage) = create_test_storage();
        seed_two_years(&mut storage);

        let report = ComparativeReport::generate(&storage, 2026, ViewMode::Accrual).unwrap();
        let rendered = report.format_terminal();

        assert!(rendered.contains("2026 vs 2025"));
        assert!(rendered.contains("Operating revenue"));
        assert!(rendered.contains("+50.0%"));
        assert!(rendered.contains("Global result"));
    }

    #[test]
    fn test_variation_na_rendered() {
        let (_temp_dir, mut storage) = create_test_storage();
        // Only the current year has activity
        let entity = Entity::new("Household", EntityKind::Personal);
        let bank = Institution::new("Main bank", InstitutionKind::Bank, entity.id, Money::zero());
        let salary = Category::new("Salary", ReportGroup::OperatingRevenue, CategoryKind::Income);
        storage
            .ledger
            .bank_transactions
            .push(BankTransaction::with_details(
                entity.id,
                bank.id,
                date(2026, 3, 1),
                Direction::In,
                Money::from_units(500),
                Some(salary.id),
                "Salary",
                LineKind::Operational,
            ));
        storage.ledger.entities.push(entity);
        storage.ledger.institutions.push(bank);
        storage.ledger.categories.push(salary);

        let report = ComparativeReport::generate(&storage, 2026, ViewMode::Accrual).unwrap();
        assert!(report.format_terminal().contains("n/a"));
    }

    #[test]
    fn test_csv_export() {
        let (_temp_dir, mut storage) = create_test_storage();
        seed_two_years(&mut storage);

        let report = ComparativeReport::generate(&storage, 2026, ViewMode::Accrual).unwrap();
        let mut csv_output = Vec::new();
        report.export_csv(&mut csv_output).unwrap();
        let csv_string = String::from_utf8(csv_output).unwrap();

        assert!(csv_string.contains("Group,Current Year"));
        assert!(csv_string.contains("Operating revenue,2026,1500.00,2025,1000.00,50.0"));
    }
}
