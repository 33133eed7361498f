//! Trailing result trend report
//!
//! Renders the monthly operating and global results for the twelve
//! months ending at a reference month, oldest first. Useful for
//! spotting seasonality and drift that a single-window statement hides.

use std::io::Write;

use crate::error::{DreError, DreResult};
use crate::models::{month_abbrev, month_name, Money, MonthYear, ViewMode};
use crate::statement::{trailing_months, TrendPoint, TREND_MONTHS};
use crate::storage::Storage;

const WIDTH: usize = 50;

/// Trailing monthly results ending at a reference month
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub through: MonthYear,
    pub view: ViewMode,
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    /// Generate the trend for the `TREND_MONTHS` ending at `through`
    pub fn generate(storage: &Storage, through: MonthYear, view: ViewMode) -> DreResult<Self> {
        let snapshot = storage.ledger.snapshot();
        let points = trailing_months(&snapshot, through, TREND_MONTHS, view);

        Ok(Self {
            through,
            view,
            points,
        })
    }

    fn view_label(&self) -> &'static str {
        match self.view {
            ViewMode::Cash => "cash view",
            ViewMode::Accrual => "accrual view",
        }
    }

    fn average_operating(&self) -> Money {
        if self.points.is_empty() {
            return Money::zero();
        }
        let total: i64 = self.points.iter().map(|p| p.operating_result.cents()).sum();
        Money::from_cents(total / self.points.len() as i64)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Result trend\n");
        output.push_str(&format!(
            "{} months through {} {} ({})\n",
            self.points.len(),
            month_name(self.through.month),
            self.through.year,
            self.view_label()
        ));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>18} {:>18}\n",
            "Month", "Operating", "Global"
        ));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!(
                "{:<10} {:>18} {:>18}\n",
                format!("{} {}", month_abbrev(point.month.month), point.month.year),
                point.operating_result,
                point.global_result
            ));
        }

        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>18}\n",
            "Average",
            self.average_operating()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> DreResult<()> {
        writeln!(writer, "Month,Operating Result,Global Result")
            .map_err(|e| DreError::Export(e.to_string()))?;

        for point in &self.points {
            writeln!(
                writer,
                "{},{:.2},{:.2}",
                point.month,
                point.operating_result.cents() as f64 / 100.0,
                point.global_result.cents() as f64 / 100.0
            )
            .map_err(|e| DreError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrePaths;
    use crate::models::{
        BankTransaction, Category, CategoryKind, Direction, Entity, EntityKind, Institution,
        InstitutionKind, LineKind, ReportGroup,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DrePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::open(paths).unwrap();

        let entity = Entity::new("Household", EntityKind::Personal);
        let bank = Institution::new("Main bank", InstitutionKind::Bank, entity.id, Money::zero());
        let salary = Category::new("Salary", ReportGroup::OperatingRevenue, CategoryKind::Income);
        let groceries = Category::new(
            "Groceries",
            ReportGroup::SurvivalCost,
            CategoryKind::Expense,
        );

        // Steady salary for the first half of 2026, stepped-up groceries in March.
        for month in 1..=6 {
            storage
                .ledger
                .bank_transactions
                .push(BankTransaction::with_details(
                    entity.id,
                    bank.id,
                    date(2026, month, 5),
                    Direction::In,
                    Money::from_units(3_000),
                    Some(salary.id),
                    "Salary",
                    LineKind::Operational,
                ));
            let spend = if month == 3 { 1_500 } else { 1_000 };
            storage
                .ledger
                .bank_transactions
                .push(BankTransaction::with_details(
                    entity.id,
                    bank.id,
                    date(2026, month, 10),
                    Direction::Out,
                    Money::from_units(spend),
                    Some(groceries.id),
                    "Groceries",
                    LineKind::Operational,
                ));
        }

        storage.ledger.entities.push(entity);
        storage.ledger.institutions.push(bank);
        storage.ledger.categories.push(salary);
        storage.ledger.categories.push(groceries);

        (temp_dir, storage)
    }

    #[test]
    fn test_trend_covers_twelve_months_oldest_first() {
        let (_temp, storage) = seed_storage();

        let through = MonthYear::new(6, 2026);
        let report = TrendReport::generate(&storage, through, ViewMode::Cash).unwrap();

        assert_eq!(report.points.len(), 12);
        assert_eq!(report.points[0].month, MonthYear::new(7, 2025));
        assert_eq!(report.points[11].month, through);
    }

    #[test]
    fn test_trend_reflects_monthly_results() {
        let (_temp, storage) = seed_storage();

        let report =
            TrendReport::generate(&storage, MonthYear::new(6, 2026), ViewMode::Cash).unwrap();

        // 2025 months have no activity.
        assert!(report.points[0].operating_result.is_zero());
        // January 2026: 3000 in, 1000 out.
        let january = &report.points[6];
        assert_eq!(january.month, MonthYear::new(1, 2026));
        assert_eq!(january.operating_result, Money::from_units(2_000));
        // March 2026 carries the grocery step-up.
        let march = &report.points[8];
        assert_eq!(march.operating_result, Money::from_units(1_500));
    }

    #[test]
    fn test_terminal_output() {
        let (_temp, storage) = seed_storage();

        let report =
            TrendReport::generate(&storage, MonthYear::new(6, 2026), ViewMode::Cash).unwrap();
        let output = report.format_terminal();

        assert!(output.contains("Result trend"));
        assert!(output.contains("12 months through June 2026 (cash view)"));
        assert!(output.contains("Mar 2026"));
        assert!(output.contains("$1500.00"));
        assert!(output.contains("Average"));
    }

    #[test]
    fn test_csv_export() {
        let (_temp, storage) = seed_storage();

        let report =
            TrendReport::generate(&storage, MonthYear::new(6, 2026), ViewMode::Cash).unwrap();
        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("Month,Operating Result,Global Result"));
        assert!(csv.contains("2026-01,2000.00,2000.00"));
        assert!(csv.contains("2026-03,1500.00,1500.00"));
        assert!(csv.contains("2025-07,0.00,0.00"));
    }
}
