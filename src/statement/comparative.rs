//! Year-over-year comparison
//!
//! A comparative run is two plain annual runs, current year and the year
//! before, surfaced side by side with a variation column. No blending:
//! each column is exactly what a standalone annual report for that year
//! would show.

use std::fmt;

use super::aggregate::{aggregate, AggregateResult};
use super::snapshot::LedgerSnapshot;
use crate::models::{Money, ReportGroup, ReportWindow, ViewMode};

/// Percentage change between two signed totals, when defined
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variation {
    /// `(current - prior) / |prior| * 100`
    Pct(f64),
    /// Prior total was zero; no meaningful percentage exists
    Unavailable,
}

impl Variation {
    /// Variation from `prior` to `current`
    pub fn between(current: Money, prior: Money) -> Self {
        if prior.is_zero() {
            return Self::Unavailable;
        }
        let delta = (current - prior).cents() as f64;
        Self::Pct(delta / prior.abs().cents() as f64 * 100.0)
    }

    /// The percentage, when one exists
    pub fn as_pct(&self) -> Option<f64> {
        match self {
            Self::Pct(p) => Some(*p),
            Self::Unavailable => None,
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pct(p) => write!(f, "{:+.1}%", p),
            Self::Unavailable => write!(f, "n/a"),
        }
    }
}

/// One report group across both years
#[derive(Debug, Clone)]
pub struct GroupComparison {
    pub group: ReportGroup,
    pub current: Money,
    pub prior: Money,
    pub variation: Variation,
}

/// One roll-up total across both years
#[derive(Debug, Clone)]
pub struct TotalComparison {
    pub current: Money,
    pub prior: Money,
    pub variation: Variation,
}

impl TotalComparison {
    fn between(current: Money, prior: Money) -> Self {
        Self {
            current,
            prior,
            variation: Variation::between(current, prior),
        }
    }
}

/// Output of a year-over-year run
#[derive(Debug, Clone)]
pub struct ComparativeResult {
    /// View mode both runs used
    pub view: ViewMode,
    /// The current year's full annual run, drill-down included
    pub current: AggregateResult,
    /// The prior year's full annual run
    pub prior: AggregateResult,
    /// All eight groups in statement order
    pub groups: Vec<GroupComparison>,
    pub operating_revenue: TotalComparison,
    pub operating_result: TotalComparison,
    pub wealth_result: TotalComparison,
    pub global_result: TotalComparison,
}

impl ComparativeResult {
    pub fn current_year(&self) -> i32 {
        self.current.window.year
    }

    pub fn prior_year(&self) -> i32 {
        self.prior.window.year
    }

    /// Comparison row for one group
    pub fn group(&self, group: ReportGroup) -> Option<&GroupComparison> {
        self.groups.iter().find(|g| g.group == group)
    }
}

/// Compare one fiscal year against the year before it.
///
/// Runs the engine twice over the same snapshot; records are attributed
/// to whichever year their effective date falls in, so an installment
/// schedule crossing the year boundary splits between the two columns in
/// cash view.
pub fn compare_years(
    snapshot: &LedgerSnapshot<'_>,
    year: i32,
    view: ViewMode,
) -> ComparativeResult {
    let current_window = ReportWindow::annual(year);
    let current = aggregate(snapshot, current_window, view);
    let prior = aggregate(snapshot, current_window.prior_year_annual(), view);

    let groups = ReportGroup::all()
        .iter()
        .map(|&group| {
            let cur = current.group_total(group);
            let pre = prior.group_total(group);
            GroupComparison {
                group,
                current: cur,
                prior: pre,
                variation: Variation::between(cur, pre),
            }
        })
        .collect();

    let operating_revenue =
        TotalComparison::between(current.operating_revenue, prior.operating_revenue);
    let operating_result =
        TotalComparison::between(current.operating_result, prior.operating_result);
    let wealth_result = TotalComparison::between(current.wealth_result, prior.wealth_result);
    let global_result = TotalComparison::between(current.global_result, prior.global_result);

    ComparativeResult {
        view,
        current,
        prior,
        groups,
        operating_revenue,
        operating_result,
        wealth_result,
        global_result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BankTransaction, CardNetwork, CardTransaction, Category, CategoryKind, CreditCard,
        Direction, Entity, EntityKind, Institution, InstitutionKind, LineKind, MonthYear,
        PurchaseGroupId,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        entity: Entity,
        bank: Institution,
        card: CreditCard,
        categories: Vec<Category>,
        bank_transactions: Vec<BankTransaction>,
        card_transactions: Vec<CardTransaction>,
    }

    impl Fixture {
        fn new() -> Self {
            let entity = Entity::new("Household", EntityKind::Personal);
            let bank = Institution::new(
                "Main bank",
                InstitutionKind::Bank,
                entity.id,
                Money::zero(),
            );
            let card = CreditCard::new(
                "Rewards card",
                CardNetwork::Mastercard,
                entity.id,
                10,
                20,
                Money::from_units(5_000),
            );
            let categories = vec![
                Category::new("Salary", ReportGroup::OperatingRevenue, CategoryKind::Income),
                Category::new("Groceries", ReportGroup::SurvivalCost, CategoryKind::Expense),
                Category::new("Travel", ReportGroup::ComfortCost, CategoryKind::Expense),
            ];
            Self {
                entity,
                bank,
                card,
                categories,
                bank_transactions: Vec::new(),
                card_transactions: Vec::new(),
            }
        }

        fn snapshot(&self) -> LedgerSnapshot<'_> {
            LedgerSnapshot {
                bank_transactions: &self.bank_transactions,
                card_transactions: &self.card_transactions,
                categories: &self.categories,
                institutions: std::slice::from_ref(&self.bank),
                cards: std::slice::from_ref(&self.card),
                ..Default::default()
            }
        }

        fn add_bank(&mut self, on: NaiveDate, direction: Direction, cents: i64, category: &str) {
            let id = self
                .categories
                .iter()
                .find(|c| c.name == category)
                .map(|c| c.id);
            self.bank_transactions.push(BankTransaction::with_details(
                self.entity.id,
                self.bank.id,
                on,
                direction,
                Money::from_cents(cents),
                id,
                category,
                LineKind::Operational,
            ));
        }
    }

    #[test]
    fn test_columns_match_standalone_annual_runs() {
        let mut fx = Fixture::new();
        fx.add_bank(date(2025, 3, 1), Direction::In, 100_000, "Salary");
        fx.add_bank(date(2025, 8, 10), Direction::Out, 30_000, "Travel");
        fx.add_bank(date(2026, 3, 1), Direction::In, 150_000, "Salary");
        fx.add_bank(date(2026, 5, 5), Direction::Out, 20_000, "Groceries");

        let snapshot = fx.snapshot();
        let comparison = compare_years(&snapshot, 2026, ViewMode::Accrual);
        let annual_2026 = aggregate(&snapshot, ReportWindow::annual(2026), ViewMode::Accrual);
        let annual_2025 = aggregate(&snapshot, ReportWindow::annual(2025), ViewMode::Accrual);

        assert_eq!(comparison.current_year(), 2026);
        assert_eq!(comparison.prior_year(), 2025);
        for row in &comparison.groups {
            assert_eq!(row.current, annual_2026.group_total(row.group));
            assert_eq!(row.prior, annual_2025.group_total(row.group));
        }
        assert_eq!(
            comparison.operating_result.current,
            annual_2026.operating_result
        );
        assert_eq!(
            comparison.operating_result.prior,
            annual_2025.operating_result
        );
        assert_eq!(comparison.global_result.current, annual_2026.global_result);
    }

    #[test]
    fn test_variation_percentage() {
        let mut fx = Fixture::new();
        fx.add_bank(date(2025, 1, 10), Direction::In, 100_000, "Salary");
        fx.add_bank(date(2026, 1, 10), Direction::In, 150_000, "Salary");

        let comparison = compare_years(&fx.snapshot(), 2026, ViewMode::Accrual);
        let revenue = comparison.group(ReportGroup::OperatingRevenue).unwrap();
        let pct = revenue.variation.as_pct().unwrap();
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_variation_on_negative_prior() {
        // Costs are signed negative; a deeper cost shows as a negative
        // change against the absolute prior
        let mut fx = Fixture::new();
        fx.add_bank(date(2025, 2, 1), Direction::Out, 20_000, "Groceries");
        fx.add_bank(date(2026, 2, 1), Direction::Out, 30_000, "Groceries");

        let comparison = compare_years(&fx.snapshot(), 2026, ViewMode::Accrual);
        let survival = comparison.group(ReportGroup::SurvivalCost).unwrap();
        let pct = survival.variation.as_pct().unwrap();
        assert!((pct - (-50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_variation_unavailable_when_prior_zero() {
        let mut fx = Fixture::new();
        fx.add_bank(date(2026, 4, 1), Direction::In, 50_000, "Salary");

        let comparison = compare_years(&fx.snapshot(), 2026, ViewMode::Accrual);
        let revenue = comparison.group(ReportGroup::OperatingRevenue).unwrap();
        assert_eq!(revenue.variation, Variation::Unavailable);
        assert_eq!(revenue.variation.to_string(), "n/a");
    }

    #[test]
    fn test_cross_year_installments_split_between_columns() {
        // Three installments purchased December 2025: cash view puts one
        // slice in 2025 and two in 2026
        let mut fx = Fixture::new();
        let total = Money::from_cents(30_000);
        let parts = total.split_even(3);
        let purchase_date = date(2025, 12, 15);
        let group = PurchaseGroupId::new();
        let category_id = fx.categories.iter().find(|c| c.name == "Travel").map(|c| c.id);
        for (i, part) in parts.iter().enumerate() {
            let mut tx = CardTransaction::single(
                fx.card.id,
                purchase_date,
                "Flight tickets",
                category_id,
                *part,
            );
            tx.purchase_group = group;
            tx.installment_index = (i + 1) as u32;
            tx.installment_count = 3;
            tx.invoice_month = MonthYear::new(12, 2025).shift(i as i32);
            tx.total_purchase_amount = if i == 0 { total } else { Money::zero() };
            fx.card_transactions.push(tx);
        }

        let comparison = compare_years(&fx.snapshot(), 2026, ViewMode::Cash);
        let comfort = comparison.group(ReportGroup::ComfortCost).unwrap();
        assert_eq!(comfort.prior, Money::from_cents(-10_000));
        assert_eq!(comfort.current, Money::from_cents(-20_000));

        // Accrual view recognizes everything in the purchase year
        let accrual = compare_years(&fx.snapshot(), 2026, ViewMode::Accrual);
        let comfort = accrual.group(ReportGroup::ComfortCost).unwrap();
        assert_eq!(comfort.prior, Money::from_cents(-30_000));
        assert_eq!(comfort.current, Money::zero());
    }

    #[test]
    fn test_variation_display() {
        assert_eq!(
            Variation::between(Money::from_cents(150), Money::from_cents(100)).to_string(),
            "+50.0%"
        );
        assert_eq!(
            Variation::between(Money::from_cents(50), Money::from_cents(100)).to_string(),
            "-50.0%"
        );
    }
}
