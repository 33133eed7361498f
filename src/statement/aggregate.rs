//! The income-statement aggregation engine
//!
//! One pure pass over a ledger snapshot for one report window and one view
//! mode. Rules are applied in a fixed order: bank transactions, then card
//! transactions, then investment snapshots, then the roll-up totals. Later
//! rules only refine totals; they never change which records were
//! considered.
//!
//! The engine never fails on a bad record. Structurally excluded lines
//! (invoice payments, internal transfer legs) are skipped outright;
//! lines whose category, institution, card, or asset reference does not
//! resolve are counted in the unclassified counter and kept out of every
//! total, so a broken dictionary under-states the report instead of
//! corrupting it.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::resolver::CategoryResolver;
use super::snapshot::LedgerSnapshot;
use crate::models::{Money, ReportGroup, ReportWindow, ViewMode};

/// One source line behind a category total
#[derive(Debug, Clone)]
pub struct LineDetail {
    /// Display id of the source record
    pub id: String,
    /// Date the line was recognized under
    pub date: NaiveDate,
    /// Source record description
    pub description: String,
    /// Signed statement value
    pub amount: Money,
    /// Institution, card, or asset the line came from
    pub source: String,
}

/// Per-category slice of a group total, with its contributing lines
#[derive(Debug, Clone)]
pub struct CategoryBreakdown {
    /// Category display name (asset name for investment yield)
    pub name: String,
    /// Signed category total
    pub total: Money,
    /// Contributing lines, oldest first
    pub lines: Vec<LineDetail>,
}

/// One report group's total and drill-down
#[derive(Debug, Clone)]
pub struct GroupBreakdown {
    pub group: ReportGroup,
    /// Signed group total
    pub total: Money,
    /// Categories with activity, largest absolute total first
    pub categories: Vec<CategoryBreakdown>,
}

/// Full output of one aggregation run
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// Window the run covered
    pub window: ReportWindow,
    /// View mode the run used
    pub view: ViewMode,
    /// All eight groups in statement order, empty ones included
    pub groups: Vec<GroupBreakdown>,
    /// Total of "Operating revenue"
    pub operating_revenue: Money,
    /// Operating revenue plus the three cost-of-living groups
    pub operating_result: Money,
    /// Non-operating plus financial variation plus realized investments
    pub wealth_result: Money,
    /// Operating result plus wealth result
    pub global_result: Money,
    /// In-window lines whose reference lookup failed; these are in no
    /// group total
    pub unclassified: usize,
    /// Signed sum of the unclassified lines
    pub unclassified_amount: Money,
}

impl AggregateResult {
    /// Breakdown of one group
    pub fn group(&self, group: ReportGroup) -> Option<&GroupBreakdown> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// Total of one group, zero when the group saw no activity
    pub fn group_total(&self, group: ReportGroup) -> Money {
        self.group(group).map(|g| g.total).unwrap_or(Money::zero())
    }

    /// Number of classified lines across every group
    pub fn classified_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.categories)
            .map(|c| c.lines.len())
            .sum()
    }
}

type Buckets = HashMap<(ReportGroup, String), (Money, Vec<LineDetail>)>;

fn push_line(buckets: &mut Buckets, group: ReportGroup, category: &str, line: LineDetail) {
    let entry = buckets
        .entry((group, category.to_string()))
        .or_insert_with(|| (Money::zero(), Vec::new()));
    entry.0 += line.amount;
    entry.1.push(line);
}

fn group_total(groups: &[GroupBreakdown], group: ReportGroup) -> Money {
    groups
        .iter()
        .find(|g| g.group == group)
        .map(|g| g.total)
        .unwrap_or(Money::zero())
}

/// Run the engine over one snapshot for one window and view mode.
///
/// Pure and idempotent: the snapshot is read-only and the same inputs
/// always produce the same result, so callers re-invoke freely per window.
pub fn aggregate(
    snapshot: &LedgerSnapshot<'_>,
    window: ReportWindow,
    view: ViewMode,
) -> AggregateResult {
    let resolver = CategoryResolver::new(snapshot.categories);

    let mut buckets: Buckets = HashMap::new();
    let mut unclassified = 0usize;
    let mut unclassified_amount = Money::zero();

    // Rule 1: bank transactions. Invoice payments and transfer legs never
    // enter the statement, whatever their flag or category says; they are
    // not orphans either.
    for txn in snapshot.bank_transactions {
        if txn.line_kind.is_structural_exclusion() {
            continue;
        }
        if !txn.affects_statement {
            continue;
        }
        let date = txn.effective_date(view);
        if !window.contains_date(date) {
            continue;
        }

        let amount = txn.signed_amount();
        let category = resolver.resolve(txn.category_id);
        let source = snapshot.institution_name(txn.institution_id);
        match (category, source) {
            (Some(category), Some(source)) => {
                push_line(
                    &mut buckets,
                    category.group,
                    &category.name,
                    LineDetail {
                        id: txn.id.to_string(),
                        date,
                        description: txn.description.clone(),
                        amount,
                        source: source.to_string(),
                    },
                );
            }
            _ => {
                unclassified += 1;
                unclassified_amount += amount;
            }
        }
    }

    // Rule 2: card transactions. Accrual recognizes the full purchase
    // value once, in the purchase month, via installment 1; cash follows
    // each installment into its own invoice month. Purchases reduce the
    // result, so a negative amount (refund) contributes positively.
    for purchase in snapshot.card_transactions {
        let (date, amount) = match view {
            ViewMode::Accrual => {
                if !purchase.is_first_installment() {
                    continue;
                }
                if !window.contains_date(purchase.purchase_date) {
                    continue;
                }
                (purchase.purchase_date, -purchase.total_purchase_amount)
            }
            ViewMode::Cash => {
                if !window.contains_month(purchase.invoice_month) {
                    continue;
                }
                let date = purchase
                    .invoice_month
                    .first_day()
                    .unwrap_or(purchase.purchase_date);
                (date, -purchase.amount)
            }
        };

        let category = resolver.resolve(purchase.category_id);
        let card = snapshot.card_name(purchase.card_id);
        match (category, card) {
            (Some(category), Some(card)) => {
                let label = purchase.installment_label();
                let description = if label.is_empty() {
                    purchase.description.clone()
                } else {
                    format!("{} ({})", purchase.description, label)
                };
                push_line(
                    &mut buckets,
                    category.group,
                    &category.name,
                    LineDetail {
                        id: purchase.id.to_string(),
                        date,
                        description,
                        amount,
                        source: card.to_string(),
                    },
                );
            }
            _ => {
                unclassified += 1;
                unclassified_amount += amount;
            }
        }
    }

    // Rule 3: investment snapshots. Yield has no cash/accrual
    // distinction; it lands in "Financial income / Variation" under a
    // synthetic category per asset.
    for snap in snapshot.investment_snapshots {
        if !window.contains_month(snap.month) {
            continue;
        }
        let date = match snap.month.first_day() {
            Some(d) => d,
            None => continue,
        };
        match snapshot.asset(snap.asset_id) {
            Some(asset) => {
                push_line(
                    &mut buckets,
                    ReportGroup::FinancialVariation,
                    &asset.name,
                    LineDetail {
                        id: snap.id.to_string(),
                        date,
                        description: "Investment yield (market)".to_string(),
                        amount: snap.yield_amount,
                        source: asset.name.clone(),
                    },
                );
            }
            None => {
                unclassified += 1;
                unclassified_amount += snap.yield_amount;
            }
        }
    }

    // Assemble the fixed group order, empty groups included
    let mut grouped: HashMap<ReportGroup, Vec<CategoryBreakdown>> = HashMap::new();
    for ((group, name), (total, mut lines)) in buckets {
        lines.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        grouped
            .entry(group)
            .or_default()
            .push(CategoryBreakdown { name, total, lines });
    }

    let mut groups = Vec::with_capacity(ReportGroup::all().len());
    for &group in ReportGroup::all() {
        let mut categories = grouped.remove(&group).unwrap_or_default();
        categories.sort_by(|a, b| {
            b.total
                .abs()
                .cmp(&a.total.abs())
                .then_with(|| a.name.cmp(&b.name))
        });
        let total: Money = categories.iter().map(|c| c.total).sum();
        groups.push(GroupBreakdown {
            group,
            total,
            categories,
        });
    }

    // Rule 4: roll-ups, exact in integer cents
    let operating_revenue = group_total(&groups, ReportGroup::OperatingRevenue);
    let operating_result = ReportGroup::operating_costs()
        .iter()
        .fold(operating_revenue, |acc, g| acc + group_total(&groups, *g));
    let wealth_result = ReportGroup::wealth_groups()
        .iter()
        .fold(Money::zero(), |acc, g| acc + group_total(&groups, *g));
    let global_result = operating_result + wealth_result;

    AggregateResult {
        window,
        view,
        groups,
        operating_revenue,
        operating_result,
        wealth_result,
        global_result,
        unclassified,
        unclassified_amount,
    }
}
