//! Trailing monthly result series
//!
//! Feeds the dashboard trend view: one engine run per trailing month,
//! oldest first, over the same snapshot. Months with no activity still
//! produce a point, so the series length is always the months asked for.

use super::aggregate::aggregate;
use super::snapshot::LedgerSnapshot;
use crate::models::{Money, MonthYear, ReportWindow, ViewMode};

/// Default span of the dashboard trend
pub const TREND_MONTHS: u32 = 12;

/// One month's headline results
#[derive(Debug, Clone, Copy)]
pub struct TrendPoint {
    pub month: MonthYear,
    pub operating_result: Money,
    pub global_result: Money,
}

/// Monthly results for the `months` ending at `through`, oldest first.
pub fn trailing_months(
    snapshot: &LedgerSnapshot<'_>,
    through: MonthYear,
    months: u32,
    view: ViewMode,
) -> Vec<TrendPoint> {
    let mut points = Vec::with_capacity(months as usize);
    for offset in (0..months as i32).rev() {
        let month = through.shift(-offset);
        let window = ReportWindow::monthly(month.month, month.year);
        let result = aggregate(snapshot, window, view);
        points.push(TrendPoint {
            month,
            operating_result: result.operating_result,
            global_result: result.global_result,
        });
    }
    points
}
