//! Report windows for the income statement engine
//!
//! A window is a reference (month, year) plus a kind: monthly, quarterly,
//! semester, annual, or year-over-year. Matching is fail-closed: a record
//! without a usable date never falls inside any window, so a malformed
//! record can only understate a report, never inflate it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which date a bank transaction is recognized under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Recognize in the period cash actually moved (settlement/due date)
    #[default]
    Cash,
    /// Recognize in the period the transaction economically occurred
    Accrual,
}

impl ViewMode {
    /// Parse a view mode from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "caixa" => Some(Self::Cash),
            "accrual" | "competencia" => Some(Self::Accrual),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Accrual => write!(f, "accrual"),
        }
    }
}

/// The kind of time window a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    #[default]
    Monthly,
    Quarterly,
    Semester,
    Annual,
    /// Two independent annual runs: the reference year and the year before
    YearOverYear,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Semester => write!(f, "semester"),
            Self::Annual => write!(f, "annual"),
            Self::YearOverYear => write!(f, "year-over-year"),
        }
    }
}

/// A calendar month reference, used where records carry a month/year pair
/// instead of a full date (investment snapshots, card invoice months)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    /// 1-12
    pub month: u32,
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// The month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// The current calendar month
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// Whether the month number is in range
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// Shift forward (positive) or backward (negative) by whole months
    pub fn shift(&self, months: i32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        Self {
            month: (total.rem_euclid(12) + 1) as u32,
            year: total.div_euclid(12) as i32,
        }
    }

    /// The month before this one
    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    /// The month after this one
    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// First day of the month, for rendering month-keyed records as dates
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Ordering key: months since year zero
    fn index(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64 - 1
    }
}

impl PartialOrd for MonthYear {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthYear {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A report window: reference month/year plus window kind
///
/// The reference month is meaningful for monthly, quarterly, and semester
/// windows; annual and year-over-year windows only use the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportWindow {
    pub kind: WindowKind,
    /// 1-12
    pub month: u32,
    pub year: i32,
}

impl ReportWindow {
    pub fn new(kind: WindowKind, month: u32, year: i32) -> Self {
        Self { kind, month, year }
    }

    pub fn monthly(month: u32, year: i32) -> Self {
        Self::new(WindowKind::Monthly, month, year)
    }

    pub fn quarterly(month: u32, year: i32) -> Self {
        Self::new(WindowKind::Quarterly, month, year)
    }

    pub fn semester(month: u32, year: i32) -> Self {
        Self::new(WindowKind::Semester, month, year)
    }

    pub fn annual(year: i32) -> Self {
        Self::new(WindowKind::Annual, 1, year)
    }

    pub fn year_over_year(year: i32) -> Self {
        Self::new(WindowKind::YearOverYear, 1, year)
    }

    /// Calendar quarter of the reference month (0-3)
    fn quarter_of(month: u32) -> u32 {
        (month.saturating_sub(1)) / 3
    }

    /// Whether a date falls inside this window.
    ///
    /// `None` (missing or unparseable date) never matches; fail closed.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(d) => self.contains_date(d),
            None => false,
        }
    }

    /// Whether a known date falls inside this window
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains_month_year(date.month(), date.year())
    }

    /// Whether a (month, year) pair falls inside this window
    pub fn contains_month_year(&self, month: u32, year: i32) -> bool {
        if !(1..=12).contains(&month) {
            return false;
        }
        match self.kind {
            WindowKind::Monthly => month == self.month && year == self.year,
            WindowKind::Quarterly => {
                Self::quarter_of(month) == Self::quarter_of(self.month) && year == self.year
            }
            WindowKind::Semester => (month <= 6) == (self.month <= 6) && year == self.year,
            // Year-over-year is evaluated as two annual runs; a single
            // window matches its own year like an annual one.
            WindowKind::Annual | WindowKind::YearOverYear => year == self.year,
        }
    }

    /// Whether a month reference falls inside this window
    pub fn contains_month(&self, month: MonthYear) -> bool {
        self.contains_month_year(month.month, month.year)
    }

    /// The annual window for the year before this window's year
    /// (the comparative baseline)
    pub fn prior_year_annual(&self) -> Self {
        Self::annual(self.year - 1)
    }

    /// Reference month of this window
    pub fn reference_month(&self) -> MonthYear {
        MonthYear::new(self.month, self.year)
    }

    /// Human-readable label, e.g. "March 2026", "Q1 2026", "2nd semester 2026"
    pub fn label(&self) -> String {
        match self.kind {
            WindowKind::Monthly => format!("{} {}", month_name(self.month), self.year),
            WindowKind::Quarterly => format!("Q{} {}", Self::quarter_of(self.month) + 1, self.year),
            WindowKind::Semester => format!(
                "{} semester {}",
                if self.month <= 6 { "1st" } else { "2nd" },
                self.year
            ),
            WindowKind::Annual => format!("Fiscal year {}", self.year),
            WindowKind::YearOverYear => format!("{} vs {}", self.year, self.year - 1),
        }
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

/// Three-letter month abbreviation for trend tables
pub fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "?",
    }
}
