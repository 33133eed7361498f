//! Income-statement engine
//!
//! The pure aggregation core: a read-only ledger snapshot goes in, group
//! totals with drill-down lines come out. Year-over-year comparison and
//! the trailing trend series are thin layers over repeated runs.

pub mod aggregate;
pub mod comparative;
pub mod resolver;
pub mod snapshot;
pub mod trend;

pub use aggregate::{aggregate, AggregateResult, CategoryBreakdown, GroupBreakdown, LineDetail};
pub use comparative::{compare_years, ComparativeResult, GroupComparison, TotalComparison, Variation};
pub use resolver::CategoryResolver;
pub use snapshot::LedgerSnapshot;
pub use trend::{trailing_months, TrendPoint, TREND_MONTHS};
