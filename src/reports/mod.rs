//! Reports module for dre-cli
//!
//! Presentation layer over the statement engine and the ledger:
//! the income statement, the year-over-year comparative, the net
//! worth position, and the trailing result trend. Every report
//! formats for the terminal and exports to CSV.

pub mod comparative;
pub mod net_worth;
pub mod statement;
pub mod trend;

pub use comparative::ComparativeReport;
pub use net_worth::{NetWorthItem, NetWorthReport, NetWorthSection};
pub use statement::StatementReport;
pub use trend::TrendReport;
