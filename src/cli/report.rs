//! CLI commands for reports
//!
//! Generates the income statement, the comparative statement, the net
//! worth statement, and the result trend, to the terminal or to CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::cli::{parse_month_or_current, parse_view};
use crate::config::settings::Settings;
use crate::error::{DreError, DreResult};
use crate::reports::{ComparativeReport, NetWorthReport, StatementReport, TrendReport};
use crate::services::{EntityService, PeriodService};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate the management income statement
    Statement {
        /// Period (e.g., "2026-03", "2026-q2", "2026-s1", "2026", "current")
        #[arg(short, long)]
        period: Option<String>,

        /// View (cash, accrual), defaults to the configured view
        #[arg(short, long)]
        view: Option<String>,

        /// Include the per-category breakdown under each group
        #[arg(short, long)]
        detail: bool,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare a year with the year before, group by group
    Comparative {
        /// Reference year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,

        /// View (cash, accrual), defaults to the configured view
        #[arg(short, long)]
        view: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the net worth statement
    #[command(name = "net-worth")]
    NetWorth {
        /// Reference month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Restrict to one entity
        #[arg(short, long)]
        entity: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the trailing twelve-month result trend
    Trend {
        /// Last month of the trend (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        through: Option<String>,

        /// View (cash, accrual), defaults to the configured view
        #[arg(short, long)]
        view: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(storage: &mut Storage, cmd: ReportCommands) -> DreResult<()> {
    match cmd {
        ReportCommands::Statement {
            period,
            view,
            detail,
            output,
        } => handle_statement_report(storage, period, view, detail, output),
        ReportCommands::Comparative { year, view, output } => {
            handle_comparative_report(storage, year, view, output)
        }
        ReportCommands::NetWorth {
            month,
            entity,
            output,
        } => handle_net_worth_report(storage, month, entity, output),
        ReportCommands::Trend {
            through,
            view,
            output,
        } => handle_trend_report(storage, through, view, output),
    }
}

/// Generate and display the income statement
fn handle_statement_report(
    storage: &mut Storage,
    period: Option<String>,
    view: Option<String>,
    detail: bool,
    output: Option<PathBuf>,
) -> DreResult<()> {
    let settings = Settings::load_or_create(storage.paths())?;
    let window = PeriodService::new(&settings).parse_or_current(period.as_deref())?;
    let view = parse_view(view.as_deref(), settings.default_view)?;

    let report = StatementReport::generate(storage, window, view)?;

    if let Some(path) = output {
        let file = File::create(&path)
            .map_err(|e| DreError::Export(format!("Failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        report.export_csv(&mut writer)?;
        println!("Statement exported to {}", path.display());
    } else {
        println!("{}", report.format_terminal(detail));
    }

    Ok(())
}

/// Generate and display the comparative statement
fn handle_comparative_report(
    storage: &mut Storage,
    year: Option<i32>,
    view: Option<String>,
    output: Option<PathBuf>,
) -> DreResult<()> {
    let settings = Settings::load_or_create(storage.paths())?;
    let year = year.unwrap_or_else(|| PeriodService::new(&settings).current_window().year);
    let view = parse_view(view.as_deref(), settings.default_view)?;

    let report = ComparativeReport::generate(storage, year, view)?;

    if let Some(path) = output {
        let file = File::create(&path)
            .map_err(|e| DreError::Export(format!("Failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        report.export_csv(&mut writer)?;
        println!("Comparative statement exported to {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Generate and display the net worth statement
fn handle_net_worth_report(
    storage: &mut Storage,
    month: Option<String>,
    entity: Option<String>,
    output: Option<PathBuf>,
) -> DreResult<()> {
    let reference = parse_month_or_current(month.as_deref())?;

    let entity_id = match &entity {
        Some(identifier) => {
            let found = EntityService::new(storage)
                .find(identifier)
                .ok_or_else(|| DreError::entity_not_found(identifier))?;
            Some(found.id)
        }
        None => None,
    };

    let report = NetWorthReport::generate(storage, reference, entity_id)?;

    if let Some(path) = output {
        let file = File::create(&path)
            .map_err(|e| DreError::Export(format!("Failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        report.export_csv(&mut writer)?;
        println!("Net worth statement exported to {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Generate and display the result trend
fn handle_trend_report(
    storage: &mut Storage,
    through: Option<String>,
    view: Option<String>,
    output: Option<PathBuf>,
) -> DreResult<()> {
    let settings = Settings::load_or_create(storage.paths())?;
    let through = parse_month_or_current(through.as_deref())?;
    let view = parse_view(view.as_deref(), settings.default_view)?;

    let report = TrendReport::generate(storage, through, view)?;

    if let Some(path) = output {
        let file = File::create(&path)
            .map_err(|e| DreError::Export(format!("Failed to create file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        report.export_csv(&mut writer)?;
        println!("Trend exported to {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}
