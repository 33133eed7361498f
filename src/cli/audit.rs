//! Audit log CLI commands
//!
//! Read-only views over the append-only audit trail.

use clap::Subcommand;

use crate::error::DreResult;
use crate::storage::Storage;

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// Show recent audit log entries
    Recent {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Show the total number of audit entries
    Count,
}

/// Handle an audit command
pub fn handle_audit_command(storage: &Storage, cmd: AuditCommands) -> DreResult<()> {
    match cmd {
        AuditCommands::Recent { count } => {
            let entries = storage.audit().read_recent(count)?;

            if entries.is_empty() {
                println!("No audit entries recorded yet.");
                return Ok(());
            }

            for entry in &entries {
                println!("{}", entry.format_human_readable());
            }
            println!();
            println!("Showing {} entry(ies)", entries.len());
        }

        AuditCommands::Count => {
            let count = storage.audit().entry_count()?;
            println!("Audit log contains {} entry(ies)", count);
        }
    }

    Ok(())
}
