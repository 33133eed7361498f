use anyhow::Result;
use clap::{Parser, Subcommand};

use dre::cli::{
    handle_audit_command, handle_backup_command, handle_card_command, handle_category_command,
    handle_entity_command, handle_fixed_command, handle_import_command,
    handle_institution_command, handle_investment_command, handle_liability_command,
    handle_report_command, handle_transaction_command,
};
use dre::config::{paths::DrePaths, settings::Settings};
use dre::storage::Storage;

#[derive(Parser)]
#[command(
    name = "dre",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based personal income statement and wealth tracking",
    long_about = "dre-cli keeps a household ledger of bank transactions, card \
                  purchases, investments, and static positions, and derives a \
                  management income statement (a DRE) and a net worth statement \
                  from it, by month, quarter, semester, or year."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Entity management commands
    #[command(subcommand)]
    Entity(dre::cli::EntityCommands),

    /// Institution management commands
    #[command(subcommand, alias = "inst")]
    Institution(dre::cli::InstitutionCommands),

    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(dre::cli::CategoryCommands),

    /// Bank transaction commands
    #[command(subcommand, alias = "txn")]
    Transaction(dre::cli::TransactionCommands),

    /// Credit card commands
    #[command(subcommand)]
    Card(dre::cli::CardCommands),

    /// Investment asset and snapshot commands
    #[command(subcommand, alias = "invest")]
    Investment(dre::cli::InvestmentCommands),

    /// Fixed asset commands
    #[command(subcommand)]
    Fixed(dre::cli::FixedCommands),

    /// Liability management commands
    #[command(subcommand)]
    Liability(dre::cli::LiabilityCommands),

    /// Generate reports
    #[command(subcommand)]
    Report(dre::cli::ReportCommands),

    /// Import records from CSV files
    #[command(subcommand)]
    Import(dre::cli::ImportCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(dre::cli::BackupCommands),

    /// Audit log commands
    #[command(subcommand)]
    Audit(dre::cli::AuditCommands),

    /// Initialize a fresh ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = DrePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Entity(cmd)) => {
            handle_entity_command(&mut storage, cmd)?;
        }
        Some(Commands::Institution(cmd)) => {
            handle_institution_command(&mut storage, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&mut storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&mut storage, cmd)?;
        }
        Some(Commands::Card(cmd)) => {
            handle_card_command(&mut storage, cmd)?;
        }
        Some(Commands::Investment(cmd)) => {
            handle_investment_command(&mut storage, cmd)?;
        }
        Some(Commands::Fixed(cmd)) => {
            handle_fixed_command(&mut storage, cmd)?;
        }
        Some(Commands::Liability(cmd)) => {
            handle_liability_command(&mut storage, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&mut storage, cmd)?;
        }
        Some(Commands::Import(cmd)) => {
            handle_import_command(&mut storage, cmd)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Audit(cmd)) => {
            handle_audit_command(&storage, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing dre-cli at: {}", paths.data_dir().display());
            dre::storage::init::initialize_storage(&paths)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Starter records have been created:");
            println!("  - Entity 'Main holding' with institution 'Main bank'");
            println!("  - Categories: Dividends, Groceries, Card invoice payment,");
            println!("    Internal transfer");
            println!();
            println!("Run 'dre category list' to see the category dictionary.");
        }
        Some(Commands::Config) => {
            println!("dre-cli Configuration");
            println!("=====================");
            println!("Config directory: {}", paths.config_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Default view:    {}", settings.default_view);
            println!("  Default window:  {}", settings.default_window);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!(
                "  Retention:       {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        None => {
            println!("dre-cli - Terminal-based personal income statement");
            println!();
            println!("Run 'dre --help' for usage information.");
            println!("Run 'dre init' to set up a fresh ledger.");
        }
    }

    Ok(())
}
