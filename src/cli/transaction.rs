//! Bank transaction CLI commands
//!
//! Implements CLI commands for bank/wallet transaction management.

use clap::Subcommand;

use crate::cli::{parse_date, parse_date_or_today, parse_money};
use crate::config::settings::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{DreError, DreResult};
use crate::models::{Direction, LineKind, Money};
use crate::services::{
    CategoryService, CreateTransactionInput, InstitutionService, PeriodService, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new bank transaction
    Add {
        /// Institution name or ID
        institution: String,
        /// Amount (e.g., "-50.00" for outflow, "100.00" for inflow)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Posting date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Line kind (operational, invoice-payment, internal-transfer)
        #[arg(short, long)]
        kind: Option<String>,
        /// Cash recognition date (YYYY-MM-DD), when different from the posting date
        #[arg(long)]
        cash_date: Option<String>,
        /// Accrual recognition date (YYYY-MM-DD), when different from the posting date
        #[arg(long)]
        accrual_date: Option<String>,
    },

    /// List transactions
    List {
        /// Filter by institution name or ID
        #[arg(short, long)]
        institution: Option<String>,
        /// Filter by category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by period (e.g., "2026-03", "2026-q2", "2026", "current")
        #[arg(short, long)]
        period: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New signed amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New posting date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// New cash recognition date ("none" to clear)
        #[arg(long)]
        cash_date: Option<String>,
        /// New accrual recognition date ("none" to clear)
        #[arg(long)]
        accrual_date: Option<String>,
    },

    /// Assign a transaction to a category
    Classify {
        /// Transaction ID
        id: String,
        /// Category name or ID ("none" to clear)
        #[arg(short, long)]
        category: String,
    },

    /// Change a transaction's line kind
    Mark {
        /// Transaction ID
        id: String,
        /// Line kind (operational, invoice-payment, internal-transfer)
        kind: String,
    },

    /// Exclude an operational transaction from the income statement
    Exclude {
        /// Transaction ID
        id: String,
    },

    /// Include a previously excluded transaction in the income statement
    Include {
        /// Transaction ID
        id: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(storage: &mut Storage, cmd: TransactionCommands) -> DreResult<()> {
    match cmd {
        TransactionCommands::Add {
            institution,
            amount,
            category,
            date,
            description,
            kind,
            cash_date,
            accrual_date,
        } => {
            let target = InstitutionService::new(storage)
                .find(&institution)
                .ok_or_else(|| DreError::institution_not_found(&institution))?;

            let (direction, amount) = split_signed(parse_money(&amount, "amount")?);
            let date = parse_date_or_today(date.as_deref())?;

            let category_id = match &category {
                Some(identifier) => {
                    let found = CategoryService::new(storage)
                        .find(identifier)
                        .ok_or_else(|| DreError::category_not_found(identifier))?;
                    Some(found.id)
                }
                None => None,
            };

            let line_kind = match kind {
                Some(s) => Some(LineKind::parse(&s).ok_or_else(|| {
                    DreError::Validation(format!(
                        "Invalid line kind '{}'. Use operational, invoice-payment, or internal-transfer",
                        s
                    ))
                })?),
                None => None,
            };

            let cash_date = match cash_date {
                Some(s) => Some(parse_date(&s)?),
                None => None,
            };
            let accrual_date = match accrual_date {
                Some(s) => Some(parse_date(&s)?),
                None => None,
            };

            let input = CreateTransactionInput {
                entity_id: target.entity_id,
                institution_id: target.id,
                date,
                direction,
                amount,
                category_id,
                description,
                line_kind,
                cash_date,
                accrual_date,
            };

            let mut service = TransactionService::new(storage);
            let txn = service.create(input)?;

            println!("Created transaction:");
            println!("  ID:          {}", txn.id);
            println!("  Date:        {}", txn.date);
            println!("  Amount:      {}", txn.signed_amount());
            println!("  Institution: {}", target.name);
            if txn.line_kind != LineKind::Operational {
                println!("  Line kind:   {}", txn.line_kind);
            }
        }

        TransactionCommands::List {
            institution,
            category,
            period,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(identifier) = &institution {
                let found = InstitutionService::new(storage)
                    .find(identifier)
                    .ok_or_else(|| DreError::institution_not_found(identifier))?;
                filter = filter.institution(found.id);
            }

            if let Some(identifier) = &category {
                let found = CategoryService::new(storage)
                    .find(identifier)
                    .ok_or_else(|| DreError::category_not_found(identifier))?;
                filter = filter.category(found.id);
            }

            if let Some(descriptor) = &period {
                let settings = Settings::load_or_create(storage.paths())?;
                let window = PeriodService::new(&settings).parse(descriptor)?;
                filter = filter.window(window);
            }

            let service = TransactionService::new(storage);
            let transactions = service.list(filter);
            let categories = storage.ledger.categories.clone();

            print!("{}", format_transaction_register(&transactions, &categories));
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            print!(
                "{}",
                format_transaction_details(
                    &txn,
                    &storage.ledger.categories,
                    &storage.ledger.institutions
                )
            );
        }

        TransactionCommands::Edit {
            id,
            amount,
            date,
            description,
            cash_date,
            accrual_date,
        } => {
            if amount.is_none()
                && date.is_none()
                && description.is_none()
                && cash_date.is_none()
                && accrual_date.is_none()
            {
                println!(
                    "No changes specified. Use --amount, --date, --description, --cash-date, or --accrual-date."
                );
                return Ok(());
            }

            let (direction, amount) = match amount {
                Some(s) => {
                    let (d, a) = split_signed(parse_money(&s, "amount")?);
                    (Some(d), Some(a))
                }
                None => (None, None),
            };
            let date = match date {
                Some(s) => Some(parse_date(&s)?),
                None => None,
            };
            let cash_date = parse_clearable_date(cash_date)?;
            let accrual_date = parse_clearable_date(accrual_date)?;

            let mut service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            let updated = service.update(
                txn.id,
                date,
                direction,
                amount,
                description,
                cash_date,
                accrual_date,
            )?;

            println!("Updated transaction: {}", updated.id);
            println!("  Date:   {}", updated.date);
            println!("  Amount: {}", updated.signed_amount());
        }

        TransactionCommands::Classify { id, category } => {
            let category_id = if category.eq_ignore_ascii_case("none") {
                None
            } else {
                let found = CategoryService::new(storage)
                    .find(&category)
                    .ok_or_else(|| DreError::category_not_found(&category))?;
                Some(found.id)
            };

            let mut service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            let updated = service.classify(txn.id, category_id)?;
            match updated.category_id {
                Some(_) => println!("Classified transaction under '{}'", category),
                None => println!("Cleared category on transaction {}", updated.id),
            }
        }

        TransactionCommands::Mark { id, kind } => {
            let line_kind = LineKind::parse(&kind).ok_or_else(|| {
                DreError::Validation(format!(
                    "Invalid line kind '{}'. Use operational, invoice-payment, or internal-transfer",
                    kind
                ))
            })?;

            let mut service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            let updated = service.set_line_kind(txn.id, line_kind)?;
            println!("Marked transaction {} as {}", updated.id, updated.line_kind);
            if updated.line_kind != LineKind::Operational {
                println!("It no longer feeds the income statement.");
            }
        }

        TransactionCommands::Exclude { id } => {
            let mut service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            let updated = service.set_flag(txn.id, false)?;
            println!("Excluded transaction {} from the income statement", updated.id);
        }

        TransactionCommands::Include { id } => {
            let mut service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            let updated = service.set_flag(txn.id, true)?;
            println!("Included transaction {} in the income statement", updated.id);
        }

        TransactionCommands::Delete { id, force } => {
            let service = TransactionService::new(storage);
            let txn = service
                .find(&id)
                .ok_or_else(|| DreError::transaction_not_found(&id))?;

            if !force {
                println!("About to delete transaction:");
                println!("  Date:        {}", txn.date);
                println!("  Amount:      {}", txn.signed_amount());
                println!("  Description: {}", txn.description);
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let mut service = TransactionService::new(storage);
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted transaction: {} ({} {})",
                deleted.id, deleted.date, deleted.description
            );
        }
    }

    Ok(())
}

/// Split a signed CLI amount into a direction and an absolute value
fn split_signed(amount: Money) -> (Direction, Money) {
    if amount.cents() < 0 {
        (Direction::Out, Money::from_cents(-amount.cents()))
    } else {
        (Direction::In, amount)
    }
}

/// Parse an optional date flag where the literal "none" clears the value
fn parse_clearable_date(
    input: Option<String>,
) -> DreResult<Option<Option<chrono::NaiveDate>>> {
    match input {
        None => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("none") => Ok(Some(None)),
        Some(s) => Ok(Some(Some(parse_date(&s)?))),
    }
}
