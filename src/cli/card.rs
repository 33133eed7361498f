//! Credit card CLI commands
//!
//! Implements CLI commands for cards, purchases, and invoice settlement.

use clap::Subcommand;

use crate::cli::{parse_date_or_today, parse_money, parse_month, parse_month_or_current};
use crate::display::{format_card_list, format_purchase_register};
use crate::error::{DreError, DreResult};
use crate::models::month_name;
use crate::services::{CardService, CategoryService, EntityService, RecordPurchaseInput};
use crate::storage::Storage;

/// Credit card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Register a new credit card
    Create {
        /// Card name
        name: String,
        /// Card network (visa, mastercard, elo, amex, other)
        #[arg(short = 'w', long, default_value = "visa")]
        network: String,
        /// Owning entity name or ID
        #[arg(short, long)]
        entity: String,
        /// Statement closing day (1-28)
        #[arg(short, long)]
        closing: u32,
        /// Payment due day (1-28)
        #[arg(short, long)]
        due: u32,
        /// Card limit (e.g., "15000")
        #[arg(short, long, default_value = "0")]
        limit: String,
    },

    /// List registered cards
    List,

    /// Record a card purchase, expanding its installment schedule
    Purchase {
        /// Card name or ID
        card: String,
        /// Total purchase amount
        amount: String,
        /// Purchase description
        description: String,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Number of installments
        #[arg(short, long, default_value = "1")]
        installments: u32,
    },

    /// List installment records
    Purchases {
        /// Filter by card name or ID
        #[arg(short, long)]
        card: Option<String>,
        /// Filter by invoice month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Assign every installment of a purchase to a category
    Classify {
        /// Purchase group ID
        purchase: String,
        /// Category name or ID ("none" to clear)
        #[arg(short, long)]
        category: String,
    },

    /// Mark a card's invoice month as paid
    #[command(name = "pay-invoice")]
    PayInvoice {
        /// Card name or ID
        card: String,
        /// Invoice month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete a purchase and all its installments
    #[command(name = "delete-purchase")]
    DeletePurchase {
        /// Purchase group ID
        purchase: String,
    },

    /// Delete a card
    Delete {
        /// Card name or ID
        card: String,
    },
}

/// Handle a card command
pub fn handle_card_command(storage: &mut Storage, cmd: CardCommands) -> DreResult<()> {
    match cmd {
        CardCommands::Create {
            name,
            network,
            entity,
            closing,
            due,
            limit,
        } => {
            let network = CardService::parse_network(&network)?;
            let limit = parse_money(&limit, "limit")?;

            let owner = EntityService::new(storage)
                .find(&entity)
                .ok_or_else(|| DreError::entity_not_found(&entity))?;

            let mut service = CardService::new(storage);
            let card = service.create_card(&name, network, owner.id, closing, due, limit)?;

            println!("Created card: {}", card.name);
            println!("  Network: {}", card.network);
            println!("  Closing: day {}", card.closing_day);
            println!("  Due:     day {}", card.due_day);
            println!("  ID:      {}", card.id);
        }

        CardCommands::List => {
            let service = CardService::new(storage);
            print!("{}", format_card_list(&service.list_cards()));
        }

        CardCommands::Purchase {
            card,
            amount,
            description,
            category,
            date,
            installments,
        } => {
            let target = CardService::new(storage)
                .find_card(&card)
                .ok_or_else(|| DreError::card_not_found(&card))?;

            let total = parse_money(&amount, "amount")?;
            let purchase_date = parse_date_or_today(date.as_deref())?;

            let category_id = match &category {
                Some(identifier) => {
                    let found = CategoryService::new(storage)
                        .find(identifier)
                        .ok_or_else(|| DreError::category_not_found(identifier))?;
                    Some(found.id)
                }
                None => None,
            };

            let input = RecordPurchaseInput {
                card_id: target.id,
                purchase_date,
                description,
                category_id,
                total,
                installments,
            };

            let mut service = CardService::new(storage);
            let installments = service.record_purchase(input)?;

            if let Some(first) = installments.first() {
                println!("Recorded purchase: {}", first.description);
                println!("  Purchase group: {}", first.purchase_group);
                println!("  Total:          {}", first.total_purchase_amount);
                println!("  Installments:   {}", installments.len());
                println!(
                    "  First invoice:  {} {}",
                    month_name(first.invoice_month.month),
                    first.invoice_month.year
                );
            }
        }

        CardCommands::Purchases { card, month } => {
            let card_id = match &card {
                Some(identifier) => {
                    let found = CardService::new(storage)
                        .find_card(identifier)
                        .ok_or_else(|| DreError::card_not_found(identifier))?;
                    Some(found.id)
                }
                None => None,
            };
            let invoice_month = match month {
                Some(s) => Some(parse_month(&s)?),
                None => None,
            };

            let service = CardService::new(storage);
            let purchases = service.list_purchases(card_id, invoice_month);
            let categories = storage.ledger.categories.clone();

            print!("{}", format_purchase_register(&purchases, &categories));
        }

        CardCommands::Classify { purchase, category } => {
            let category_id = if category.eq_ignore_ascii_case("none") {
                None
            } else {
                let found = CategoryService::new(storage)
                    .find(&category)
                    .ok_or_else(|| DreError::category_not_found(&category))?;
                Some(found.id)
            };

            let mut service = CardService::new(storage);
            let group = service.find_purchase(&purchase).ok_or_else(|| DreError::NotFound {
                entity_type: "Purchase",
                identifier: purchase.clone(),
            })?;

            let count = service.classify_purchase(group, category_id)?;
            println!("Classified {} installment(s)", count);
        }

        CardCommands::PayInvoice { card, month } => {
            let month = parse_month_or_current(month.as_deref())?;

            let mut service = CardService::new(storage);
            let target = service
                .find_card(&card)
                .ok_or_else(|| DreError::card_not_found(&card))?;

            let count = service.mark_invoice_paid(target.id, month)?;
            println!(
                "Marked {} installment(s) on '{}' as paid for {} {}",
                count,
                target.name,
                month_name(month.month),
                month.year
            );
        }

        CardCommands::DeletePurchase { purchase } => {
            let mut service = CardService::new(storage);
            let group = service.find_purchase(&purchase).ok_or_else(|| DreError::NotFound {
                entity_type: "Purchase",
                identifier: purchase.clone(),
            })?;

            let count = service.delete_purchase(group)?;
            println!("Deleted purchase {} ({} installment(s))", group, count);
        }

        CardCommands::Delete { card } => {
            let mut service = CardService::new(storage);
            let found = service
                .find_card(&card)
                .ok_or_else(|| DreError::card_not_found(&card))?;

            let deleted = service.delete_card(found.id)?;
            println!("Deleted card: {}", deleted.name);
        }
    }

    Ok(())
}
