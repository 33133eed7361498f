//! Credit card and card transaction models
//!
//! A purchase paid in N installments is stored as N card transactions linked
//! by a purchase group. Each installment carries its own slice of the value
//! and the invoice month it falls due in; the full purchase value is carried
//! by installment 1 only, so the accrual view can recognize a purchase once,
//! in the month it happened, while the cash view follows the invoices.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CardId, CardTransactionId, CategoryId, EntityId, PurchaseGroupId};
use super::money::Money;
use super::period::MonthYear;

/// Card network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardNetwork {
    #[default]
    Visa,
    Mastercard,
    Elo,
    Amex,
    Other,
}

impl CardNetwork {
    /// Parse a network from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" | "master" => Some(Self::Mastercard),
            "elo" => Some(Self::Elo),
            "amex" | "american_express" => Some(Self::Amex),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visa => write!(f, "Visa"),
            Self::Mastercard => write!(f, "Mastercard"),
            Self::Elo => write!(f, "Elo"),
            Self::Amex => write!(f, "Amex"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Settlement status of a card transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardTransactionStatus {
    /// On a future or unpaid invoice
    #[default]
    Pending,
    /// Its invoice has been paid
    Paid,
    /// Checked against the card statement
    Reconciled,
    /// Imported without a category
    Unclassified,
}

impl CardTransactionStatus {
    /// Parse a status from a CLI or CSV string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendente" => Some(Self::Pending),
            "paid" | "pago" => Some(Self::Paid),
            "reconciled" | "conciliado" => Some(Self::Reconciled),
            "unclassified" => Some(Self::Unclassified),
            _ => None,
        }
    }

    /// Whether the installment still counts toward an open invoice
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Paid)
    }
}

impl fmt::Display for CardTransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Reconciled => write!(f, "reconciled"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// A credit card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    /// Unique identifier
    pub id: CardId,

    /// Card name (e.g. "Black card")
    pub name: String,

    /// Card network
    pub network: CardNetwork,

    /// Holding entity the card belongs to
    pub entity_id: EntityId,

    /// Day of month the invoice closes (1-31)
    pub closing_day: u32,

    /// Day of month the invoice is due (1-31)
    pub due_day: u32,

    /// Credit limit
    pub limit: Money,

    /// When the card was created
    pub created_at: DateTime<Utc>,
}

impl CreditCard {
    /// Create a new card
    pub fn new(
        name: impl Into<String>,
        network: CardNetwork,
        entity_id: EntityId,
        closing_day: u32,
        due_day: u32,
        limit: Money,
    ) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            network,
            entity_id,
            closing_day,
            due_day,
            limit,
            created_at: Utc::now(),
        }
    }

    /// Validate the card
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }

        if !(1..=31).contains(&self.closing_day) {
            return Err(CardValidationError::DayOutOfRange(self.closing_day));
        }

        if !(1..=31).contains(&self.due_day) {
            return Err(CardValidationError::DayOutOfRange(self.due_day));
        }

        Ok(())
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.network)
    }
}

/// Validation errors for credit cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    DayOutOfRange(u32),
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::DayOutOfRange(day) => {
                write!(f, "Invoice day must be between 1 and 31 (got {})", day)
            }
        }
    }
}

impl std::error::Error for CardValidationError {}

/// One installment of a card purchase (or a single-installment purchase)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardTransaction {
    /// Unique identifier
    pub id: CardTransactionId,

    /// The card the purchase was made on
    pub card_id: CardId,

    /// Links the installments of one purchase together
    pub purchase_group: PurchaseGroupId,

    /// Date of the purchase itself
    pub purchase_date: NaiveDate,

    /// Month the installment's invoice falls due in
    pub invoice_month: MonthYear,

    /// Purchase description
    #[serde(default)]
    pub description: String,

    /// Statement category; a missing or dangling reference makes the
    /// line an orphan
    pub category_id: Option<CategoryId>,

    /// This installment's slice of the value. Signed: purchases are
    /// positive, refunds/credits negative.
    pub amount: Money,

    /// Full purchase value, carried by installment 1 only (zero on the
    /// rest)
    pub total_purchase_amount: Money,

    /// 1-based installment number
    pub installment_index: u32,

    /// Total number of installments for the purchase
    pub installment_count: u32,

    /// Settlement status
    #[serde(default)]
    pub status: CardTransactionStatus,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl CardTransaction {
    /// Create a single-installment purchase
    pub fn single(
        card_id: CardId,
        purchase_date: NaiveDate,
        description: impl Into<String>,
        category_id: Option<CategoryId>,
        amount: Money,
    ) -> Self {
        Self {
            id: CardTransactionId::new(),
            card_id,
            purchase_group: PurchaseGroupId::new(),
            purchase_date,
            invoice_month: MonthYear::from_date(purchase_date),
            description: description.into(),
            category_id,
            amount,
            total_purchase_amount: amount,
            installment_index: 1,
            installment_count: 1,
            status: CardTransactionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Whether this record is the purchase's first installment, the one
    /// carrying the full value
    pub fn is_first_installment(&self) -> bool {
        self.installment_index == 1
    }

    /// "3/12" style label, empty for single-installment purchases
    pub fn installment_label(&self) -> String {
        if self.installment_count > 1 {
            format!("{}/{}", self.installment_index, self.installment_count)
        } else {
            String::new()
        }
    }

    /// Validate the installment record
    pub fn validate(&self) -> Result<(), CardTransactionValidationError> {
        if self.installment_count == 0 {
            return Err(CardTransactionValidationError::ZeroInstallments);
        }

        if self.installment_index == 0 || self.installment_index > self.installment_count {
            return Err(CardTransactionValidationError::IndexOutOfRange {
                index: self.installment_index,
                count: self.installment_count,
            });
        }

        if !self.is_first_installment() && !self.total_purchase_amount.is_zero() {
            return Err(CardTransactionValidationError::TotalOnLaterInstallment);
        }

        Ok(())
    }
}

impl fmt::Display for CardTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.installment_label();
        if label.is_empty() {
            write!(
                f,
                "{} {} {}",
                self.purchase_date.format("%Y-%m-%d"),
                self.description,
                self.amount
            )
        } else {
            write!(
                f,
                "{} {} {} {}",
                self.purchase_date.format("%Y-%m-%d"),
                self.description,
                label,
                self.amount
            )
        }
    }
}

/// Validation errors for card transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardTransactionValidationError {
    ZeroInstallments,
    IndexOutOfRange { index: u32, count: u32 },
    TotalOnLaterInstallment,
}

impl fmt::Display for CardTransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInstallments => write!(f, "Installment count must be at least 1"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "Installment index {} out of range 1-{}", index, count)
            }
            Self::TotalOnLaterInstallment => {
                write!(
                    f,
                    "Only the first installment carries the total purchase amount"
                )
            }
        }
    }
}

impl std::error::Error for CardTransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_card() -> CreditCard {
        CreditCard::new(
            "Black card",
            CardNetwork::Visa,
            EntityId::new(),
            5,
            15,
            Money::from_units(10_000),
        )
    }

    #[test]
    fn test_new_card() {
        let card = test_card();
        assert_eq!(card.name, "Black card");
        assert_eq!(card.closing_day, 5);
        assert_eq!(card.due_day, 15);
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_card_validation() {
        let mut card = test_card();
        card.closing_day = 0;
        assert_eq!(card.validate(), Err(CardValidationError::DayOutOfRange(0)));

        card.closing_day = 5;
        card.due_day = 32;
        assert_eq!(card.validate(), Err(CardValidationError::DayOutOfRange(32)));

        card.due_day = 15;
        card.name = "  ".to_string();
        assert_eq!(card.validate(), Err(CardValidationError::EmptyName));
    }

    #[test]
    fn test_single_purchase() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let tx = CardTransaction::single(
            CardId::new(),
            date,
            "Groceries",
            Some(CategoryId::new()),
            Money::from_cents(20_000),
        );

        assert!(tx.is_first_installment());
        assert_eq!(tx.installment_count, 1);
        assert_eq!(tx.invoice_month, MonthYear::new(1, 2026));
        assert_eq!(tx.total_purchase_amount, Money::from_cents(20_000));
        assert_eq!(tx.installment_label(), "");
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_installment_label() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let mut tx = CardTransaction::single(
            CardId::new(),
            date,
            "Laptop",
            None,
            Money::from_cents(10_000),
        );
        tx.installment_index = 3;
        tx.installment_count = 12;
        tx.total_purchase_amount = Money::zero();

        assert_eq!(tx.installment_label(), "3/12");
        assert!(!tx.is_first_installment());
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_validate_index_bounds() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let mut tx =
            CardTransaction::single(CardId::new(), date, "X", None, Money::from_cents(100));

        tx.installment_count = 0;
        assert_eq!(
            tx.validate(),
            Err(CardTransactionValidationError::ZeroInstallments)
        );

        tx.installment_count = 3;
        tx.installment_index = 4;
        assert!(matches!(
            tx.validate(),
            Err(CardTransactionValidationError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_total_only_on_first() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let mut tx =
            CardTransaction::single(CardId::new(), date, "X", None, Money::from_cents(100));
        tx.installment_index = 2;
        tx.installment_count = 3;

        assert_eq!(
            tx.validate(),
            Err(CardTransactionValidationError::TotalOnLaterInstallment)
        );

        tx.total_purchase_amount = Money::zero();
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_status_is_open() {
        assert!(CardTransactionStatus::Pending.is_open());
        assert!(CardTransactionStatus::Reconciled.is_open());
        assert!(CardTransactionStatus::Unclassified.is_open());
        assert!(!CardTransactionStatus::Paid.is_open());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            CardTransactionStatus::parse("pago"),
            Some(CardTransactionStatus::Paid)
        );
        assert_eq!(
            CardTransactionStatus::parse("Pending"),
            Some(CardTransactionStatus::Pending)
        );
        assert_eq!(CardTransactionStatus::parse("open"), None);
    }

    #[test]
    fn test_serialization() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let tx = CardTransaction::single(
            CardId::new(),
            date,
            "Groceries",
            None,
            Money::from_cents(20_000),
        );
        let json = serde_json::to_string(&tx).unwrap();
        let back: CardTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, tx.id);
        assert_eq!(back.invoice_month, tx.invoice_month);
        assert_eq!(back.status, CardTransactionStatus::Pending);
    }
}
