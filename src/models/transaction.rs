//! Bank transaction model
//!
//! Bank movements carry a direction plus a non-negative magnitude, a posting
//! date with optional cash/accrual overrides, and a line kind that separates
//! ordinary operational lines from card-invoice payments and internal
//! transfers. The latter two are excluded from the income statement by
//! structure: an invoice payment settles purchases that already hit the
//! statement, and a transfer nets to zero across its two legs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, EntityId, InstitutionId, TransactionId};
use super::money::Money;
use super::period::ViewMode;

/// Direction of a bank movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money entering the account
    In,
    /// Money leaving the account
    Out,
}

impl Direction {
    /// Parse a direction from a CLI or CSV string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inflow" | "entrada" => Some(Self::In),
            "out" | "outflow" | "saida" | "saída" => Some(Self::Out),
            _ => None,
        }
    }

    /// Apply this direction's sign to a magnitude
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::In => amount,
            Self::Out => -amount,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// How a bank line relates to the income statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// An ordinary statement line
    #[default]
    Operational,
    /// Settles a card invoice whose purchases already hit the statement
    InvoicePayment,
    /// One leg of a transfer between own accounts
    InternalTransfer,
}

impl LineKind {
    /// Parse a line kind from a CLI or CSV string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "operational" | "operacional" => Some(Self::Operational),
            "invoice_payment" | "pagamento_fatura" => Some(Self::InvoicePayment),
            "internal_transfer" | "transferencia_interna" => Some(Self::InternalTransfer),
            _ => None,
        }
    }

    /// Whether lines of this kind are excluded from the statement by
    /// structure, independent of category and of `affects_statement`
    pub fn is_structural_exclusion(&self) -> bool {
        matches!(self, Self::InvoicePayment | Self::InternalTransfer)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operational => write!(f, "operational"),
            Self::InvoicePayment => write!(f, "invoice-payment"),
            Self::InternalTransfer => write!(f, "internal-transfer"),
        }
    }
}

fn default_affects_statement() -> bool {
    true
}

/// A bank account movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Holding entity this movement belongs to
    pub entity_id: EntityId,

    /// Bank account the money moved through
    pub institution_id: InstitutionId,

    /// Posting date; the fallback when a view-specific date is absent
    pub date: NaiveDate,

    /// Settlement date, used by the cash view
    pub cash_date: Option<NaiveDate>,

    /// Economic-occurrence date, used by the accrual view
    pub accrual_date: Option<NaiveDate>,

    /// In or out
    pub direction: Direction,

    /// Magnitude, never negative; the sign comes from `direction`
    pub amount: Money,

    /// Statement category. A missing or dangling reference makes the
    /// line an orphan in the aggregate's unclassified counter.
    pub category_id: Option<CategoryId>,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Operational, invoice payment, or internal transfer
    #[serde(default)]
    pub line_kind: LineKind,

    /// Whether the line may enter the income statement at all. Must be
    /// false for invoice payments and internal transfers.
    #[serde(default = "default_affects_statement")]
    pub affects_statement: bool,

    /// Import ID for duplicate detection during CSV import
    pub import_id: Option<String>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,
}

impl BankTransaction {
    /// Create a new operational transaction
    pub fn new(
        entity_id: EntityId,
        institution_id: InstitutionId,
        date: NaiveDate,
        direction: Direction,
        amount: Money,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            entity_id,
            institution_id,
            date,
            cash_date: None,
            accrual_date: None,
            direction,
            amount,
            category_id: None,
            description: String::new(),
            line_kind: LineKind::Operational,
            affects_statement: true,
            import_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a transaction with the common fields filled in
    #[allow(clippy::too_many_arguments)]
    pub fn with_details(
        entity_id: EntityId,
        institution_id: InstitutionId,
        date: NaiveDate,
        direction: Direction,
        amount: Money,
        category_id: Option<CategoryId>,
        description: impl Into<String>,
        line_kind: LineKind,
    ) -> Self {
        let mut txn = Self::new(entity_id, institution_id, date, direction, amount);
        txn.category_id = category_id;
        txn.description = description.into();
        txn.set_line_kind(line_kind);
        txn
    }

    /// Set the line kind, clearing `affects_statement` for the
    /// structurally excluded kinds
    pub fn set_line_kind(&mut self, line_kind: LineKind) {
        self.line_kind = line_kind;
        if line_kind.is_structural_exclusion() {
            self.affects_statement = false;
        }
    }

    /// The date this transaction is recognized under for the given view.
    /// Falls back to the posting date when the view-specific date is unset.
    pub fn effective_date(&self, view: ViewMode) -> NaiveDate {
        match view {
            ViewMode::Cash => self.cash_date.unwrap_or(self.date),
            ViewMode::Accrual => self.accrual_date.unwrap_or(self.date),
        }
    }

    /// The signed statement value: `+amount` for inflows, `-amount` for
    /// outflows
    pub fn signed_amount(&self) -> Money {
        self.direction.signed(self.amount)
    }

    /// Check if this is an inflow
    pub fn is_inflow(&self) -> bool {
        self.direction == Direction::In
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.line_kind.is_structural_exclusion() && self.affects_statement {
            return Err(TransactionValidationError::ExcludedKindAffectsStatement(
                self.line_kind,
            ));
        }

        Ok(())
    }

    /// Generate an import ID for duplicate detection
    pub fn generate_import_id(&self) -> String {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.date.hash(&mut hasher);
        self.amount.cents().hash(&mut hasher);
        self.description.hash(&mut hasher);
        format!("imp-{:016x}", hasher.finish())
    }
}

impl fmt::Display for BankTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.signed_amount()
        )
    }
}

/// Validation errors for bank transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    ExcludedKindAffectsStatement(LineKind),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(
                    f,
                    "Transaction amount must not be negative (got {}); use the direction field",
                    amount
                )
            }
            Self::ExcludedKindAffectsStatement(kind) => {
                write!(f, "A {} line cannot affect the income statement", kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_txn(direction: Direction, cents: i64) -> BankTransaction {
        BankTransaction::new(
            EntityId::new(),
            InstitutionId::new(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            direction,
            Money::from_cents(cents),
        )
    }

    #[test]
    fn test_signed_amount() {
        let inflow = base_txn(Direction::In, 100_000);
        assert_eq!(inflow.signed_amount(), Money::from_cents(100_000));
        assert!(inflow.is_inflow());

        let outflow = base_txn(Direction::Out, 100_000);
        assert_eq!(outflow.signed_amount(), Money::from_cents(-100_000));
        assert!(!outflow.is_inflow());
    }

    #[test]
    fn test_effective_date_fallback() {
        let mut txn = base_txn(Direction::Out, 5000);
        let posting = txn.date;

        assert_eq!(txn.effective_date(ViewMode::Cash), posting);
        assert_eq!(txn.effective_date(ViewMode::Accrual), posting);

        txn.cash_date = NaiveDate::from_ymd_opt(2026, 2, 1);
        txn.accrual_date = NaiveDate::from_ymd_opt(2025, 12, 20);

        assert_eq!(
            txn.effective_date(ViewMode::Cash),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
        );
        assert_eq!(
            txn.effective_date(ViewMode::Accrual),
            NaiveDate::from_ymd_opt(2025, 12, 20).unwrap()
        );
        assert_eq!(txn.date, posting);
    }

    #[test]
    fn test_set_line_kind_clears_flag() {
        let mut txn = base_txn(Direction::Out, 5000);
        assert!(txn.affects_statement);

        txn.set_line_kind(LineKind::InvoicePayment);
        assert!(!txn.affects_statement);
        assert!(txn.validate().is_ok());

        let mut transfer = base_txn(Direction::In, 5000);
        transfer.set_line_kind(LineKind::InternalTransfer);
        assert!(!transfer.affects_statement);
    }

    #[test]
    fn test_validate_excluded_kind_with_flag() {
        let mut txn = base_txn(Direction::Out, 5000);
        txn.line_kind = LineKind::InvoicePayment;
        txn.affects_statement = true;

        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::ExcludedKindAffectsStatement(
                LineKind::InvoicePayment
            ))
        );
    }

    #[test]
    fn test_validate_negative_amount() {
        let txn = base_txn(Direction::Out, -100);
        assert!(matches!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_structural_exclusion_kinds() {
        assert!(!LineKind::Operational.is_structural_exclusion());
        assert!(LineKind::InvoicePayment.is_structural_exclusion());
        assert!(LineKind::InternalTransfer.is_structural_exclusion());
    }

    #[test]
    fn test_line_kind_parse() {
        assert_eq!(LineKind::parse("operational"), Some(LineKind::Operational));
        assert_eq!(
            LineKind::parse("invoice-payment"),
            Some(LineKind::InvoicePayment)
        );
        assert_eq!(
            LineKind::parse("internal_transfer"),
            Some(LineKind::InternalTransfer)
        );
        assert_eq!(LineKind::parse("wire"), None);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("in"), Some(Direction::In));
        assert_eq!(Direction::parse("OUT"), Some(Direction::Out));
        assert_eq!(Direction::parse("entrada"), Some(Direction::In));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn test_import_id_generation() {
        let mut txn = base_txn(Direction::Out, 5000);
        txn.description = "Grocery store".to_string();

        let import_id = txn.generate_import_id();
        assert!(import_id.starts_with("imp-"));
        assert_eq!(import_id, txn.generate_import_id());
    }

    #[test]
    fn test_serialization_defaults() {
        let txn = base_txn(Direction::In, 5000);
        let json = serde_json::to_string(&txn).unwrap();
        let back: BankTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, txn.id);
        assert_eq!(back.line_kind, LineKind::Operational);
        assert!(back.affects_statement);
    }

    #[test]
    fn test_display() {
        let mut txn = base_txn(Direction::Out, 5000);
        txn.description = "Groceries".to_string();
        assert_eq!(format!("{}", txn), "2026-01-15 Groceries -$50.00");
    }
}
