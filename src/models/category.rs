//! Category model and the fixed report-group hierarchy
//!
//! Every category maps to exactly one report group from a closed, ordered
//! enumeration. Aggregation buckets are keyed by this enumeration, never by
//! free strings, so a category pointing outside it is unrepresentable once
//! typed; raw group names are checked where categories enter the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// The fixed, order-sensitive set of income-statement report groups.
///
/// The declaration order is the statement's display order: the first four
/// groups form the operating section, the next three the wealth section,
/// and internal transfers sit outside both roll-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportGroup {
    OperatingRevenue,
    SurvivalCost,
    ComfortCost,
    ProfessionalExpenses,
    NonOperating,
    FinancialVariation,
    RealizedInvestments,
    InternalTransfers,
}

impl ReportGroup {
    /// All groups in statement order
    pub fn all() -> &'static [Self] {
        &[
            Self::OperatingRevenue,
            Self::SurvivalCost,
            Self::ComfortCost,
            Self::ProfessionalExpenses,
            Self::NonOperating,
            Self::FinancialVariation,
            Self::RealizedInvestments,
            Self::InternalTransfers,
        ]
    }

    /// The groups summed into the operating result (after revenue)
    pub fn operating_costs() -> &'static [Self] {
        &[
            Self::SurvivalCost,
            Self::ComfortCost,
            Self::ProfessionalExpenses,
        ]
    }

    /// The groups summed into the wealth result
    pub fn wealth_groups() -> &'static [Self] {
        &[
            Self::NonOperating,
            Self::FinancialVariation,
            Self::RealizedInvestments,
        ]
    }

    /// Display label for this group
    pub fn label(&self) -> &'static str {
        match self {
            Self::OperatingRevenue => "Operating revenue",
            Self::SurvivalCost => "Survival living cost",
            Self::ComfortCost => "Comfort living cost",
            Self::ProfessionalExpenses => "Professional expenses",
            Self::NonOperating => "Non-operating movements",
            Self::FinancialVariation => "Financial income / Variation",
            Self::RealizedInvestments => "Realized investments",
            Self::InternalTransfers => "Internal transfers",
        }
    }

    /// Parse a group from a label, slug, or legacy Portuguese name.
    ///
    /// Returns `None` for anything outside the enumeration; callers turn
    /// that into an explicit configuration error rather than guessing.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "operating revenue" | "operating_revenue" | "receitas operacionais" => {
                Some(Self::OperatingRevenue)
            }
            "survival living cost" | "survival_cost" | "custo de vida sobrevivência"
            | "custo de vida sobrevivencia" => Some(Self::SurvivalCost),
            "comfort living cost" | "comfort_cost" | "custo de vida conforto" => {
                Some(Self::ComfortCost)
            }
            "professional expenses" | "professional_expenses" | "despesas profissionais" => {
                Some(Self::ProfessionalExpenses)
            }
            "non-operating movements" | "non_operating" | "movimentações não operacionais"
            | "movimentacoes nao operacionais" => Some(Self::NonOperating),
            "financial income / variation" | "financial_variation"
            | "receitas financeiras / variação" | "receitas financeiras / variacao" => {
                Some(Self::FinancialVariation)
            }
            "realized investments" | "realized_investments" | "investimentos realizados" => {
                Some(Self::RealizedInvestments)
            }
            "internal transfers" | "internal_transfers" | "transferências internas"
            | "transferencias internas" => Some(Self::InternalTransfers),
            _ => None,
        }
    }

    /// Position in statement order (used for sorting breakdowns)
    pub fn sort_order(&self) -> usize {
        Self::all()
            .iter()
            .position(|g| g == self)
            .unwrap_or(usize::MAX)
    }

    /// Whether this group belongs to the operating section
    pub fn is_operating(&self) -> bool {
        matches!(
            self,
            Self::OperatingRevenue
                | Self::SurvivalCost
                | Self::ComfortCost
                | Self::ProfessionalExpenses
        )
    }
}

impl fmt::Display for ReportGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What kind of money flow a category describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
    Transfer,
}

impl CategoryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" => Some(Self::Income),
            "expense" | "despesa" => Some(Self::Expense),
            "transfer" | "transferencia" | "transferência" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// A statement category: named bucket inside one report group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name (e.g. "Dividends", "Groceries")
    pub name: String,

    /// Report group this category rolls into
    pub group: ReportGroup,

    /// Income, expense, or transfer
    #[serde(default)]
    pub kind: CategoryKind,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, group: ReportGroup, kind: CategoryKind) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            group,
            kind,
            created_at: Utc::now(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 60 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 60)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
