//! Investment asset and monthly snapshot models
//!
//! Investments are tracked by monthly closing snapshots rather than by
//! individual trades. The yield of a month is derived from the balance
//! movement net of cash flows:
//!
//! `yield = closing - prior closing - contributions + withdrawals`
//!
//! and feeds the "Financial income / Variation" group of the statement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AssetId, EntityId, InstitutionId, SnapshotId};
use super::money::Money;
use super::period::MonthYear;

/// Strategic class of an investment asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Cash-like holdings, redeemable on short notice
    #[default]
    Liquidity,
    /// Stocks, funds, and other variable-income holdings
    Equities,
    /// Pension, real estate funds, and other long-horizon holdings
    LongTerm,
}

impl AssetClass {
    /// Parse a class from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "liquidity" | "liquidez" => Some(Self::Liquidity),
            "equities" | "renda variável" | "renda variavel" => Some(Self::Equities),
            "long_term" | "long-term" | "longo prazo" => Some(Self::LongTerm),
            _ => None,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Liquidity => write!(f, "Liquidity"),
            Self::Equities => write!(f, "Equities"),
            Self::LongTerm => write!(f, "Long term"),
        }
    }
}

/// An investment asset tracked by monthly snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier
    pub id: AssetId,

    /// Asset name (e.g. "Treasury 2030", "Index fund")
    pub name: String,

    /// Strategic class
    pub class: AssetClass,

    /// Institution holding the asset
    pub institution_id: InstitutionId,

    /// Holding entity the asset belongs to
    pub entity_id: EntityId,

    /// When the asset was created
    pub created_at: DateTime<Utc>,
}

impl Asset {
    /// Create a new asset
    pub fn new(
        name: impl Into<String>,
        class: AssetClass,
        institution_id: InstitutionId,
        entity_id: EntityId,
    ) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            class,
            institution_id,
            entity_id,
            created_at: Utc::now(),
        }
    }

    /// Validate the asset
    pub fn validate(&self) -> Result<(), AssetValidationError> {
        if self.name.trim().is_empty() {
            return Err(AssetValidationError::EmptyName);
        }

        Ok(())
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.class)
    }
}

/// Validation errors for assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetValidationError {
    EmptyName,
}

impl fmt::Display for AssetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Asset name cannot be empty"),
        }
    }
}

impl std::error::Error for AssetValidationError {}

/// Closing snapshot of one asset for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentSnapshot {
    /// Unique identifier
    pub id: SnapshotId,

    /// The asset this snapshot belongs to
    pub asset_id: AssetId,

    /// The month the snapshot closes
    pub month: MonthYear,

    /// Balance at the end of the month
    pub closing_balance: Money,

    /// Money put into the asset during the month
    pub contributions: Money,

    /// Money taken out of the asset during the month
    pub withdrawals: Money,

    /// Yield recognized for the month; negative on a loss
    pub yield_amount: Money,

    /// When the snapshot was recorded
    pub created_at: DateTime<Utc>,
}

impl InvestmentSnapshot {
    /// Create a snapshot with an already-computed yield
    pub fn new(
        asset_id: AssetId,
        month: MonthYear,
        closing_balance: Money,
        contributions: Money,
        withdrawals: Money,
        yield_amount: Money,
    ) -> Self {
        Self {
            id: SnapshotId::new(),
            asset_id,
            month,
            closing_balance,
            contributions,
            withdrawals,
            yield_amount,
            created_at: Utc::now(),
        }
    }

    /// The month's yield: balance movement net of cash flows
    pub fn compute_yield(
        closing_balance: Money,
        prior_closing_balance: Money,
        contributions: Money,
        withdrawals: Money,
    ) -> Money {
        closing_balance - prior_closing_balance - contributions + withdrawals
    }

    /// Validate the snapshot
    pub fn validate(&self) -> Result<(), SnapshotValidationError> {
        if !self.month.is_valid() {
            return Err(SnapshotValidationError::InvalidMonth(self.month.month));
        }

        if self.contributions.is_negative() {
            return Err(SnapshotValidationError::NegativeFlow("contributions"));
        }

        if self.withdrawals.is_negative() {
            return Err(SnapshotValidationError::NegativeFlow("withdrawals"));
        }

        Ok(())
    }
}

impl fmt::Display for InvestmentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} closing {} yield {}",
            self.month, self.closing_balance, self.yield_amount
        )
    }
}

/// Validation errors for investment snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotValidationError {
    InvalidMonth(u32),
    NegativeFlow(&'static str),
}

impl fmt::Display for SnapshotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMonth(month) => {
                write!(f, "Month must be between 1 and 12 (got {})", month)
            }
            Self::NegativeFlow(field) => {
                write!(f, "Snapshot {} must not be negative", field)
            }
        }
    }
}

impl std::error::Error for SnapshotValidationError {}
