//! Holding entities and financial institutions
//!
//! An entity is the person or company the money belongs to; institutions
//! (bank accounts, brokerages, wallets) belong to exactly one entity. Every
//! transaction, card, and asset hangs off this pair, which is what makes
//! per-entity filtering possible in the net worth report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EntityId, InstitutionId};
use super::money::Money;

/// Kind of holding entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A natural person
    #[default]
    Personal,
    /// A company or holding vehicle
    Business,
}

impl EntityKind {
    /// Parse a kind from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "personal" | "pf" => Some(Self::Personal),
            "business" | "pj" => Some(Self::Business),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Business => write!(f, "business"),
        }
    }
}

/// A person or company whose wealth is tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,

    /// Entity name (e.g. "Main holding")
    pub name: String,

    /// Personal or business
    pub kind: EntityKind,

    /// When the entity was created
    pub created_at: DateTime<Utc>,
}

impl Entity {
    /// Create a new entity
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// Validate the entity
    pub fn validate(&self) -> Result<(), InstitutionValidationError> {
        if self.name.trim().is_empty() {
            return Err(InstitutionValidationError::EmptyName);
        }

        Ok(())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Kind of financial institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstitutionKind {
    /// A bank account; counts toward the net worth bank section
    #[default]
    Bank,
    /// A brokerage; balances live in investment snapshots instead
    Brokerage,
    /// Physical cash or a prepaid wallet
    Wallet,
}

impl InstitutionKind {
    /// Parse a kind from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bank" | "banco" => Some(Self::Bank),
            "brokerage" | "corretora" => Some(Self::Brokerage),
            "wallet" | "caixa/carteira" | "carteira" => Some(Self::Wallet),
            _ => None,
        }
    }

    /// Whether account balances of this kind are carried by bank
    /// transactions (as opposed to investment snapshots)
    pub fn holds_cash_balance(&self) -> bool {
        matches!(self, Self::Bank | Self::Wallet)
    }
}

impl fmt::Display for InstitutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => write!(f, "bank"),
            Self::Brokerage => write!(f, "brokerage"),
            Self::Wallet => write!(f, "wallet"),
        }
    }
}

/// A bank account, brokerage, or wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    /// Unique identifier
    pub id: InstitutionId,

    /// Institution name (e.g. "Main bank")
    pub name: String,

    /// Bank, brokerage, or wallet
    pub kind: InstitutionKind,

    /// Holding entity the account belongs to
    pub entity_id: EntityId,

    /// Balance when tracking started; transaction deltas apply on top
    pub opening_balance: Money,

    /// When the institution was created
    pub created_at: DateTime<Utc>,
}

impl Institution {
    /// Create a new institution
    pub fn new(
        name: impl Into<String>,
        kind: InstitutionKind,
        entity_id: EntityId,
        opening_balance: Money,
    ) -> Self {
        Self {
            id: InstitutionId::new(),
            name: name.into(),
            kind,
            entity_id,
            opening_balance,
            created_at: Utc::now(),
        }
    }

    /// Validate the institution
    pub fn validate(&self) -> Result<(), InstitutionValidationError> {
        if self.name.trim().is_empty() {
            return Err(InstitutionValidationError::EmptyName);
        }

        Ok(())
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Validation errors shared by entities and institutions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstitutionValidationError {
    EmptyName,
}

impl fmt::Display for InstitutionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
        }
    }
}

impl std::error::Error for InstitutionValidationError {}
