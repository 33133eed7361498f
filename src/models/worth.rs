//! Fixed assets and liabilities, the non-financial sides of net worth

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EntityId, FixedAssetId, LiabilityId};
use super::money::Money;

/// Kind of fixed asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FixedAssetKind {
    /// Real estate
    Property,
    /// Cars, motorcycles, boats
    Vehicle,
    /// Equity stake in a private company
    Stake,
    /// Machinery and equipment
    Equipment,
    #[default]
    Other,
}

impl FixedAssetKind {
    /// Parse a kind from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "property" | "imovel" | "imóvel" => Some(Self::Property),
            "vehicle" | "veiculo" | "veículo" => Some(Self::Vehicle),
            "stake" | "participacao" | "participação" => Some(Self::Stake),
            "equipment" | "equipamento" => Some(Self::Equipment),
            "other" | "outro" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for FixedAssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => write!(f, "property"),
            Self::Vehicle => write!(f, "vehicle"),
            Self::Stake => write!(f, "stake"),
            Self::Equipment => write!(f, "equipment"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A non-financial asset valued at market price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Unique identifier
    pub id: FixedAssetId,

    /// Asset name (e.g. "Beach apartment")
    pub name: String,

    /// Kind of asset
    pub kind: FixedAssetKind,

    /// Holding entity the asset belongs to
    pub entity_id: EntityId,

    /// What was paid for it
    pub acquisition_value: Money,

    /// Current market value; this is what net worth counts
    pub market_value: Money,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl FixedAsset {
    /// Create a new fixed asset
    pub fn new(
        name: impl Into<String>,
        kind: FixedAssetKind,
        entity_id: EntityId,
        acquisition_value: Money,
        market_value: Money,
    ) -> Self {
        Self {
            id: FixedAssetId::new(),
            name: name.into(),
            kind,
            entity_id,
            acquisition_value,
            market_value,
            created_at: Utc::now(),
        }
    }

    /// Unrealized gain or loss against the acquisition value
    pub fn appreciation(&self) -> Money {
        self.market_value - self.acquisition_value
    }

    /// Validate the fixed asset
    pub fn validate(&self) -> Result<(), WorthValidationError> {
        if self.name.trim().is_empty() {
            return Err(WorthValidationError::EmptyName);
        }

        Ok(())
    }
}

impl fmt::Display for FixedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Kind of liability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LiabilityKind {
    /// Mortgage or vehicle financing
    Financing,
    /// A personal or business loan
    Loan,
    /// A store or service installment plan
    Installment,
    #[default]
    Other,
}

impl LiabilityKind {
    /// Parse a kind from a CLI string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "financing" | "financiamento" => Some(Self::Financing),
            "loan" | "emprestimo" | "empréstimo" => Some(Self::Loan),
            "installment" | "parcelamento" => Some(Self::Installment),
            "other" | "outro" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for LiabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Financing => write!(f, "financing"),
            Self::Loan => write!(f, "loan"),
            Self::Installment => write!(f, "installment"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A debt counted against net worth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liability {
    /// Unique identifier
    pub id: LiabilityId,

    /// Liability name (e.g. "Apartment mortgage")
    pub name: String,

    /// Kind of liability
    pub kind: LiabilityKind,

    /// Holding entity the debt belongs to
    pub entity_id: EntityId,

    /// Remaining balance owed
    pub outstanding_balance: Money,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl Liability {
    /// Create a new liability
    pub fn new(
        name: impl Into<String>,
        kind: LiabilityKind,
        entity_id: EntityId,
        outstanding_balance: Money,
    ) -> Self {
        Self {
            id: LiabilityId::new(),
            name: name.into(),
            kind,
            entity_id,
            outstanding_balance,
            created_at: Utc::now(),
        }
    }

    /// Validate the liability
    pub fn validate(&self) -> Result<(), WorthValidationError> {
        if self.name.trim().is_empty() {
            return Err(WorthValidationError::EmptyName);
        }

        if self.outstanding_balance.is_negative() {
            return Err(WorthValidationError::NegativeBalance(
                self.outstanding_balance,
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Liability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Validation errors for fixed assets and liabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorthValidationError {
    EmptyName,
    NegativeBalance(Money),
}

impl fmt::Display for WorthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NegativeBalance(balance) => {
                write!(f, "Outstanding balance must not be negative (got {})", balance)
            }
        }
    }
}

impl std::error::Error for WorthValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_asset_appreciation() {
        let asset = FixedAsset::new(
            "Beach apartment",
            FixedAssetKind::Property,
            EntityId::new(),
            Money::from_units(300_000),
            Money::from_units(380_000),
        );
        assert_eq!(asset.appreciation(), Money::from_units(80_000));
        assert!(asset.validate().is_ok());
    }

    #[test]
    fn test_liability_validation() {
        let mut debt = Liability::new(
            "Apartment mortgage",
            LiabilityKind::Financing,
            EntityId::new(),
            Money::from_units(150_000),
        );
        assert!(debt.validate().is_ok());

        debt.outstanding_balance = Money::from_cents(-1);
        assert!(matches!(
            debt.validate(),
            Err(WorthValidationError::NegativeBalance(_))
        ));

        debt.outstanding_balance = Money::zero();
        debt.name = String::new();
        assert_eq!(debt.validate(), Err(WorthValidationError::EmptyName));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            FixedAssetKind::parse("imóvel"),
            Some(FixedAssetKind::Property)
        );
        assert_eq!(FixedAssetKind::parse("vehicle"), Some(FixedAssetKind::Vehicle));
        assert_eq!(FixedAssetKind::parse("yacht"), None);

        assert_eq!(LiabilityKind::parse("loan"), Some(LiabilityKind::Loan));
        assert_eq!(
            LiabilityKind::parse("financiamento"),
            Some(LiabilityKind::Financing)
        );
        assert_eq!(LiabilityKind::parse("iou"), None);
    }

    #[test]
    fn test_serialization() {
        let debt = Liability::new(
            "Car loan",
            LiabilityKind::Financing,
            EntityId::new(),
            Money::from_units(20_000),
        );
        let json = serde_json::to_string(&debt).unwrap();
        let back: Liability = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, debt.id);
        assert_eq!(back.outstanding_balance, debt.outstanding_balance);
    }
}
