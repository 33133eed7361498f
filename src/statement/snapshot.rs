//! Immutable input bundle for the statement engine
//!
//! The engine never touches storage. Callers assemble a `LedgerSnapshot` of
//! borrowed slices and pass it in; because the snapshot is a cheap bundle of
//! references, the same one can be reused across many windows, which is how
//! the trend report runs twelve monthly aggregations over one dataset.

use crate::models::{
    Asset, AssetId, BankTransaction, CardId, CardTransaction, Category, CreditCard, Institution,
    InstitutionId, InvestmentSnapshot,
};

/// Borrowed view over every collection the engine reads
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerSnapshot<'a> {
    pub bank_transactions: &'a [BankTransaction],
    pub card_transactions: &'a [CardTransaction],
    pub investment_snapshots: &'a [InvestmentSnapshot],
    pub categories: &'a [Category],
    pub institutions: &'a [Institution],
    pub cards: &'a [CreditCard],
    pub assets: &'a [Asset],
}

impl<'a> LedgerSnapshot<'a> {
    /// Name of an institution, for drill-down source labels
    pub fn institution_name(&self, id: InstitutionId) -> Option<&'a str> {
        self.institutions
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.name.as_str())
    }

    /// Name of a card, for drill-down source labels
    pub fn card_name(&self, id: CardId) -> Option<&'a str> {
        self.cards.iter().find(|c| c.id == id).map(|c| c.name.as_str())
    }

    /// An asset by id
    pub fn asset(&self, id: AssetId) -> Option<&'a Asset> {
        self.assets.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetClass, EntityKind, InstitutionKind, Money};

    #[test]
    fn test_empty_snapshot() {
        let snapshot = LedgerSnapshot::default();
        assert!(snapshot.bank_transactions.is_empty());
        assert!(snapshot.institution_name(InstitutionId::new()).is_none());
        assert!(snapshot.asset(AssetId::new()).is_none());
    }

    #[test]
    fn test_lookups() {
        let entity = crate::models::Entity::new("Main holding", EntityKind::Business);
        let institutions = vec![Institution::new(
            "Main bank",
            InstitutionKind::Bank,
            entity.id,
            Money::zero(),
        )];
        let assets = vec![Asset::new(
            "Index fund",
            AssetClass::Equities,
            institutions[0].id,
            entity.id,
        )];

        let snapshot = LedgerSnapshot {
            institutions: &institutions,
            assets: &assets,
            ..Default::default()
        };

        assert_eq!(
            snapshot.institution_name(institutions[0].id),
            Some("Main bank")
        );
        assert_eq!(
            snapshot.asset(assets[0].id).map(|a| a.name.as_str()),
            Some("Index fund")
        );
        assert!(snapshot.card_name(CardId::new()).is_none());
    }
}
