//! The ledger document
//!
//! Every record the statement engine reads lives in one JSON blob:
//! entities, institutions, the category dictionary, bank and card
//! transactions, investment assets and their monthly snapshots, fixed
//! assets, and liabilities. Loading is all-or-nothing and saving goes
//! through the atomic writer, so the document on disk is always a
//! complete, parseable state.

use serde::{Deserialize, Serialize};

use crate::models::{
    Asset, AssetId, BankTransaction, CardId, CardTransaction, CardTransactionId, Category,
    CategoryId, CreditCard, Entity, EntityId, FixedAsset, FixedAssetId, Institution,
    InstitutionId, InvestmentSnapshot, Liability, LiabilityId, MonthYear, PurchaseGroupId,
    SnapshotId, TransactionId,
};
use crate::statement::LedgerSnapshot;

/// Current ledger document schema version
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The single persisted document holding every record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerFile {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub entities: Vec<Entity>,

    #[serde(default)]
    pub institutions: Vec<Institution>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub bank_transactions: Vec<BankTransaction>,

    #[serde(default)]
    pub cards: Vec<CreditCard>,

    #[serde(default)]
    pub card_transactions: Vec<CardTransaction>,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub investment_snapshots: Vec<InvestmentSnapshot>,

    #[serde(default)]
    pub fixed_assets: Vec<FixedAsset>,

    #[serde(default)]
    pub liabilities: Vec<Liability>,
}

impl Default for LedgerFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entities: Vec::new(),
            institutions: Vec::new(),
            categories: Vec::new(),
            bank_transactions: Vec::new(),
            cards: Vec::new(),
            card_transactions: Vec::new(),
            assets: Vec::new(),
            investment_snapshots: Vec::new(),
            fixed_assets: Vec::new(),
            liabilities: Vec::new(),
        }
    }
}

fn name_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl LedgerFile {
    /// Whether the document holds no records at all
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.institutions.is_empty()
            && self.categories.is_empty()
            && self.bank_transactions.is_empty()
            && self.cards.is_empty()
            && self.card_transactions.is_empty()
            && self.assets.is_empty()
            && self.investment_snapshots.is_empty()
            && self.fixed_assets.is_empty()
            && self.liabilities.is_empty()
    }

    /// Borrow the engine's read-only view of this document
    pub fn snapshot(&self) -> LedgerSnapshot<'_> {
        LedgerSnapshot {
            bank_transactions: &self.bank_transactions,
            card_transactions: &self.card_transactions,
            investment_snapshots: &self.investment_snapshots,
            categories: &self.categories,
            institutions: &self.institutions,
            cards: &self.cards,
            assets: &self.assets,
        }
    }

    // Entities

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| name_eq(&e.name, name))
    }

    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| e.id != id);
        self.entities.len() != before
    }

    // Institutions

    pub fn institution(&self, id: InstitutionId) -> Option<&Institution> {
        self.institutions.iter().find(|i| i.id == id)
    }

    pub fn institution_mut(&mut self, id: InstitutionId) -> Option<&mut Institution> {
        self.institutions.iter_mut().find(|i| i.id == id)
    }

    pub fn institution_by_name(&self, name: &str) -> Option<&Institution> {
        self.institutions.iter().find(|i| name_eq(&i.name, name))
    }

    pub fn remove_institution(&mut self, id: InstitutionId) -> bool {
        let before = self.institutions.len();
        self.institutions.retain(|i| i.id != id);
        self.institutions.len() != before
    }

    // Categories

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| name_eq(&c.name, name))
    }

    pub fn remove_category(&mut self, id: CategoryId) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        self.categories.len() != before
    }

    /// Count of bank and card lines referencing a category
    pub fn category_usage(&self, id: CategoryId) -> usize {
        let bank = self
            .bank_transactions
            .iter()
            .filter(|t| t.category_id == Some(id))
            .count();
        let card = self
            .card_transactions
            .iter()
            .filter(|t| t.category_id == Some(id))
            .count();
        bank + card
    }

    // Bank transactions

    pub fn bank_transaction(&self, id: TransactionId) -> Option<&BankTransaction> {
        self.bank_transactions.iter().find(|t| t.id == id)
    }

    pub fn bank_transaction_mut(&mut self, id: TransactionId) -> Option<&mut BankTransaction> {
        self.bank_transactions.iter_mut().find(|t| t.id == id)
    }

    pub fn remove_bank_transaction(&mut self, id: TransactionId) -> bool {
        let before = self.bank_transactions.len();
        self.bank_transactions.retain(|t| t.id != id);
        self.bank_transactions.len() != before
    }

    // Cards

    pub fn card(&self, id: CardId) -> Option<&CreditCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut CreditCard> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn card_by_name(&self, name: &str) -> Option<&CreditCard> {
        self.cards.iter().find(|c| name_eq(&c.name, name))
    }

    pub fn remove_card(&mut self, id: CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        self.cards.len() != before
    }

    // Card transactions

    pub fn card_transaction(&self, id: CardTransactionId) -> Option<&CardTransaction> {
        self.card_transactions.iter().find(|t| t.id == id)
    }

    pub fn card_transaction_mut(&mut self, id: CardTransactionId) -> Option<&mut CardTransaction> {
        self.card_transactions.iter_mut().find(|t| t.id == id)
    }

    /// All installments of one purchase, in installment order
    pub fn purchase_installments(&self, group: PurchaseGroupId) -> Vec<&CardTransaction> {
        let mut installments: Vec<_> = self
            .card_transactions
            .iter()
            .filter(|t| t.purchase_group == group)
            .collect();
        installments.sort_by_key(|t| t.installment_index);
        installments
    }

    /// Remove every installment of one purchase, returning how many went
    pub fn remove_purchase(&mut self, group: PurchaseGroupId) -> usize {
        let before = self.card_transactions.len();
        self.card_transactions.retain(|t| t.purchase_group != group);
        before - self.card_transactions.len()
    }

    // Investment assets and snapshots

    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn asset_mut(&mut self, id: AssetId) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    pub fn asset_by_name(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| name_eq(&a.name, name))
    }

    pub fn remove_asset(&mut self, id: AssetId) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != id);
        self.assets.len() != before
    }

    pub fn snapshot_record(&self, id: SnapshotId) -> Option<&InvestmentSnapshot> {
        self.investment_snapshots.iter().find(|s| s.id == id)
    }

    /// The snapshot of one asset for one month, if recorded
    pub fn snapshot_for(&self, asset_id: AssetId, month: MonthYear) -> Option<&InvestmentSnapshot> {
        self.investment_snapshots
            .iter()
            .find(|s| s.asset_id == asset_id && s.month == month)
    }

    /// The most recent snapshot of one asset strictly before `month`
    pub fn latest_snapshot_before(
        &self,
        asset_id: AssetId,
        month: MonthYear,
    ) -> Option<&InvestmentSnapshot> {
        self.investment_snapshots
            .iter()
            .filter(|s| s.asset_id == asset_id && s.month < month)
            .max_by_key(|s| s.month)
    }

    /// The most recent snapshot of one asset at or before `month`
    pub fn latest_snapshot_through(
        &self,
        asset_id: AssetId,
        month: MonthYear,
    ) -> Option<&InvestmentSnapshot> {
        self.investment_snapshots
            .iter()
            .filter(|s| s.asset_id == asset_id && s.month <= month)
            .max_by_key(|s| s.month)
    }

    pub fn remove_snapshot(&mut self, id: SnapshotId) -> bool {
        let before = self.investment_snapshots.len();
        self.investment_snapshots.retain(|s| s.id != id);
        self.investment_snapshots.len() != before
    }

    // Fixed assets and liabilities

    pub fn fixed_asset(&self, id: FixedAssetId) -> Option<&FixedAsset> {
        self.fixed_assets.iter().find(|f| f.id == id)
    }

    pub fn fixed_asset_mut(&mut self, id: FixedAssetId) -> Option<&mut FixedAsset> {
        self.fixed_assets.iter_mut().find(|f| f.id == id)
    }

    pub fn fixed_asset_by_name(&self, name: &str) -> Option<&FixedAsset> {
        self.fixed_assets.iter().find(|f| name_eq(&f.name, name))
    }

    pub fn remove_fixed_asset(&mut self, id: FixedAssetId) -> bool {
        let before = self.fixed_assets.len();
        self.fixed_assets.retain(|f| f.id != id);
        self.fixed_assets.len() != before
    }

    pub fn liability(&self, id: LiabilityId) -> Option<&Liability> {
        self.liabilities.iter().find(|l| l.id == id)
    }

    pub fn liability_mut(&mut self, id: LiabilityId) -> Option<&mut Liability> {
        self.liabilities.iter_mut().find(|l| l.id == id)
    }

    pub fn liability_by_name(&self, name: &str) -> Option<&Liability> {
        self.liabilities.iter().find(|l| name_eq(&l.name, name))
    }

    pub fn remove_liability(&mut self, id: LiabilityId) -> bool {
        let before = self.liabilities.len();
        self.liabilities.retain(|l| l.id != id);
        self.liabilities.len() != before
    }
}
