//! Core statement computation: line items, totals, statements and ratios

pub mod aggregate;
pub mod checker;
pub mod error;
pub mod models;
pub mod ratios;
pub mod reports;
pub mod roles;
pub mod statements;
pub mod store;
pub mod types;

use rust_decimal::Decimal;
use statera_config::{Config, EngineConfig};

pub use aggregate::{aggregate, SectionSubtotals, Totals};
pub use checker::{Consistency, Direction, BALANCE_TOLERANCE};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use models::{clamp_amount, LineItem, LineItemId, LineItemPatch, Metadata, MAX_AMOUNT};
pub use ratios::{ratio, Ratios};
pub use reports::ComputationResult;
pub use roles::{Role, RoleTable};
pub use statements::{BalanceSheet, CashFlowSummary, IncomeStatement, RoleAmounts, StatementBuilder, Statements};
pub use store::LineItemStore;
pub use types::{Group, SectionKey, Subgroup};

// ==================== Engine ====================

/// One editing session: a store, its metadata and the last computed result.
///
/// Results are never updated in place. [`Engine::recompute`] rebuilds them
/// from the store, and [`Engine::last_result`] hides a result once the
/// store has moved past the revision it was computed from.
#[derive(Debug, Clone)]
pub struct Engine {
    defaults: EngineConfig,
    roles: RoleTable,
    store: LineItemStore,
    metadata: Metadata,
    last_result: Option<ComputationResult>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Engine {
    /// Create an empty engine from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            defaults: config.engine.clone(),
            roles: RoleTable::from_config(&config.roles),
            store: LineItemStore::new(),
            metadata: Metadata::default(),
            last_result: None,
        }
    }

    /// Create an engine around an existing store
    pub fn with_store(config: &Config, store: LineItemStore) -> Self {
        let mut engine = Self::new(config);
        engine.store = store;
        engine
    }

    // ==================== Line Items ====================

    /// Add a line item, falling back to the configured name and amount
    pub fn add_line_item(
        &mut self,
        section: SectionKey,
        name: Option<&str>,
        amount: Option<Decimal>,
    ) -> LineItemId {
        let name = name.unwrap_or(self.defaults.default_item_name.as_str()).to_string();
        let amount = amount.unwrap_or(self.defaults.default_amount);
        self.store.add(section, name, amount)
    }

    /// Add a line item by textual group and subgroup
    pub fn add_line_item_at(
        &mut self,
        group: &str,
        subgroup: &str,
        name: Option<&str>,
        amount: Option<Decimal>,
    ) -> CoreResult<LineItemId> {
        let section = SectionKey::parse(group, subgroup)?;
        Ok(self.add_line_item(section, name, amount))
    }

    /// Remove a line item; unknown ids are ignored
    pub fn remove_line_item(&mut self, id: &LineItemId) -> bool {
        self.store.remove(id).is_some()
    }

    /// Patch a line item in place; returns whether it changed
    pub fn update_line_item(&mut self, id: &LineItemId, patch: &LineItemPatch) -> bool {
        self.store.update(id, patch)
    }

    /// Move a line item to another section, keeping its id
    pub fn move_line_item(&mut self, id: &LineItemId, section: SectionKey) -> bool {
        self.store.move_to(id, section)
    }

    /// Owned copy of one section
    pub fn list_section(&self, section: SectionKey) -> Vec<LineItem> {
        self.store.list_section(section)
    }

    /// Remove every line item
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn store(&self) -> &LineItemStore {
        &self.store
    }

    /// Mutable store access; store mutations still advance the revision
    pub fn store_mut(&mut self) -> &mut LineItemStore {
        &mut self.store
    }

    /// Swap in a whole store, e.g. after an import.
    ///
    /// The revision keeps increasing across the swap so results computed
    /// before it are seen as stale.
    pub fn replace_store(&mut self, mut store: LineItemStore) {
        store.revision = self.store.revision.max(store.revision) + 1;
        self.store = store;
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    // ==================== Computation ====================

    /// Compute a fresh result without caching it
    pub fn compute(&self) -> ComputationResult {
        ComputationResult::compute(&self.store, &self.roles)
    }

    /// Recompute from the current store and keep the result
    pub fn recompute(&mut self) -> &ComputationResult {
        let result = self.compute();
        log::debug!(
            "recomputed revision {}: {} items, assets {}, net result {}",
            result.revision,
            self.store.len(),
            result.balance_sheet.total_assets,
            result.income_statement.net_result
        );
        self.last_result.insert(result)
    }

    /// Last computed result, or `None` if the store changed since
    pub fn last_result(&self) -> Option<&ComputationResult> {
        self.last_result
            .as_ref()
            .filter(|result| result.revision == self.store.revision())
    }

    /// Whether a cached result exists but no longer matches the store
    pub fn is_stale(&self) -> bool {
        self.last_result
            .as_ref()
            .map_or(false, |result| result.revision != self.store.revision())
    }
}

// ==================== Tests ====================
