//! Computation result handed to presentation layers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Totals};
use crate::checker::{direction_of, Consistency, Direction};
use crate::ratios::Ratios;
use crate::roles::RoleTable;
use crate::statements::{BalanceSheet, CashFlowSummary, IncomeStatement, RoleAmounts, StatementBuilder};
use crate::store::LineItemStore;

/// Everything derived from one store snapshot.
///
/// Built from scratch on every recompute; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationResult {
    /// Store revision this result was computed from
    pub revision: u64,
    pub totals: Totals,
    pub balance_sheet: BalanceSheet,
    pub income_statement: IncomeStatement,
    pub cash_flow: CashFlowSummary,
    pub roles: RoleAmounts,
    pub ratios: Ratios,
    pub balanced: bool,
    pub imbalance: Decimal,
}

impl ComputationResult {
    /// Run aggregation, statements, ratios and the identity check
    pub fn compute(store: &LineItemStore, roles: &RoleTable) -> Self {
        let totals = aggregate(store);
        let statements = StatementBuilder::new(roles).build(store, &totals);
        let ratios = Ratios::compute(
            &statements.balance_sheet,
            &statements.income_statement,
            &statements.roles,
        );
        let consistency = Consistency::check(
            statements.balance_sheet.total_assets,
            statements.balance_sheet.liabilities_plus_equity,
        );

        if !consistency.balanced {
            log::warn!(
                "balance sheet out of balance by {} (assets {} vs liabilities+equity {})",
                consistency.imbalance,
                statements.balance_sheet.total_assets,
                statements.balance_sheet.liabilities_plus_equity
            );
        }

        Self {
            revision: store.revision(),
            totals,
            balance_sheet: statements.balance_sheet,
            income_statement: statements.income_statement,
            cash_flow: statements.cash_flow,
            roles: statements.roles,
            ratios,
            balanced: consistency.balanced,
            imbalance: consistency.imbalance,
        }
    }

    pub fn direction(&self) -> Direction {
        direction_of(self.balanced, self.imbalance)
    }
}
