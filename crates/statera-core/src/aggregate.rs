//! Section subtotals and grand totals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::LineItemStore;
use crate::types::SectionKey;

/// Sum of amounts per section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSubtotals {
    pub assets_current: Decimal,
    pub assets_non_current: Decimal,
    pub liabilities_current: Decimal,
    pub liabilities_non_current: Decimal,
    pub equity: Decimal,
    pub revenues: Decimal,
    pub expenses: Decimal,
    pub cash_receipts: Decimal,
    pub cash_payments: Decimal,
    pub cash_payroll: Decimal,
    pub cash_financial: Decimal,
}

impl SectionSubtotals {
    pub fn get(&self, section: SectionKey) -> Decimal {
        match section {
            SectionKey::AssetsCurrent => self.assets_current,
            SectionKey::AssetsNonCurrent => self.assets_non_current,
            SectionKey::LiabilitiesCurrent => self.liabilities_current,
            SectionKey::LiabilitiesNonCurrent => self.liabilities_non_current,
            SectionKey::EquityMain => self.equity,
            SectionKey::IncomeRevenues => self.revenues,
            SectionKey::IncomeExpenses => self.expenses,
            SectionKey::CashFlowReceipts => self.cash_receipts,
            SectionKey::CashFlowPayments => self.cash_payments,
            SectionKey::CashFlowPayroll => self.cash_payroll,
            SectionKey::CashFlowFinancial => self.cash_financial,
        }
    }

    fn slot(&mut self, section: SectionKey) -> &mut Decimal {
        match section {
            SectionKey::AssetsCurrent => &mut self.assets_current,
            SectionKey::AssetsNonCurrent => &mut self.assets_non_current,
            SectionKey::LiabilitiesCurrent => &mut self.liabilities_current,
            SectionKey::LiabilitiesNonCurrent => &mut self.liabilities_non_current,
            SectionKey::EquityMain => &mut self.equity,
            SectionKey::IncomeRevenues => &mut self.revenues,
            SectionKey::IncomeExpenses => &mut self.expenses,
            SectionKey::CashFlowReceipts => &mut self.cash_receipts,
            SectionKey::CashFlowPayments => &mut self.cash_payments,
            SectionKey::CashFlowPayroll => &mut self.cash_payroll,
            SectionKey::CashFlowFinancial => &mut self.cash_financial,
        }
    }
}

/// Subtotals plus the cross-section grand totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub sections: SectionSubtotals,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
}

/// Sum every section of the store.
///
/// Plain order-independent sums; no account is special-cased by name here.
/// Amounts are bounded by [`MAX_AMOUNT`](crate::models::MAX_AMOUNT), so the
/// sums and the differences taken from them stay inside `Decimal`'s range.
pub fn aggregate(store: &LineItemStore) -> Totals {
    let mut sections = SectionSubtotals::default();
    for key in SectionKey::ALL {
        *sections.slot(key) = store.section(key).iter().map(|item| item.amount).sum();
    }

    Totals {
        total_assets: sections.assets_current + sections.assets_non_current,
        total_liabilities: sections.liabilities_current + sections.liabilities_non_current,
        total_equity: sections.equity,
        total_revenue: sections.revenues,
        total_expenses: sections.expenses,
        sections,
    }
}
