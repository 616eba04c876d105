//! Balance sheet, income statement and cash-flow summary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::Totals;
use crate::roles::{Role, RoleTable};
use crate::store::LineItemStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub current_assets: Decimal,
    pub non_current_assets: Decimal,
    pub total_assets: Decimal,
    pub current_liabilities: Decimal,
    pub non_current_liabilities: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    /// Total liabilities plus equity; compared against `total_assets`
    /// by the consistency check, never forced equal to it.
    pub liabilities_plus_equity: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub total_revenue: Decimal,
    pub cost_of_sales: Decimal,
    pub gross_profit: Decimal,
    pub total_expenses: Decimal,
    /// Expenses other than cost of sales, interest and tax
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    pub operating_result: Decimal,
    pub ebitda: Decimal,
    pub financial_expense: Decimal,
    pub pre_tax_result: Decimal,
    pub tax_expense: Decimal,
    pub net_result: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub receipts: Decimal,
    pub payments: Decimal,
    pub payroll: Decimal,
    pub financial: Decimal,
    pub total_outflows: Decimal,
    pub net_flow: Decimal,
}

/// Amounts attributed to each recognized role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAmounts {
    pub cost_of_sales: Decimal,
    pub depreciation: Decimal,
    pub financial_expense: Decimal,
    pub tax_expense: Decimal,
    pub inventory: Decimal,
}

impl RoleAmounts {
    pub fn get(&self, role: Role) -> Decimal {
        match role {
            Role::CostOfSales => self.cost_of_sales,
            Role::Depreciation => self.depreciation,
            Role::FinancialExpense => self.financial_expense,
            Role::TaxExpense => self.tax_expense,
            Role::Inventory => self.inventory,
        }
    }
}

/// The three statements built from one set of totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statements {
    pub balance_sheet: BalanceSheet,
    pub income_statement: IncomeStatement,
    pub cash_flow: CashFlowSummary,
    pub roles: RoleAmounts,
}

/// Turns aggregated totals into statements using a role table
pub struct StatementBuilder<'a> {
    roles: &'a RoleTable,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(roles: &'a RoleTable) -> Self {
        Self { roles }
    }

    /// Resolve role amounts from the sections each role lives in
    pub fn role_amounts(&self, store: &LineItemStore) -> RoleAmounts {
        let sum = |role: Role| self.roles.sum_role(role, store.section(role.section()));
        RoleAmounts {
            cost_of_sales: sum(Role::CostOfSales),
            depreciation: sum(Role::Depreciation),
            financial_expense: sum(Role::FinancialExpense),
            tax_expense: sum(Role::TaxExpense),
            inventory: sum(Role::Inventory),
        }
    }

    pub fn build(&self, store: &LineItemStore, totals: &Totals) -> Statements {
        let roles = self.role_amounts(store);
        Statements {
            balance_sheet: balance_sheet(totals),
            income_statement: income_statement(totals, &roles),
            cash_flow: cash_flow(totals),
            roles,
        }
    }
}

pub fn balance_sheet(totals: &Totals) -> BalanceSheet {
    BalanceSheet {
        current_assets: totals.sections.assets_current,
        non_current_assets: totals.sections.assets_non_current,
        total_assets: totals.total_assets,
        current_liabilities: totals.sections.liabilities_current,
        non_current_liabilities: totals.sections.liabilities_non_current,
        total_liabilities: totals.total_liabilities,
        total_equity: totals.total_equity,
        liabilities_plus_equity: totals.total_liabilities + totals.total_equity,
    }
}

/// Income statement waterfall.
///
/// Interest and tax lines sit in the expenses section but are taken out of
/// operating expenses, so every expense is subtracted exactly once and
/// `net_result == total_revenue - total_expenses` always holds.
pub fn income_statement(totals: &Totals, roles: &RoleAmounts) -> IncomeStatement {
    let gross_profit = totals.total_revenue - roles.cost_of_sales;
    let operating_expenses =
        totals.total_expenses - roles.cost_of_sales - roles.financial_expense - roles.tax_expense;
    let operating_result = gross_profit - operating_expenses;
    let pre_tax_result = operating_result - roles.financial_expense;
    let net_result = pre_tax_result - roles.tax_expense;

    IncomeStatement {
        total_revenue: totals.total_revenue,
        cost_of_sales: roles.cost_of_sales,
        gross_profit,
        total_expenses: totals.total_expenses,
        operating_expenses,
        depreciation: roles.depreciation,
        operating_result,
        ebitda: operating_result + roles.depreciation,
        financial_expense: roles.financial_expense,
        pre_tax_result,
        tax_expense: roles.tax_expense,
        net_result,
    }
}

/// Cash-flow summary from the cash-flow sections only; it does not
/// reconcile with the accrual net result.
pub fn cash_flow(totals: &Totals) -> CashFlowSummary {
    let s = &totals.sections;
    let total_outflows = s.cash_payments + s.cash_payroll + s.cash_financial;
    CashFlowSummary {
        receipts: s.cash_receipts,
        payments: s.cash_payments,
        payroll: s.cash_payroll,
        financial: s.cash_financial,
        total_outflows,
        net_flow: s.cash_receipts - total_outflows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::types::SectionKey;
    use rust_decimal_macros::dec;

    fn build(store: &LineItemStore) -> Statements {
        let table = RoleTable::builtin();
        StatementBuilder::new(&table).build(store, &aggregate(store))
    }

    #[test]
    fn test_gross_and_operating_result() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::IncomeRevenues, "Ventas", dec!(10000));
        store.add(SectionKey::IncomeExpenses, "CostoDeVentas", dec!(6000));
        store.add(SectionKey::IncomeExpenses, "Renta", dec!(1000));

        let is = build(&store).income_statement;
        assert_eq!(is.cost_of_sales, dec!(6000));
        assert_eq!(is.gross_profit, dec!(4000));
        assert_eq!(is.operating_expenses, dec!(1000));
        assert_eq!(is.operating_result, dec!(3000));
        assert_eq!(is.pre_tax_result, dec!(3000));
        assert_eq!(is.net_result, dec!(3000));
    }

    #[test]
    fn test_unmatched_roles_default_to_zero() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::IncomeRevenues, "Ventas", dec!(500));
        store.add(SectionKey::IncomeExpenses, "Varios", dec!(200));

        let is = build(&store).income_statement;
        assert_eq!(is.cost_of_sales, Decimal::ZERO);
        assert_eq!(is.gross_profit, dec!(500));
        assert_eq!(is.operating_result, dec!(300));
    }

    #[test]
    fn test_interest_and_tax_below_operating_line() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::IncomeRevenues, "Sales", dec!(10000));
        store.add(SectionKey::IncomeExpenses, "Cost of sales", dec!(4000));
        store.add(SectionKey::IncomeExpenses, "Salaries", dec!(2000));
        store.add(SectionKey::IncomeExpenses, "Depreciation", dec!(500));
        store.add(SectionKey::IncomeExpenses, "Interest expense", dec!(300));
        store.add(SectionKey::IncomeExpenses, "Income tax", dec!(900));

        let is = build(&store).income_statement;
        assert_eq!(is.gross_profit, dec!(6000));
        assert_eq!(is.operating_expenses, dec!(2500));
        assert_eq!(is.operating_result, dec!(3500));
        assert_eq!(is.ebitda, dec!(4000));
        assert_eq!(is.pre_tax_result, dec!(3200));
        assert_eq!(is.net_result, dec!(2300));
        assert_eq!(is.net_result, is.total_revenue - is.total_expenses);
    }

    #[test]
    fn test_roles_only_read_from_their_section() {
        let mut store = LineItemStore::new();
        // A revenue line named like a cost role is not a cost
        store.add(SectionKey::IncomeRevenues, "Cost of sales", dec!(100));
        store.add(SectionKey::AssetsNonCurrent, "Inventory", dec!(50));

        let st = build(&store);
        assert_eq!(st.roles.cost_of_sales, Decimal::ZERO);
        assert_eq!(st.roles.inventory, Decimal::ZERO);
    }

    #[test]
    fn test_balance_sheet_does_not_force_identity() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::AssetsCurrent, "Caja", dec!(5000));
        store.add(SectionKey::LiabilitiesCurrent, "Proveedores", dec!(3000));
        store.add(SectionKey::EquityMain, "Capital", dec!(1900));

        let bs = build(&store).balance_sheet;
        assert_eq!(bs.total_assets, dec!(5000));
        assert_eq!(bs.liabilities_plus_equity, dec!(4900));
    }

    #[test]
    fn test_cash_flow_independent_of_income() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::IncomeRevenues, "Ventas", dec!(10000));
        store.add(SectionKey::CashFlowReceipts, "Cobros a clientes", dec!(7000));
        store.add(SectionKey::CashFlowPayments, "Pagos a proveedores", dec!(3000));
        store.add(SectionKey::CashFlowPayroll, "Nómina", dec!(1500));
        store.add(SectionKey::CashFlowFinancial, "Intereses pagados", dec!(200));

        let st = build(&store);
        assert_eq!(st.cash_flow.total_outflows, dec!(4700));
        assert_eq!(st.cash_flow.net_flow, dec!(2300));
        assert_eq!(st.income_statement.net_result, dec!(10000));
    }

    #[test]
    fn test_empty_store_builds_zero_statements() {
        let st = build(&LineItemStore::new());
        assert_eq!(st, Statements::default());
    }
}
