//! Financial ratios with an explicit undefined state.
//!
//! A ratio whose denominator is zero is `None`, never `0` or infinity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statements::{BalanceSheet, IncomeStatement, RoleAmounts};

/// Divide, yielding `None` for a zero denominator (or on overflow)
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratios {
    /// Current assets / current liabilities
    pub current_ratio: Option<Decimal>,
    /// (Current assets - inventory) / current liabilities
    pub quick_ratio: Option<Decimal>,
    /// Total liabilities / total assets
    pub debt_ratio: Option<Decimal>,
    /// Current assets - current liabilities
    pub working_capital: Decimal,
    /// Net result / total equity
    pub return_on_equity: Option<Decimal>,
    /// Net result / total revenue
    pub net_margin: Option<Decimal>,
    /// Total liabilities / total equity
    pub debt_to_equity: Option<Decimal>,
    /// Gross profit / total revenue
    pub gross_margin: Option<Decimal>,
}

impl Ratios {
    pub fn compute(bs: &BalanceSheet, is: &IncomeStatement, roles: &RoleAmounts) -> Self {
        Self {
            current_ratio: ratio(bs.current_assets, bs.current_liabilities),
            quick_ratio: ratio(bs.current_assets - roles.inventory, bs.current_liabilities),
            debt_ratio: ratio(bs.total_liabilities, bs.total_assets),
            working_capital: bs.current_assets - bs.current_liabilities,
            return_on_equity: ratio(is.net_result, bs.total_equity),
            net_margin: ratio(is.net_result, is.total_revenue),
            debt_to_equity: ratio(bs.total_liabilities, bs.total_equity),
            gross_margin: ratio(is.gross_profit, is.total_revenue),
        }
    }

    /// Ratios as ordered `(name, value)` pairs for presentation
    pub fn named(&self) -> Vec<(&'static str, Option<Decimal>)> {
        vec![
            ("current_ratio", self.current_ratio),
            ("quick_ratio", self.quick_ratio),
            ("debt_ratio", self.debt_ratio),
            ("working_capital", Some(self.working_capital)),
            ("return_on_equity", self.return_on_equity),
            ("net_margin", self.net_margin),
            ("debt_to_equity", self.debt_to_equity),
            ("gross_margin", self.gross_margin),
        ]
    }
}
