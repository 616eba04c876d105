//! Accounting identity check: Assets = Liabilities + Equity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest absolute imbalance still reported as balanced (0.01)
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Which side of the identity is larger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Balanced,
    /// Assets exceed liabilities plus equity
    AssetsExceed,
    /// Liabilities plus equity exceed assets
    ClaimsExceed,
}

/// Outcome of the identity check. Imbalance is data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consistency {
    pub balanced: bool,
    /// `total_assets - liabilities_plus_equity`, always reported
    pub imbalance: Decimal,
}

impl Consistency {
    pub fn check(total_assets: Decimal, liabilities_plus_equity: Decimal) -> Self {
        let imbalance = total_assets - liabilities_plus_equity;
        Self {
            balanced: imbalance.abs() <= BALANCE_TOLERANCE,
            imbalance,
        }
    }

    pub fn direction(&self) -> Direction {
        direction_of(self.balanced, self.imbalance)
    }
}

pub(crate) fn direction_of(balanced: bool, imbalance: Decimal) -> Direction {
    if balanced {
        Direction::Balanced
    } else if imbalance.is_sign_positive() {
        Direction::AssetsExceed
    } else {
        Direction::ClaimsExceed
    }
}
