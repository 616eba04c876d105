//! Chart-of-accounts taxonomy: groups, subgroups and the sections they form

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Top-level account group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Group {
    /// Resources controlled by the company
    Assets,
    /// Obligations to third parties
    Liabilities,
    /// Owners' claims
    Equity,
    /// Revenues and expenses of the period
    Income,
    /// Cash movements, independent of accrual income
    CashFlow,
}

impl Group {
    pub const ALL: [Group; 5] = [
        Group::Assets,
        Group::Liabilities,
        Group::Equity,
        Group::Income,
        Group::CashFlow,
    ];
}

impl std::str::FromStr for Group {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assets" | "asset" => Ok(Group::Assets),
            "liabilities" | "liability" => Ok(Group::Liabilities),
            "equity" => Ok(Group::Equity),
            "income" => Ok(Group::Income),
            "cashflow" | "cash_flow" | "cash-flow" => Ok(Group::CashFlow),
            _ => Err(format!("Invalid group: {}", s)),
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Assets => write!(f, "assets"),
            Group::Liabilities => write!(f, "liabilities"),
            Group::Equity => write!(f, "equity"),
            Group::Income => write!(f, "income"),
            Group::CashFlow => write!(f, "cashFlow"),
        }
    }
}

/// Second level of the taxonomy; only some combinations with [`Group`] exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Subgroup {
    Current,
    NonCurrent,
    Main,
    Revenues,
    Expenses,
    Receipts,
    Payments,
    Payroll,
    Financial,
}

impl std::str::FromStr for Subgroup {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" => Ok(Subgroup::Current),
            "noncurrent" | "non_current" | "non-current" => Ok(Subgroup::NonCurrent),
            "main" => Ok(Subgroup::Main),
            "revenues" | "revenue" => Ok(Subgroup::Revenues),
            "expenses" | "expense" => Ok(Subgroup::Expenses),
            "receipts" => Ok(Subgroup::Receipts),
            "payments" => Ok(Subgroup::Payments),
            "payroll" => Ok(Subgroup::Payroll),
            "financial" => Ok(Subgroup::Financial),
            _ => Err(format!("Invalid subgroup: {}", s)),
        }
    }
}

impl std::fmt::Display for Subgroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subgroup::Current => write!(f, "current"),
            Subgroup::NonCurrent => write!(f, "nonCurrent"),
            Subgroup::Main => write!(f, "main"),
            Subgroup::Revenues => write!(f, "revenues"),
            Subgroup::Expenses => write!(f, "expenses"),
            Subgroup::Receipts => write!(f, "receipts"),
            Subgroup::Payments => write!(f, "payments"),
            Subgroup::Payroll => write!(f, "payroll"),
            Subgroup::Financial => write!(f, "financial"),
        }
    }
}

/// A valid `(group, subgroup)` pair.
///
/// Pairs outside the taxonomy cannot be represented; text input goes
/// through [`SectionKey::parse`], which rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKey {
    AssetsCurrent,
    AssetsNonCurrent,
    LiabilitiesCurrent,
    LiabilitiesNonCurrent,
    EquityMain,
    IncomeRevenues,
    IncomeExpenses,
    CashFlowReceipts,
    CashFlowPayments,
    CashFlowPayroll,
    CashFlowFinancial,
}

impl SectionKey {
    /// Number of sections in the taxonomy
    pub const COUNT: usize = 11;

    /// Every section, in canonical order
    pub const ALL: [SectionKey; SectionKey::COUNT] = [
        SectionKey::AssetsCurrent,
        SectionKey::AssetsNonCurrent,
        SectionKey::LiabilitiesCurrent,
        SectionKey::LiabilitiesNonCurrent,
        SectionKey::EquityMain,
        SectionKey::IncomeRevenues,
        SectionKey::IncomeExpenses,
        SectionKey::CashFlowReceipts,
        SectionKey::CashFlowPayments,
        SectionKey::CashFlowPayroll,
        SectionKey::CashFlowFinancial,
    ];

    /// Position in [`SectionKey::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn group(self) -> Group {
        match self {
            SectionKey::AssetsCurrent | SectionKey::AssetsNonCurrent => Group::Assets,
            SectionKey::LiabilitiesCurrent | SectionKey::LiabilitiesNonCurrent => Group::Liabilities,
            SectionKey::EquityMain => Group::Equity,
            SectionKey::IncomeRevenues | SectionKey::IncomeExpenses => Group::Income,
            SectionKey::CashFlowReceipts
            | SectionKey::CashFlowPayments
            | SectionKey::CashFlowPayroll
            | SectionKey::CashFlowFinancial => Group::CashFlow,
        }
    }

    pub fn subgroup(self) -> Subgroup {
        match self {
            SectionKey::AssetsCurrent | SectionKey::LiabilitiesCurrent => Subgroup::Current,
            SectionKey::AssetsNonCurrent | SectionKey::LiabilitiesNonCurrent => Subgroup::NonCurrent,
            SectionKey::EquityMain => Subgroup::Main,
            SectionKey::IncomeRevenues => Subgroup::Revenues,
            SectionKey::IncomeExpenses => Subgroup::Expenses,
            SectionKey::CashFlowReceipts => Subgroup::Receipts,
            SectionKey::CashFlowPayments => Subgroup::Payments,
            SectionKey::CashFlowPayroll => Subgroup::Payroll,
            SectionKey::CashFlowFinancial => Subgroup::Financial,
        }
    }

    /// Combine a group and subgroup, if the pair is part of the taxonomy
    pub fn from_parts(group: Group, subgroup: Subgroup) -> Option<Self> {
        SectionKey::ALL
            .iter()
            .copied()
            .find(|k| k.group() == group && k.subgroup() == subgroup)
    }

    /// Sections belonging to a group, in canonical order
    pub fn in_group(group: Group) -> impl Iterator<Item = SectionKey> {
        SectionKey::ALL.into_iter().filter(move |k| k.group() == group)
    }

    /// Parse a textual `(group, subgroup)` pair
    pub fn parse(group: &str, subgroup: &str) -> Result<Self, CoreError> {
        let unknown = || CoreError::UnknownSectionPair {
            group: group.to_string(),
            subgroup: subgroup.to_string(),
        };
        let g: Group = group.parse().map_err(|_| unknown())?;
        let s: Subgroup = subgroup.parse().map_err(|_| unknown())?;
        SectionKey::from_parts(g, s).ok_or_else(unknown)
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group(), self.subgroup())
    }
}
