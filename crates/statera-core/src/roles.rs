//! Name-to-role lookup table.
//!
//! Some line items carry a semantic role that the statements need (cost of
//! sales, depreciation, interest, tax, inventory). Roles are recognized by
//! a case-insensitive exact match of the trimmed item name against a fixed
//! vocabulary, optionally extended from configuration. This is a naming
//! convention, not a field on the item: renaming "Costo de ventas" to
//! "Costo" drops it from the cost-of-sales role.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statera_config::RolesConfig;
use std::collections::HashMap;

use crate::models::LineItem;
use crate::types::SectionKey;

/// Semantic role a line item can play in the statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Direct cost of the goods or services sold
    CostOfSales,
    /// Depreciation and amortization charges
    Depreciation,
    /// Interest and other financing costs
    FinancialExpense,
    /// Income tax for the period
    TaxExpense,
    /// Stock on hand, excluded by the quick ratio
    Inventory,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::CostOfSales,
        Role::Depreciation,
        Role::FinancialExpense,
        Role::TaxExpense,
        Role::Inventory,
    ];

    /// The only section whose items may carry this role
    pub fn section(self) -> SectionKey {
        match self {
            Role::Inventory => SectionKey::AssetsCurrent,
            _ => SectionKey::IncomeExpenses,
        }
    }

    fn builtin_names(self) -> &'static [&'static str] {
        match self {
            Role::CostOfSales => &[
                "cost of sales",
                "cost of goods sold",
                "cogs",
                "costo de ventas",
                "costodeventas",
                "costo de venta",
                "costo de lo vendido",
            ],
            Role::Depreciation => &[
                "depreciation",
                "amortization",
                "depreciation and amortization",
                "depreciación",
                "depreciacion",
                "amortización",
                "amortizacion",
                "depreciación y amortización",
            ],
            Role::FinancialExpense => &[
                "interest",
                "interest expense",
                "financial expense",
                "financial expenses",
                "intereses",
                "gasto financiero",
                "gastos financieros",
            ],
            Role::TaxExpense => &[
                "income tax",
                "income taxes",
                "tax expense",
                "isr",
                "impuesto sobre la renta",
                "impuestos",
            ],
            Role::Inventory => &["inventory", "inventories", "inventario", "inventarios"],
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cost_of_sales" => Ok(Role::CostOfSales),
            "depreciation" => Ok(Role::Depreciation),
            "financial_expense" => Ok(Role::FinancialExpense),
            "tax_expense" => Ok(Role::TaxExpense),
            "inventory" => Ok(Role::Inventory),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::CostOfSales => write!(f, "cost_of_sales"),
            Role::Depreciation => write!(f, "depreciation"),
            Role::FinancialExpense => write!(f, "financial_expense"),
            Role::TaxExpense => write!(f, "tax_expense"),
            Role::Inventory => write!(f, "inventory"),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lookup from normalized item name to role
#[derive(Debug, Clone)]
pub struct RoleTable {
    names: HashMap<String, Role>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleTable {
    /// Table with only the built-in English/Spanish vocabulary
    pub fn builtin() -> Self {
        let mut names = HashMap::new();
        for role in Role::ALL {
            for name in role.builtin_names() {
                names.insert(normalize(name), role);
            }
        }
        Self { names }
    }

    /// Built-in vocabulary extended with configured aliases
    pub fn from_config(config: &RolesConfig) -> Self {
        let mut table = Self::builtin();
        for (key, aliases) in config.entries() {
            // Keys come from fixed config fields, so parsing cannot fail
            if let Ok(role) = key.parse::<Role>() {
                for alias in aliases {
                    table.add_alias(role, alias);
                }
            }
        }
        table
    }

    /// Register an extra name for a role; a name maps to one role only
    pub fn add_alias(&mut self, role: Role, alias: &str) {
        let key = normalize(alias);
        if key.is_empty() {
            return;
        }
        if let Some(previous) = self.names.insert(key.clone(), role) {
            if previous != role {
                log::warn!("role alias '{}' moved from {} to {}", key, previous, role);
            }
        }
    }

    pub fn with_alias(mut self, role: Role, alias: &str) -> Self {
        self.add_alias(role, alias);
        self
    }

    /// Role recognized for a line item name, if any
    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.names.get(&normalize(name)).copied()
    }

    /// Every name that maps to a role, sorted
    pub fn names_for(&self, role: Role) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .names
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Sum the amounts of all items in `items` matching `role`; 0 when none match
    pub fn sum_role(&self, role: Role, items: &[LineItem]) -> Decimal {
        items
            .iter()
            .filter(|item| self.role_of(&item.name) == Some(role))
            .map(|item| item.amount)
            .sum()
    }
}
