//! Core data models for the line item store

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque line item identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Generate a fresh, unique identifier
    pub fn generate() -> Self {
        LineItemId(statera_utils::generate_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineItemId {
    fn from(value: String) -> Self {
        LineItemId(value)
    }
}

impl From<&str> for LineItemId {
    fn from(value: &str) -> Self {
        LineItemId(value.to_string())
    }
}

impl std::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Largest magnitude a line item amount may hold (10^15).
///
/// The store clamps amounts into `[-MAX_AMOUNT, MAX_AMOUNT]`, which keeps
/// every total and difference the statements take inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Clamp an amount into `[-MAX_AMOUNT, MAX_AMOUNT]`
pub fn clamp_amount(amount: Decimal) -> Decimal {
    amount.clamp(-MAX_AMOUNT, MAX_AMOUNT)
}

/// A single named monetary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier within the store
    pub id: LineItemId,
    /// Display label; also drives role recognition
    pub name: String,
    /// Signed amount (negative for contra-accounts and refunds)
    pub amount: Decimal,
}

impl LineItem {
    /// Create a line item with a freshly generated id
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: LineItemId::generate(),
            name: name.into(),
            amount,
        }
    }

    /// Create a line item keeping a known id
    pub fn with_id(id: LineItemId, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            amount,
        }
    }
}

/// Partial update for a line item; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl LineItemPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            amount: None,
        }
    }

    pub fn amount(amount: Decimal) -> Self {
        Self {
            name: None,
            amount: Some(amount),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none()
    }

    /// Apply the patch, returning whether any field changed
    pub fn apply(&self, item: &mut LineItem) -> bool {
        let mut changed = false;
        if let Some(ref name) = self.name {
            if item.name != *name {
                item.name = name.clone();
                changed = true;
            }
        }
        if let Some(amount) = self.amount {
            if item.amount != amount {
                item.amount = amount;
                changed = true;
            }
        }
        changed
    }
}

/// Descriptive information about the reporting entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Company name
    #[serde(default)]
    pub company_name: String,
    /// Period label (e.g., "FY 2024")
    #[serde(default)]
    pub period_label: String,
    /// Opaque handle to a logo resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_item_new_generates_id() {
        let a = LineItem::new("Caja", dec!(1000));
        let b = LineItem::new("Caja", dec!(1000));
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Caja");
    }

    #[test]
    fn test_patch_apply() {
        let mut item = LineItem::with_id("a1".into(), "Bancos", dec!(10));

        assert!(!LineItemPatch::default().apply(&mut item));
        assert!(!LineItemPatch::amount(dec!(10.00)).apply(&mut item));

        let patch = LineItemPatch::name("Banco principal").with_amount(dec!(-5.5));
        assert!(patch.apply(&mut item));
        assert_eq!(item.name, "Banco principal");
        assert_eq!(item.amount, dec!(-5.5));
        assert_eq!(item.id.as_str(), "a1");
    }

    #[test]
    fn test_metadata_serde_camel_case() {
        let meta = Metadata {
            company_name: "Agronare".to_string(),
            period_label: "2024".to_string(),
            logo_reference: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["companyName"], "Agronare");
        assert!(json.get("logoReference").is_none());

        let back: Metadata = serde_json::from_str(r#"{"companyName":"X"}"#).unwrap();
        assert_eq!(back.period_label, "");
    }
}
