//! JSON snapshot of a whole session: metadata plus every section
//!
//! ```json
//! {
//!   "version": 1,
//!   "meta": { "companyName": "Acme", "periodLabel": "2024" },
//!   "savedAt": "2024-05-01T10:00:00Z",
//!   "sections": {
//!     "assets": { "current": [ { "id": "…", "name": "Caja", "amount": "1000" } ] }
//!   }
//! }
//! ```
//!
//! Everything except `sections` may be missing and falls back to a default.
//! The document structure is strict, item amounts are not: an amount that
//! cannot be read is imported as zero and reported as flagged.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use statera_config::IoConfig;
use statera_core::{Engine, ErrorCode, ErrorDetails, LineItem, LineItemId, LineItemStore, Metadata, SectionKey};

use crate::amount::{coerce_amount, parse_json_number, Coerced};
use crate::error::{SerResult, SerializationError};

/// Format version written by [`Snapshot::capture`]
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

// ==================== Document ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub sections: SnapshotSections,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSections {
    #[serde(default)]
    pub assets: SplitSections,
    #[serde(default)]
    pub liabilities: SplitSections,
    #[serde(default)]
    pub equity: EquitySections,
    #[serde(default)]
    pub income: IncomeSections,
    #[serde(default)]
    pub cash_flow: CashFlowSections,
}

/// Current / non-current split used by assets and liabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitSections {
    #[serde(default)]
    pub current: Vec<SnapshotItem>,
    #[serde(default)]
    pub non_current: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquitySections {
    #[serde(default)]
    pub main: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeSections {
    #[serde(default)]
    pub revenues: Vec<SnapshotItem>,
    #[serde(default)]
    pub expenses: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSections {
    #[serde(default)]
    pub receipts: Vec<SnapshotItem>,
    #[serde(default)]
    pub payments: Vec<SnapshotItem>,
    #[serde(default)]
    pub payroll: Vec<SnapshotItem>,
    #[serde(default)]
    pub financial: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Written as a decimal string; read leniently, see [`SnapshotItem::amount`]
    #[serde(default)]
    pub amount: Value,
}

impl From<&LineItem> for SnapshotItem {
    fn from(item: &LineItem) -> Self {
        Self {
            id: Some(item.id.to_string()),
            name: item.name.clone(),
            amount: Value::String(item.amount.to_string()),
        }
    }
}

impl SnapshotItem {
    /// The amount as a decimal.
    ///
    /// Strings go through the same lenient parser as CSV cells, numbers are
    /// read exactly and a missing or `null` amount is zero. Anything else is
    /// malformed.
    pub fn amount(&self) -> Coerced {
        match &self.amount {
            Value::Null => Coerced {
                value: Decimal::ZERO,
                malformed: false,
            },
            Value::String(text) => coerce_amount(text),
            Value::Number(n) => Coerced::from(parse_json_number(&n.to_string())),
            _ => Coerced::from(None),
        }
    }
}

// ==================== Import Report ====================

/// An item imported with its unreadable amount replaced by zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedItem {
    pub section: SectionKey,
    pub name: String,
    /// The amount as it appeared in the document
    pub raw: String,
}

impl FlaggedItem {
    pub fn to_details(&self) -> ErrorDetails {
        ErrorDetails::new(
            ErrorCode::MalformedAmount,
            format!("Malformed amount {} for {:?} in {}", self.raw, self.name, self.section),
        )
        .with_suggestion("Amounts are decimal strings or numbers up to 10^15".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotImport {
    /// Items added to the store, flagged ones included
    pub imported: usize,
    pub flagged: Vec<FlaggedItem>,
}

impl SnapshotSections {
    /// Items stored under a section
    pub fn section(&self, key: SectionKey) -> &[SnapshotItem] {
        match key {
            SectionKey::AssetsCurrent => &self.assets.current,
            SectionKey::AssetsNonCurrent => &self.assets.non_current,
            SectionKey::LiabilitiesCurrent => &self.liabilities.current,
            SectionKey::LiabilitiesNonCurrent => &self.liabilities.non_current,
            SectionKey::EquityMain => &self.equity.main,
            SectionKey::IncomeRevenues => &self.income.revenues,
            SectionKey::IncomeExpenses => &self.income.expenses,
            SectionKey::CashFlowReceipts => &self.cash_flow.receipts,
            SectionKey::CashFlowPayments => &self.cash_flow.payments,
            SectionKey::CashFlowPayroll => &self.cash_flow.payroll,
            SectionKey::CashFlowFinancial => &self.cash_flow.financial,
        }
    }

    fn section_mut(&mut self, key: SectionKey) -> &mut Vec<SnapshotItem> {
        match key {
            SectionKey::AssetsCurrent => &mut self.assets.current,
            SectionKey::AssetsNonCurrent => &mut self.assets.non_current,
            SectionKey::LiabilitiesCurrent => &mut self.liabilities.current,
            SectionKey::LiabilitiesNonCurrent => &mut self.liabilities.non_current,
            SectionKey::EquityMain => &mut self.equity.main,
            SectionKey::IncomeRevenues => &mut self.income.revenues,
            SectionKey::IncomeExpenses => &mut self.income.expenses,
            SectionKey::CashFlowReceipts => &mut self.cash_flow.receipts,
            SectionKey::CashFlowPayments => &mut self.cash_flow.payments,
            SectionKey::CashFlowPayroll => &mut self.cash_flow.payroll,
            SectionKey::CashFlowFinancial => &mut self.cash_flow.financial,
        }
    }

    /// Item count across all sections
    pub fn len(&self) -> usize {
        SectionKey::ALL.iter().map(|key| self.section(*key).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==================== Import Options ====================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Assign fresh ids to every imported item
    pub regenerate_ids: bool,
}

impl ImportOptions {
    pub fn from_config(config: &IoConfig) -> Self {
        Self {
            regenerate_ids: config.regenerate_ids_on_import,
        }
    }
}

// ==================== Conversion ====================

impl Snapshot {
    /// Snapshot of a store and its metadata, without a timestamp
    pub fn from_store(store: &LineItemStore, meta: &Metadata) -> Self {
        let mut sections = SnapshotSections::default();
        for (key, item) in store.iter() {
            sections.section_mut(key).push(SnapshotItem::from(item));
        }
        Self {
            version: SNAPSHOT_VERSION,
            meta: meta.clone(),
            saved_at: None,
            sections,
        }
    }

    /// Snapshot of the engine's current state, stamped with the current time
    pub fn capture(engine: &Engine) -> Self {
        let mut snapshot = Self::from_store(engine.store(), engine.metadata());
        snapshot.saved_at = Some(Utc::now());
        snapshot
    }

    /// Parse a snapshot document; any structural problem aborts the import
    pub fn parse(text: &str) -> SerResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(text)
            .map_err(|e| SerializationError::SnapshotSchemaMismatch { message: e.to_string() })?;
        if snapshot.version > SNAPSHOT_VERSION {
            log::warn!(
                "snapshot version {} is newer than supported version {}, unknown fields ignored",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> SerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Items whose amount cannot be read
    pub fn flagged(&self) -> Vec<FlaggedItem> {
        let mut flagged = Vec::new();
        for key in SectionKey::ALL {
            for item in self.sections.section(key) {
                if item.amount().malformed {
                    flagged.push(FlaggedItem {
                        section: key,
                        name: item.name.clone(),
                        raw: item.amount.to_string(),
                    });
                }
            }
        }
        flagged
    }

    /// Rebuild a store from the snapshot.
    ///
    /// Missing ids are generated; ids that repeat an earlier item are
    /// regenerated by the store. Unreadable amounts become zero.
    pub fn to_store(&self, options: ImportOptions) -> LineItemStore {
        let mut store = LineItemStore::new();
        for key in SectionKey::ALL {
            for item in self.sections.section(key) {
                let amount = item.amount();
                if amount.malformed {
                    log::warn!("malformed amount {} for {:?} in {}, using 0", item.amount, item.name, key);
                }
                let line = match (&item.id, options.regenerate_ids) {
                    (Some(id), false) if !id.trim().is_empty() => {
                        LineItem::with_id(LineItemId::from(id.as_str()), item.name.clone(), amount.value)
                    }
                    _ => LineItem::new(item.name.clone(), amount.value),
                };
                store.push_item(key, line);
            }
        }
        store
    }

    /// Replace the engine's store and metadata with this snapshot
    pub fn apply(&self, engine: &mut Engine, options: ImportOptions) -> SnapshotImport {
        let store = self.to_store(options);
        let report = SnapshotImport {
            imported: store.len(),
            flagged: self.flagged(),
        };
        engine.replace_store(store);
        engine.set_metadata(self.meta.clone());
        report
    }
}

// ==================== Entry Points ====================

/// Serialize the engine's state as a pretty-printed JSON snapshot
pub fn export_snapshot(engine: &Engine) -> SerResult<String> {
    let snapshot = Snapshot::capture(engine);
    log::info!("exporting snapshot with {} line items", snapshot.sections.len());
    snapshot.to_json()
}

/// Load a JSON snapshot into the engine, replacing its contents.
///
/// On error the engine is left untouched.
pub fn import_snapshot(engine: &mut Engine, text: &str, options: ImportOptions) -> SerResult<SnapshotImport> {
    let snapshot = Snapshot::parse(text)?;
    log::info!("importing snapshot with {} line items", snapshot.sections.len());
    Ok(snapshot.apply(engine, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_engine() -> Engine {
        let mut engine = Engine::default();
        engine.add_line_item(SectionKey::AssetsCurrent, Some("Caja"), Some(dec!(1000)));
        engine.add_line_item(SectionKey::AssetsCurrent, Some("Bancos"), Some(dec!(2000.55)));
        engine.add_line_item(SectionKey::LiabilitiesNonCurrent, Some("Préstamo"), Some(dec!(-300)));
        engine.add_line_item(SectionKey::CashFlowPayroll, Some("Nómina"), Some(dec!(450)));
        engine.set_metadata(Metadata {
            company_name: "Acme, S.A.".to_string(),
            period_label: "FY 2024".to_string(),
            logo_reference: Some("logo.png".to_string()),
        });
        engine
    }

    #[test]
    fn test_round_trip_keeps_ids_and_order() {
        let source = sample_engine();
        let json = export_snapshot(&source).unwrap();

        let mut target = Engine::default();
        import_snapshot(&mut target, &json, ImportOptions::default()).unwrap();
        assert_eq!(target.store(), source.store());
        assert_eq!(target.metadata(), source.metadata());
    }

    #[test]
    fn test_regenerate_ids() {
        let source = sample_engine();
        let json = export_snapshot(&source).unwrap();

        let mut target = Engine::default();
        import_snapshot(&mut target, &json, ImportOptions { regenerate_ids: true }).unwrap();
        let before = source.list_section(SectionKey::AssetsCurrent);
        let after = target.list_section(SectionKey::AssetsCurrent);
        assert_eq!(before.len(), after.len());
        assert_ne!(before[0].id, after[0].id);
        assert_eq!(before[0].name, after[0].name);
        assert_eq!(before[1].amount, after[1].amount);
    }

    #[test]
    fn test_amounts_written_as_strings() {
        let json = export_snapshot(&sample_engine()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let amount = &value["sections"]["assets"]["current"][1]["amount"];
        assert_eq!(amount.as_str(), Some("2000.55"));
        assert!(value["savedAt"].is_string());
        assert_eq!(value["meta"]["companyName"], "Acme, S.A.");
    }

    #[test]
    fn test_minimal_document_defaults() {
        let json = r#"{
            "sections": {
                "assets": { "current": [ { "name": "Caja", "amount": 1000 } ] },
                "equity": { "main": [ { "id": "cap", "name": "Capital", "amount": "1000" } ] }
            }
        }"#;
        let snapshot = Snapshot::parse(json).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.meta, Metadata::default());
        assert!(snapshot.sections.cash_flow.receipts.is_empty());

        let store = snapshot.to_store(ImportOptions::default());
        assert_eq!(store.len(), 2);
        assert_eq!(store.section(SectionKey::AssetsCurrent)[0].amount, dec!(1000));
        assert_eq!(store.section(SectionKey::EquityMain)[0].id, LineItemId::from("cap"));
    }

    #[test]
    fn test_missing_sections_is_schema_mismatch() {
        let mut engine = sample_engine();
        let before = engine.store().clone();

        let err = import_snapshot(&mut engine, r#"{ "version": 1 }"#, ImportOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SnapshotSchemaMismatch);
        assert_eq!(engine.store(), &before);

        let err = Snapshot::parse("not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::SnapshotSchemaMismatch);
    }

    #[test]
    fn test_unreadable_amounts_flagged_not_fatal() {
        let json = r#"{
            "sections": {
                "assets": { "current": [
                    { "name": "Caja", "amount": "n/a" },
                    { "name": "Bancos", "amount": "$ 1.234,50" },
                    { "name": "Sin monto" }
                ] },
                "equity": { "main": [
                    { "name": "Capital", "amount": true },
                    { "name": "Reservas", "amount": 1e20 },
                    { "name": "Utilidades", "amount": 1.5e3 }
                ] }
            }
        }"#;
        let mut engine = sample_engine();
        let report = import_snapshot(&mut engine, json, ImportOptions::default()).unwrap();

        assert_eq!(report.imported, 6);
        let names: Vec<_> = report.flagged.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Caja", "Capital", "Reservas"]);
        assert_eq!(report.flagged[0].section, SectionKey::AssetsCurrent);
        assert_eq!(report.flagged[0].raw, "\"n/a\"");
        assert_eq!(report.flagged[0].to_details().code, ErrorCode::MalformedAmount);

        let assets = engine.list_section(SectionKey::AssetsCurrent);
        assert_eq!(assets[0].amount, Decimal::ZERO);
        assert_eq!(assets[1].amount, dec!(1234.50));
        assert_eq!(assets[2].amount, Decimal::ZERO);
        let equity = engine.list_section(SectionKey::EquityMain);
        assert_eq!(equity[0].amount, Decimal::ZERO);
        assert_eq!(equity[1].amount, Decimal::ZERO);
        assert_eq!(equity[2].amount, dec!(1500));
    }

    #[test]
    fn test_duplicate_ids_are_regenerated() {
        let json = r#"{
            "sections": {
                "assets": { "current": [ { "id": "a", "name": "Caja", "amount": "1" } ] },
                "liabilities": { "current": [ { "id": "a", "name": "Proveedores", "amount": "2" } ] }
            }
        }"#;
        let store = Snapshot::parse(json).unwrap().to_store(ImportOptions::default());
        let first = &store.section(SectionKey::AssetsCurrent)[0];
        let second = &store.section(SectionKey::LiabilitiesCurrent)[0];
        assert_eq!(first.id, LineItemId::from("a"));
        assert_ne!(second.id, first.id);
    }

    #[test]
    fn test_import_marks_previous_result_stale() {
        let mut engine = sample_engine();
        engine.recompute();
        let json = export_snapshot(&engine).unwrap();
        import_snapshot(&mut engine, &json, ImportOptions::default()).unwrap();
        assert!(engine.is_stale());
    }
}
