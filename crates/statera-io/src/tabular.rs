//! CSV import/export with one row per line item
//!
//! Columns: `name, amount, group, subgroup`. Headers are matched without
//! regard to case, common Spanish and English aliases are accepted and
//! extra columns are ignored. Names are kept verbatim; the other fields
//! are trimmed.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use statera_config::IoConfig;
use statera_core::{Engine, ErrorCode, ErrorDetails, LineItem, SectionKey};
use std::io::{self, Read, Write};

use crate::amount::coerce_amount;
use crate::error::{SerResult, SerializationError};

const NAME_ALIASES: &[&str] = &["name", "nombre", "concept", "concepto", "item", "label"];
const AMOUNT_ALIASES: &[&str] = &["amount", "monto", "value", "valor", "importe"];
const GROUP_ALIASES: &[&str] = &["group", "grupo", "section", "seccion", "sección"];
const SUBGROUP_ALIASES: &[&str] = &["subgroup", "subgrupo", "subsection", "subseccion", "subsección"];

/// Header written on export
pub const HEADER: [&str; 4] = ["name", "amount", "group", "subgroup"];

// ==================== Options ====================

/// What happens to existing line items on import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Clear the store first
    #[default]
    Replace,
    /// Keep existing items and add the imported ones after them
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabularOptions {
    pub delimiter: u8,
    pub mode: ImportMode,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            mode: ImportMode::Replace,
        }
    }
}

impl TabularOptions {
    pub fn from_config(config: &IoConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }
}

// ==================== Import Report ====================

/// A row that was rejected or imported with a warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based line in the source document
    pub line: u64,
    pub code: ErrorCode,
    pub message: String,
}

impl RowIssue {
    pub fn to_details(&self) -> ErrorDetails {
        ErrorDetails::new(self.code, self.message.clone()).with_line(self.line)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularImport {
    /// Rows added to the store, flagged ones included
    pub imported: usize,
    /// Rows skipped because their section is unknown
    pub rejected: Vec<RowIssue>,
    /// Rows imported with a malformed amount coerced to zero, or with
    /// invalid UTF-8 replaced
    pub flagged: Vec<RowIssue>,
}

// ==================== Header ====================

struct Columns {
    name: usize,
    amount: usize,
    group: usize,
    subgroup: usize,
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
}

impl Columns {
    fn resolve(headers: &StringRecord) -> SerResult<Self> {
        let name = find_column(headers, NAME_ALIASES);
        let amount = find_column(headers, AMOUNT_ALIASES);
        let group = find_column(headers, GROUP_ALIASES);
        let subgroup = find_column(headers, SUBGROUP_ALIASES);

        match (name, amount, group, subgroup) {
            (Some(name), Some(amount), Some(group), Some(subgroup)) => Ok(Self {
                name,
                amount,
                group,
                subgroup,
            }),
            _ => {
                let columns = [name, amount, group, subgroup]
                    .iter()
                    .zip(HEADER)
                    .filter(|(found, _)| found.is_none())
                    .map(|(_, column)| column.to_string())
                    .collect();
                Err(SerializationError::MissingColumns { columns })
            }
        }
    }
}

// ==================== Import ====================

/// Read line items from CSV into the engine.
///
/// Rows with an unknown group/subgroup are skipped and reported; rows with
/// an unreadable amount are imported as zero and flagged, as are rows whose
/// bytes are not valid UTF-8. A missing header column or a broken CSV
/// document aborts without touching the engine.
pub fn import_tabular<R: Read>(
    engine: &mut Engine,
    reader: R,
    options: TabularOptions,
) -> SerResult<TabularImport> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: StringRecord = rdr.byte_headers()?.iter().map(String::from_utf8_lossy).collect();
    let columns = Columns::resolve(&headers)?;
    let mut report = TabularImport::default();
    let mut rows = Vec::new();

    for result in rdr.byte_records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let raw = |i: usize| record.get(i).unwrap_or(b"");

        let invalid_utf8 = [columns.name, columns.amount, columns.group, columns.subgroup]
            .iter()
            .any(|&i| std::str::from_utf8(raw(i)).is_err());
        let name = String::from_utf8_lossy(raw(columns.name));
        let amount = String::from_utf8_lossy(raw(columns.amount));
        let group = String::from_utf8_lossy(raw(columns.group));
        let subgroup = String::from_utf8_lossy(raw(columns.subgroup));
        let (amount, group, subgroup) = (amount.trim(), group.trim(), subgroup.trim());

        if name.trim().is_empty() && [amount, group, subgroup].iter().all(|f| f.is_empty()) {
            continue;
        }

        let section = match SectionKey::parse(group, subgroup) {
            Ok(section) => section,
            Err(e) => {
                log::warn!("line {}: {}, row skipped", line, e);
                report.rejected.push(RowIssue {
                    line,
                    code: e.code(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        if invalid_utf8 {
            log::warn!("line {}: invalid UTF-8 in {:?}, replaced", line, name);
            report.flagged.push(RowIssue {
                line,
                code: ErrorCode::InvalidFormat,
                message: "Invalid UTF-8 replaced with U+FFFD".to_string(),
            });
        }

        let coerced = coerce_amount(amount);
        if coerced.malformed {
            log::warn!("line {}: malformed amount {:?} for {:?}, using 0", line, amount, name);
            report.flagged.push(RowIssue {
                line,
                code: ErrorCode::MalformedAmount,
                message: format!("Malformed amount {:?}", amount),
            });
        }

        rows.push((section, LineItem::new(name, coerced.value)));
    }

    if options.mode == ImportMode::Replace {
        engine.clear();
    }
    report.imported = rows.len();
    let store = engine.store_mut();
    for (section, item) in rows {
        store.push_item(section, item);
    }

    log::info!(
        "imported {} rows ({} rejected, {} flagged)",
        report.imported,
        report.rejected.len(),
        report.flagged.len()
    );
    Ok(report)
}

/// [`import_tabular`] over an in-memory string
pub fn import_tabular_str(engine: &mut Engine, text: &str, options: TabularOptions) -> SerResult<TabularImport> {
    import_tabular(engine, text.as_bytes(), options)
}

// ==================== Export ====================

/// Write every line item as a CSV row, every field quoted
pub fn export_tabular<W: Write>(engine: &Engine, writer: W, delimiter: u8) -> SerResult<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    let mut rows = 0usize;
    for (section, item) in engine.store().iter() {
        let amount = item.amount.to_string();
        let group = section.group().to_string();
        let subgroup = section.subgroup().to_string();
        wtr.write_record([item.name.as_str(), amount.as_str(), group.as_str(), subgroup.as_str()])?;
        rows += 1;
    }
    wtr.flush()?;

    log::info!("exported {} rows", rows);
    Ok(())
}

/// [`export_tabular`] into a string
pub fn export_tabular_string(engine: &Engine, delimiter: u8) -> SerResult<String> {
    let mut buf = Vec::new();
    export_tabular(engine, &mut buf, delimiter)?;
    String::from_utf8(buf).map_err(|e| SerializationError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
