//! Serialization for statera sessions
//!
//! JSON snapshots, CSV line-item tables and a library of named templates.

pub mod amount;
pub mod error;
pub mod snapshot;
pub mod tabular;
pub mod templates;

pub use amount::{coerce_amount, parse_amount, parse_json_number, Coerced};
pub use error::{SerResult, SerializationError};
pub use snapshot::{
    export_snapshot, import_snapshot, FlaggedItem, ImportOptions, Snapshot, SnapshotImport, SnapshotItem,
    SnapshotSections, SNAPSHOT_VERSION,
};
pub use tabular::{
    export_tabular, export_tabular_string, import_tabular, import_tabular_str, ImportMode, RowIssue,
    TabularImport, TabularOptions,
};
pub use templates::{slug, DirTemplateStore, MemoryTemplateStore, TemplateInfo, TemplateStore};
