//! Error types for statera-io

use statera_core::{CoreError, ErrorCode, ErrorDetails, ErrorSeverity};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("Snapshot schema mismatch: {message}")]
    SnapshotSchemaMismatch { message: String },

    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Invalid template name: {name:?}")]
    InvalidTemplateName { name: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SerializationError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            SerializationError::SnapshotSchemaMismatch { .. } => ErrorCode::SnapshotSchemaMismatch,
            SerializationError::MissingColumns { .. } => ErrorCode::MissingColumns,
            SerializationError::InvalidTemplateName { .. } => ErrorCode::InvalidTemplateName,
            SerializationError::Csv(_) | SerializationError::Json(_) => ErrorCode::InvalidFormat,
            SerializationError::Io(_) => ErrorCode::IoError,
            SerializationError::Core(e) => e.code(),
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SerializationError::Core(e) => e.severity(),
            _ => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        if let SerializationError::Core(e) = self {
            return e.to_details();
        }

        let details = ErrorDetails::new(self.code(), self.to_string());
        match self {
            SerializationError::SnapshotSchemaMismatch { .. } => details.with_suggestion(
                "A snapshot needs a top-level \"sections\" object; nothing was imported.".to_string(),
            ),
            SerializationError::MissingColumns { columns } => details
                .with_detail(serde_json::json!({ "columns": columns }))
                .with_suggestion(
                    "Add a header row with name, amount, group and subgroup columns.".to_string(),
                ),
            SerializationError::InvalidTemplateName { .. } => details.with_suggestion(
                "Template names need at least one letter or digit.".to_string(),
            ),
            SerializationError::Csv(e) => match e.position() {
                Some(pos) => details.with_line(pos.line()),
                None => details,
            },
            _ => details,
        }
    }
}

/// Result type with SerializationError
pub type SerResult<T> = Result<T, SerializationError>;
