//! Error types for statera-core
//!
//! Error codes and details are shared with the serialization crate so that
//! every recoverable condition reaching a caller speaks one vocabulary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// `(group, subgroup)` outside the taxonomy
    UnknownSectionPair,
    /// Amount text that is not a number
    MalformedAmount,
    /// Snapshot missing required structure
    SnapshotSchemaMismatch,
    /// Tabular header lacks a required column
    MissingColumns,
    /// Template name cannot be stored
    InvalidTemplateName,
    /// Invalid data format
    InvalidFormat,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::UnknownSectionPair => write!(f, "UNKNOWN_SECTION_PAIR"),
            ErrorCode::MalformedAmount => write!(f, "MALFORMED_AMOUNT"),
            ErrorCode::SnapshotSchemaMismatch => write!(f, "SNAPSHOT_SCHEMA_MISMATCH"),
            ErrorCode::MissingColumns => write!(f, "MISSING_COLUMNS"),
            ErrorCode::InvalidTemplateName => write!(f, "INVALID_TEMPLATE_NAME"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Recorded and carried on; the caller sees it in a result list
    Warning,
    /// The requested operation did not happen
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for presentation layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Line number in the source document (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
            line: None,
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Add source line
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for statera-core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown section: {group}/{subgroup}")]
    UnknownSectionPair { group: String, subgroup: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::UnknownSectionPair { .. } => ErrorCode::UnknownSectionPair,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::UnknownSectionPair { .. } => ErrorSeverity::Warning,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::UnknownSectionPair { group, subgroup } => {
                details = details.with_detail(serde_json::json!({
                    "group": group,
                    "subgroup": subgroup,
                }));
                details = details.with_suggestion(
                    "Valid pairs: assets/current, assets/nonCurrent, liabilities/current, \
                     liabilities/nonCurrent, equity/main, income/revenues, income/expenses, \
                     cashFlow/receipts, cashFlow/payments, cashFlow/payroll, cashFlow/financial."
                        .to_string(),
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================
