//! Schema error types
//!
//! Every `SchemaError` is raised while compiling the schema at startup and is
//! fatal: the process must not serve requests with a broken schema.
//! Recoverable problems are reported as `SchemaWarning` instead.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Fatal schema loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("failed to read schema from {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("malformed schema: {0}")]
    Malformed(String),

    #[error("field '{field}': regex validation requires a pattern")]
    MissingPattern { field: String },

    #[error("field '{field}': invalid regex pattern: {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("field '{field}': invalid required flag '{value}'")]
    InvalidRequiredFlag { field: String, value: String },
}

impl SchemaError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Unreadable { .. } => "FORM_SCHEMA_UNREADABLE",
            SchemaError::Malformed(_) => "FORM_SCHEMA_MALFORMED",
            SchemaError::MissingPattern { .. } | SchemaError::InvalidPattern { .. } => {
                "FORM_SCHEMA_BAD_PATTERN"
            }
            SchemaError::InvalidRequiredFlag { .. } => "FORM_SCHEMA_BAD_REQUIRED_FLAG",
        }
    }
}

/// A recoverable schema problem.
///
/// The affected field is still compiled (usually as an always-valid field)
/// and the warning is surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    /// Field the warning applies to
    pub field: String,
    /// Human-readable description
    pub message: String,
}

impl SchemaWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}
