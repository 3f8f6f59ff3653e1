//! Record store errors

use thiserror::Error;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to open record store at {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("record store write failed: {0}")]
    WriteFailed(String),

    #[error("record store read failed: {0}")]
    ReadFailed(String),

    #[error("record could not be encoded: {0}")]
    Encode(String),

    #[error("record could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    pub(crate) fn write_failed(err: impl Into<redb::Error>) -> Self {
        StoreError::WriteFailed(err.into().to_string())
    }

    pub(crate) fn read_failed(err: impl Into<redb::Error>) -> Self {
        StoreError::ReadFailed(err.into().to_string())
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Open { .. } => "FORM_STORE_OPEN_FAILED",
            StoreError::WriteFailed(_) => "FORM_STORE_WRITE_FAILED",
            StoreError::ReadFailed(_) => "FORM_STORE_READ_FAILED",
            StoreError::Encode(_) | StoreError::Decode(_) => "FORM_STORE_CODEC_FAILED",
        }
    }

    /// Store failures are never the client's fault
    pub fn status_code(&self) -> u16 {
        500
    }
}
