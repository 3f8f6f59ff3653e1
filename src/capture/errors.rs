//! Capture errors
//!
//! Field validation failures are not errors; they are reported in
//! `CaptureOutcome::invalid_fields`. Only conditions the operator must see
//! surface here.

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Submission was valid but could not be persisted
    #[error("submission could not be stored: {0}")]
    Store(#[from] StoreError),
}

impl CaptureError {
    pub fn status_code(&self) -> u16 {
        match self {
            CaptureError::Store(e) => e.status_code(),
        }
    }
}
