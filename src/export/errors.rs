//! Export errors

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read records: {0}")]
    Store(#[from] StoreError),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write CSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8")]
    Encoding,
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Store(e) => e.code(),
            ExportError::Csv(_) | ExportError::Io(_) | ExportError::Encoding => {
                "FORM_EXPORT_WRITE_FAILED"
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        500
    }
}
