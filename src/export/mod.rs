//! CSV export of captured records

mod errors;
mod projector;

pub use errors::{ExportError, ExportResult};
pub use projector::{Column, CsvProjector};
