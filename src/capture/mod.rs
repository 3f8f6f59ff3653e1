//! Submission capture
//!
//! Runs every schema field through the validator and, when all pass, writes a
//! single timestamped record keyed by the row identifier.

mod engine;
mod errors;
mod row_id;
mod submission;

pub use engine::{CaptureEngine, CaptureOutcome};
pub use errors::{CaptureError, CaptureResult};
pub use row_id::{RowId, RANDOM_ID_BYTES};
pub use submission::SubmittedValues;
