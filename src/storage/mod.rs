//! Record storage for formcapture
//!
//! Accepted submissions are persisted in an embedded key-value store.
//!
//! # Design Principles
//!
//! - One bucket (`data`), created at open, never dropped
//! - Keys are row identifiers; scans run in key byte order
//! - Single atomic write per accepted submission
//! - Scans read one consistent snapshot
//! - Records are flat JSON objects; unknown or missing keys read as empty

mod backend;
mod embedded;
mod errors;
mod record;

pub use backend::RecordStore;
pub use embedded::RedbStore;
pub use errors::{StoreError, StoreResult};
pub use record::{format_timestamp, Record, TIMESTAMP_FORMAT};
