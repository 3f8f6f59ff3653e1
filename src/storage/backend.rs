//! # Record Store Trait

use std::ops::ControlFlow;

use super::errors::StoreResult;
use super::record::Record;

/// Persistent keyed storage for accepted records.
///
/// Implementations must make `put` atomic and give `scan_all` a consistent
/// snapshot for its whole duration.
pub trait RecordStore: Send + Sync {
    /// Atomically write `record` under `key`, replacing any previous value
    fn put(&self, key: &str, record: &Record) -> StoreResult<()>;

    /// Read the record stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<Record>>;

    /// Visit every record in key byte order.
    ///
    /// The visitor may stop the scan early with `ControlFlow::Break`. Each call
    /// starts a fresh scan from the first key.
    fn scan_all(&self, visit: &mut dyn FnMut(&str, Record) -> ControlFlow<()>)
        -> StoreResult<()>;

    /// Number of stored entries
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
