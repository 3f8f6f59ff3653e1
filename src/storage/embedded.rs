//! redb-backed record store
//!
//! One table (`data`) maps row identifiers to JSON-encoded records. redb
//! gives the transactional model the capture path relies on: one write
//! transaction at a time, any number of snapshot readers.

use std::fs;
use std::ops::ControlFlow;
use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};

use crate::observability::{log_event_with_fields, Event};

use super::backend::RecordStore;
use super::errors::{StoreError, StoreResult};
use super::record::Record;

/// The single bucket holding every record
const DATA: TableDefinition<&str, &[u8]> = TableDefinition::new("data");

/// Record store on top of an embedded redb database
pub struct RedbStore {
    db: Database,
    location: String,
}

impl RedbStore {
    /// Open (or create) the database file at `path`.
    ///
    /// Parent directories and the `data` table are created if absent.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let open_failed = |reason: String| StoreError::Open {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| open_failed(e.to_string()))?;
        }

        let db = Database::create(path).map_err(|e| open_failed(e.to_string()))?;
        Self::init(db, path.display().to_string())
    }

    /// Open a volatile store that lives only as long as the handle.
    pub fn in_memory() -> StoreResult<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|e| StoreError::Open {
                path: ":memory:".to_string(),
                reason: e.to_string(),
            })?;

        Self::init(db, ":memory:".to_string())
    }

    fn init(db: Database, location: String) -> StoreResult<Self> {
        let txn = db.begin_write().map_err(StoreError::write_failed)?;
        txn.open_table(DATA).map_err(StoreError::write_failed)?;
        txn.commit().map_err(StoreError::write_failed)?;

        log_event_with_fields(Event::StoreOpened, &[("path", &location)]);

        Ok(Self { db, location })
    }

    /// Path of the backing file, or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl RecordStore for RedbStore {
    fn put(&self, key: &str, record: &Record) -> StoreResult<()> {
        let bytes = record.encode()?;

        let txn = self.db.begin_write().map_err(StoreError::write_failed)?;
        {
            let mut table = txn.open_table(DATA).map_err(StoreError::write_failed)?;
            table
                .insert(key, bytes.as_slice())
                .map_err(StoreError::write_failed)?;
        }
        txn.commit().map_err(StoreError::write_failed)?;

        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Record>> {
        let txn = self.db.begin_read().map_err(StoreError::read_failed)?;
        let table = txn.open_table(DATA).map_err(StoreError::read_failed)?;

        match table.get(key).map_err(StoreError::read_failed)? {
            Some(value) => Record::decode(value.value()).map(Some),
            None => Ok(None),
        }
    }

    fn scan_all(
        &self,
        visit: &mut dyn FnMut(&str, Record) -> ControlFlow<()>,
    ) -> StoreResult<()> {
        // One read transaction for the whole scan
        let txn = self.db.begin_read().map_err(StoreError::read_failed)?;
        let table = txn.open_table(DATA).map_err(StoreError::read_failed)?;

        for entry in table.iter().map_err(StoreError::read_failed)? {
            let (key, value) = entry.map_err(StoreError::read_failed)?;

            match Record::decode(value.value()) {
                Ok(record) => {
                    if visit(key.value(), record).is_break() {
                        break;
                    }
                }
                Err(e) => {
                    log_event_with_fields(
                        Event::RecordDecodeSkipped,
                        &[("key", key.value()), ("reason", &e.to_string())],
                    );
                }
            }
        }

        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        let txn = self.db.begin_read().map_err(StoreError::read_failed)?;
        let table = txn.open_table(DATA).map_err(StoreError::read_failed)?;

        let count = table.len().map_err(StoreError::read_failed)?;
        usize::try_from(count).map_err(|e| StoreError::ReadFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn record(name: &str) -> Record {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), name.to_string());
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Record::new(values, &at)
    }

    fn keys(store: &RedbStore) -> Vec<String> {
        let mut keys = Vec::new();
        store
            .scan_all(&mut |key, _| {
                keys.push(key.to_string());
                ControlFlow::Continue(())
            })
            .unwrap();
        keys
    }

    #[test]
    fn test_put_then_get() {
        let store = RedbStore::in_memory().unwrap();
        store.put("row-1", &record("Alice")).unwrap();

        let loaded = store.get("row-1").unwrap().unwrap();
        assert_eq!(loaded, record("Alice"));
        assert!(store.get("row-2").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_same_key() {
        let store = RedbStore::in_memory().unwrap();
        store.put("k", &record("Alice")).unwrap();
        store.put("k", &record("Bob")).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("k").unwrap().unwrap().get("name"), "Bob");
    }

    #[test]
    fn test_scan_is_key_ordered() {
        let store = RedbStore::in_memory().unwrap();
        for key in ["charlie", "alpha", "bravo", "Zulu"] {
            store.put(key, &record(key)).unwrap();
        }

        // Byte order puts uppercase first
        assert_eq!(keys(&store), vec!["Zulu", "alpha", "bravo", "charlie"]);
    }

    #[test]
    fn test_scan_can_stop_early_and_restarts() {
        let store = RedbStore::in_memory().unwrap();
        for key in ["a", "b", "c"] {
            store.put(key, &record(key)).unwrap();
        }

        let mut seen = 0;
        store
            .scan_all(&mut |_, _| {
                seen += 1;
                ControlFlow::Break(())
            })
            .unwrap();
        assert_eq!(seen, 1);

        assert_eq!(keys(&store).len(), 3);
    }

    #[test]
    fn test_empty_store() {
        let store = RedbStore::in_memory().unwrap();
        assert!(store.is_empty().unwrap());
        assert!(keys(&store).is_empty());
        assert_eq!(store.location(), ":memory:");
    }

    #[test]
    fn test_open_creates_parent_dirs_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("captured_data.db");

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("row-1", &record("Alice")).unwrap();
        }

        let reopened = RedbStore::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.get("row-1").unwrap().unwrap(), record("Alice"));
    }
}
