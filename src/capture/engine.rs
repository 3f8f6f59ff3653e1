//! Capture engine: validate a submission against the schema and persist it.
//!
//! Side effects: exactly one store write per accepted submission, none for a
//! rejected one. A failed write is returned as an error and never reported
//! as accepted.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{validate, Schema};
use crate::storage::{Record, RecordStore};

use super::errors::CaptureResult;
use super::row_id::RowId;
use super::submission::SubmittedValues;

/// Result of one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// True iff every field validated and the record was stored
    pub accepted: bool,
    /// Fields that failed validation, sorted by name
    pub invalid_fields: Vec<String>,
    /// Key the record was stored under, when accepted
    pub row_id: Option<RowId>,
}

impl CaptureOutcome {
    fn accepted(row_id: RowId) -> Self {
        Self {
            accepted: true,
            invalid_fields: Vec::new(),
            row_id: Some(row_id),
        }
    }

    fn rejected(invalid_fields: Vec<String>) -> Self {
        Self {
            accepted: false,
            invalid_fields,
            row_id: None,
        }
    }
}

/// Validates submissions and writes accepted ones to the record store.
///
/// Cheap to share: holds the immutable schema and the store handle.
#[derive(Clone)]
pub struct CaptureEngine {
    schema: Arc<Schema>,
    store: Arc<dyn RecordStore>,
}

impl CaptureEngine {
    pub fn new(schema: Arc<Schema>, store: Arc<dyn RecordStore>) -> Self {
        Self { schema, store }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Capture a submission stamped with the current local time.
    pub fn capture(&self, submitted: &SubmittedValues) -> CaptureResult<CaptureOutcome> {
        self.capture_at(submitted, Local::now().naive_local())
    }

    /// Capture a submission stamped with `at`.
    pub fn capture_at(
        &self,
        submitted: &SubmittedValues,
        at: NaiveDateTime,
    ) -> CaptureResult<CaptureOutcome> {
        let mut invalid_fields = Vec::new();
        let mut values = BTreeMap::new();

        // Schema order is lexicographic, so invalid_fields comes out sorted
        for (name, field) in self.schema.fields() {
            let value = submitted.get(name);
            if !validate(field, value).is_valid() {
                invalid_fields.push(name.to_string());
            }
            values.insert(name.to_string(), value.to_string());
        }

        if !invalid_fields.is_empty() {
            log_event_with_fields(
                Event::CaptureRejected,
                &[("invalid_fields", &invalid_fields.join(","))],
            );
            return Ok(CaptureOutcome::rejected(invalid_fields));
        }

        let (row_id, keyed_by) = self.row_id_for(submitted);
        let record = Record::new(values, &at);

        if let Err(e) = self.store.put(row_id.as_str(), &record) {
            log_event_with_fields(
                Event::CaptureStoreFailed,
                &[("code", e.code()), ("reason", &e.to_string())],
            );
            return Err(e.into());
        }

        log_event_with_fields(Event::CaptureAccepted, &[("keyed_by", keyed_by)]);

        Ok(CaptureOutcome::accepted(row_id))
    }

    fn row_id_for(&self, submitted: &SubmittedValues) -> (RowId, &'static str) {
        match self.schema.identity_field().map(|name| submitted.get(name)) {
            Some(value) if !value.is_empty() => (RowId::from_identity(value), "identity"),
            _ => (RowId::random(), "random"),
        }
    }
}
