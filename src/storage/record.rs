//! Stored record format
//!
//! A record is a flat string-to-string map holding every schema field plus
//! the synthetic `timestamp`. On disk it is a JSON object.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::schema::TIMESTAMP_FIELD;

use super::errors::{StoreError, StoreResult};

/// Timestamp layout, e.g. `1/2/2006 15:04`
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y %H:%M";

/// Formats a capture time in the stored timestamp layout
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// An accepted submission as stored.
///
/// Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, String>,
}

impl Record {
    /// Builds a record from field values, stamping it with `at`.
    pub fn new(mut values: BTreeMap<String, String>, at: &NaiveDateTime) -> Self {
        values.insert(TIMESTAMP_FIELD.to_string(), format_timestamp(at));
        Self { values }
    }

    /// Value for `name`; absent keys read as the empty string.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn timestamp(&self) -> &str {
        self.get(TIMESTAMP_FIELD)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Encodes the record as a JSON object
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(&self.values).map_err(|e| StoreError::Encode(e.to_string()))
    }

    /// Decodes a stored JSON object.
    ///
    /// Non-string scalars are stringified and `null` reads as empty. Anything
    /// other than a JSON object is a decode error.
    pub fn decode(bytes: &[u8]) -> StoreResult<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))?;

        let Value::Object(map) = value else {
            return Err(StoreError::Decode(
                "stored value is not a JSON object".to_string(),
            ));
        };

        let values = map
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();

        Ok(Self { values })
    }
}
