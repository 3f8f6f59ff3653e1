//! CSV projection of stored records
//!
//! Column order is fixed: schema fields in lexicographic order of field
//! name, then `Timestamp`. Headers use field labels. Rows follow store scan
//! order (key byte order) and come from a single read snapshot.

use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::schema::{Schema, TIMESTAMP_FIELD, TIMESTAMP_LABEL};
use crate::storage::RecordStore;

use super::errors::{ExportError, ExportResult};

/// One CSV column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Record key the column reads from
    pub field: String,
    /// Header text
    pub label: String,
}

/// Renders every stored record as CSV.
#[derive(Clone)]
pub struct CsvProjector {
    schema: Arc<Schema>,
    store: Arc<dyn RecordStore>,
}

impl CsvProjector {
    pub fn new(schema: Arc<Schema>, store: Arc<dyn RecordStore>) -> Self {
        Self { schema, store }
    }

    /// Columns in output order
    pub fn columns(&self) -> Vec<Column> {
        self.schema
            .fields()
            .map(|(name, field)| Column {
                field: name.to_string(),
                label: field.label.clone(),
            })
            .chain(std::iter::once(Column {
                field: TIMESTAMP_FIELD.to_string(),
                label: TIMESTAMP_LABEL.to_string(),
            }))
            .collect()
    }

    /// Stream the CSV document into `out`, returning the number of data rows.
    pub fn project_to<W: Write>(&self, out: W) -> ExportResult<usize> {
        let columns = self.columns();
        let mut writer = csv::Writer::from_writer(out);

        writer.write_record(columns.iter().map(|c| c.label.as_str()))?;

        let mut rows = 0;
        let mut failure = None;
        self.store.scan_all(&mut |_key, record| {
            let row = columns.iter().map(|c| record.get(&c.field));
            match writer.write_record(row) {
                Ok(()) => {
                    rows += 1;
                    ControlFlow::Continue(())
                }
                Err(e) => {
                    failure = Some(e);
                    ControlFlow::Break(())
                }
            }
        })?;

        if let Some(e) = failure {
            return Err(e.into());
        }

        writer.flush()?;
        Ok(rows)
    }

    /// Render the whole CSV document in memory.
    pub fn project(&self) -> ExportResult<String> {
        let mut buffer = Vec::new();
        self.project_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|_| ExportError::Encoding)
    }
}
