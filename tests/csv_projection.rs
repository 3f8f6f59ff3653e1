//! CSV Projection Tests
//!
//! - Header has one column per schema field plus the timestamp
//! - Every stored record becomes exactly one row
//! - Output is identical across calls for an unchanged store
//! - Records written under an older schema still project cleanly
//! - Projections taken while captures run are complete snapshots

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use formcapture::capture::{CaptureEngine, SubmittedValues};
use formcapture::export::CsvProjector;
use formcapture::schema::{FieldDef, Schema, SchemaLoader, ValidationKind};
use formcapture::storage::{Record, RecordStore, RedbStore};

// =============================================================================
// Helper Functions
// =============================================================================

fn survey_schema() -> Schema {
    SchemaLoader::new()
        .load_str(
            r#"{
                "fields": {
                    "name": {"label": "Full name", "validation": "alpha", "required": "true"},
                    "age": {"label": "Age", "validation": "numeric"},
                    "site": {"label": "Website", "validation": "url"}
                }
            }"#,
        )
        .unwrap()
}

fn parse(csv: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(csv.as_bytes());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_header_matches_schema_labels() {
    let schema = Arc::new(survey_schema());
    let store = Arc::new(RedbStore::in_memory().unwrap());
    let projector = CsvProjector::new(schema.clone(), store);

    let rows = parse(&projector.project().unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), schema.len() + 1);
    assert_eq!(rows[0], vec!["Age", "Full name", "Website", "Timestamp"]);
}

#[test]
fn test_one_row_per_accepted_capture() {
    let schema = Arc::new(survey_schema());
    let store = Arc::new(RedbStore::in_memory().unwrap());
    let engine = CaptureEngine::new(schema.clone(), store.clone());

    let submissions = [
        vec![("name", "Ada"), ("age", "36")],
        vec![("name", "Grace"), ("site", "https://example.com")],
        vec![("name", "L1nus")],
        vec![("name", "Alan")],
    ];
    let accepted = submissions
        .iter()
        .map(|pairs| engine.capture(&SubmittedValues::from_pairs(pairs.clone())).unwrap())
        .filter(|outcome| outcome.accepted)
        .count();
    assert_eq!(accepted, 3);

    let rows = parse(&CsvProjector::new(schema.clone(), store.clone()).project().unwrap());
    assert_eq!(rows.len(), 1 + store.len().unwrap());
    for row in &rows {
        assert_eq!(row.len(), schema.len() + 1);
    }
}

#[test]
fn test_projection_is_deterministic() {
    let schema = Arc::new(survey_schema());
    let store = Arc::new(RedbStore::in_memory().unwrap());
    let engine = CaptureEngine::new(schema.clone(), store.clone());

    for name in ["Ada", "Grace", "Alan", "Barbara"] {
        engine
            .capture(&SubmittedValues::from_pairs([("name", name)]))
            .unwrap();
    }

    let projector = CsvProjector::new(schema, store);
    assert_eq!(projector.project().unwrap(), projector.project().unwrap());
}

// =============================================================================
// Schema Drift Tests
// =============================================================================

#[test]
fn test_records_from_older_schema_project_with_blanks() {
    let store = Arc::new(RedbStore::in_memory().unwrap());
    let at = NaiveDate::from_ymd_opt(2023, 12, 24)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap();

    let mut legacy = BTreeMap::new();
    legacy.insert("name".to_string(), "Ada".to_string());
    legacy.insert("phone".to_string(), "555".to_string());
    store.put("legacy", &Record::new(legacy, &at)).unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), FieldDef::required("Name", ValidationKind::Alpha));
    fields.insert("email".to_string(), FieldDef::optional("Email", ValidationKind::Email));
    let projector = CsvProjector::new(Arc::new(Schema::new(fields)), store);

    let rows = parse(&projector.project().unwrap());
    assert_eq!(rows[0], vec!["Email", "Name", "Timestamp"]);
    assert_eq!(rows[1], vec!["", "Ada", "12/24/2023 23:59"]);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_projection_while_capturing_has_no_torn_rows() {
    const CAPTURES: usize = 100;

    let schema = Arc::new(survey_schema());
    let store = Arc::new(RedbStore::in_memory().unwrap());
    let engine = CaptureEngine::new(schema.clone(), store.clone());
    let projector = CsvProjector::new(schema.clone(), store.clone());

    let writer = {
        thread::spawn(move || {
            for _ in 0..CAPTURES {
                let outcome = engine
                    .capture(&SubmittedValues::from_pairs([
                        ("name", "Ada"),
                        ("age", "36"),
                        ("site", "https://example.com"),
                    ]))
                    .unwrap();
                assert!(outcome.accepted);
            }
        })
    };

    let mut last_rows = 0;
    loop {
        let finished = writer.is_finished();

        let rows = parse(&projector.project().unwrap());
        for row in &rows[1..] {
            assert_eq!(&row[..3], &["36", "Ada", "https://example.com"]);
            assert!(!row[3].is_empty());
        }

        // Committed rows never disappear between snapshots
        assert!(rows.len() - 1 >= last_rows);
        last_rows = rows.len() - 1;

        if finished {
            assert_eq!(last_rows, CAPTURES);
            break;
        }
    }

    writer.join().unwrap();
}
