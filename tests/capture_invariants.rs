//! Capture Invariant Tests
//!
//! - A submission is accepted iff every declared field validates
//! - Accepted submissions produce exactly one store write, rejected ones none
//! - Without an identity value every capture gets a fresh key
//! - Identity-keyed captures overwrite, last write wins

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use formcapture::capture::{CaptureEngine, SubmittedValues};
use formcapture::schema::{FieldDef, Schema, ValidationKind};
use formcapture::storage::{RecordStore, RedbStore};

// =============================================================================
// Helper Functions
// =============================================================================

fn contact_schema() -> Schema {
    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), FieldDef::required("Name", ValidationKind::Alpha));
    fields.insert("email".to_string(), FieldDef::required("E-mail", ValidationKind::Email));
    Schema::new(fields)
}

fn setup_engine(schema: Schema) -> (CaptureEngine, Arc<RedbStore>) {
    let store = Arc::new(RedbStore::in_memory().unwrap());
    let engine = CaptureEngine::new(Arc::new(schema), store.clone());
    (engine, store)
}

fn submission(pairs: &[(&str, &str)]) -> SubmittedValues {
    SubmittedValues::from_pairs(pairs.iter().copied())
}

// =============================================================================
// Acceptance Tests
// =============================================================================

#[test]
fn test_valid_submission_stores_one_record() {
    let (engine, store) = setup_engine(contact_schema());

    let outcome = engine
        .capture(&submission(&[("name", "John"), ("email", "johndoe@example.com")]))
        .unwrap();

    assert!(outcome.accepted);
    assert!(outcome.invalid_fields.is_empty());
    assert_eq!(store.len().unwrap(), 1);

    let key = outcome.row_id.unwrap();
    let record = store.get(key.as_str()).unwrap().unwrap();
    assert_eq!(record.get("name"), "John");
    assert_eq!(record.get("email"), "johndoe@example.com");
}

#[test]
fn test_invalid_email_rejected_without_write() {
    let (engine, store) = setup_engine(contact_schema());

    let outcome = engine
        .capture(&submission(&[("name", "John"), ("email", "invalid-email")]))
        .unwrap();

    assert!(!outcome.accepted);
    assert_eq!(outcome.invalid_fields, vec!["email".to_string()]);
    assert!(outcome.row_id.is_none());
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_every_invalid_field_reported() {
    let (engine, store) = setup_engine(contact_schema());

    let outcome = engine.capture(&submission(&[("name", "J0hn")])).unwrap();

    assert!(!outcome.accepted);
    assert_eq!(
        outcome.invalid_fields,
        vec!["email".to_string(), "name".to_string()]
    );
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_undeclared_fields_ignored() {
    let (engine, store) = setup_engine(contact_schema());

    let outcome = engine
        .capture(&submission(&[
            ("name", "John"),
            ("email", "john@example.com"),
            ("utm_source", "newsletter"),
        ]))
        .unwrap();

    assert!(outcome.accepted);
    let record = store.get(outcome.row_id.unwrap().as_str()).unwrap().unwrap();
    assert!(!record.values().contains_key("utm_source"));
}

// =============================================================================
// Row Identifier Tests
// =============================================================================

#[test]
fn test_identical_captures_get_distinct_keys() {
    let (engine, store) = setup_engine(contact_schema());
    let values = submission(&[("name", "John"), ("email", "john@example.com")]);

    let first = engine.capture(&values).unwrap().row_id.unwrap();
    let second = engine.capture(&values).unwrap().row_id.unwrap();

    assert_ne!(first, second);
    assert_eq!(first.as_str().len(), 44);
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn test_identity_field_overwrites_last_write_wins() {
    let (engine, store) = setup_engine(contact_schema().with_identity_field("email"));
    let first_at = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let second_at = NaiveDate::from_ymd_opt(2024, 1, 3)
        .unwrap()
        .and_hms_opt(17, 5, 0)
        .unwrap();

    engine
        .capture_at(
            &submission(&[("name", "John"), ("email", "john@example.com")]),
            first_at,
        )
        .unwrap();
    let outcome = engine
        .capture_at(
            &submission(&[("name", "Johnny"), ("email", "john@example.com")]),
            second_at,
        )
        .unwrap();

    assert_eq!(outcome.row_id.unwrap().as_str(), "john@example.com");
    assert_eq!(store.len().unwrap(), 1);

    let record = store.get("john@example.com").unwrap().unwrap();
    assert_eq!(record.get("name"), "Johnny");
    assert_eq!(record.timestamp(), "1/3/2024 17:05");
}

#[test]
fn test_empty_identity_value_falls_back_to_random_key() {
    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), FieldDef::required("Name", ValidationKind::Alpha));
    fields.insert(
        "ref".to_string(),
        FieldDef::optional("Reference", ValidationKind::Alphanumeric),
    );
    let (engine, store) = setup_engine(Schema::new(fields).with_identity_field("ref"));

    let values = submission(&[("name", "John")]);
    let first = engine.capture(&values).unwrap().row_id.unwrap();
    let second = engine.capture(&values).unwrap().row_id.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.len().unwrap(), 2);
}
