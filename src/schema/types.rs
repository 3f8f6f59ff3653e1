//! Schema type definitions
//!
//! Two shapes live here:
//! - `SchemaDefinition` / `FieldSpec`: the raw shape decoded from the
//!   configuration file
//! - `Schema` / `FieldDef`: the compiled, immutable shape used at request time

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Name of the synthetic column appended to every record
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Header label of the synthetic timestamp column
pub const TIMESTAMP_LABEL: &str = "Timestamp";

/// Validation rule applied to a non-empty field value
#[derive(Debug, Clone)]
pub enum ValidationKind {
    /// Syntactically valid email address
    Email,
    /// ASCII digits only
    Numeric,
    /// `http://` or `https://` followed by non-whitespace
    Url,
    /// ASCII letters only
    Alpha,
    /// ASCII letters and digits only
    Alphanumeric,
    /// Value must match the compiled pattern
    Regex(Regex),
    /// Always valid
    None,
}

impl ValidationKind {
    /// Returns the configuration name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            ValidationKind::Email => "email",
            ValidationKind::Numeric => "numeric",
            ValidationKind::Url => "url",
            ValidationKind::Alpha => "alpha",
            ValidationKind::Alphanumeric => "alphanumeric",
            ValidationKind::Regex(_) => "regex",
            ValidationKind::None => "none",
        }
    }

    /// Resolves a pattern-free kind from its configuration name.
    ///
    /// `regex` is not resolved here since it needs a compiled pattern.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(ValidationKind::Email),
            "numeric" => Some(ValidationKind::Numeric),
            "url" => Some(ValidationKind::Url),
            "alpha" => Some(ValidationKind::Alpha),
            "alphanumeric" => Some(ValidationKind::Alphanumeric),
            "none" | "" => Some(ValidationKind::None),
            _ => None,
        }
    }
}

impl PartialEq for ValidationKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValidationKind::Regex(a), ValidationKind::Regex(b)) => a.as_str() == b.as_str(),
            (a, b) => a.name() == b.name(),
        }
    }
}

impl Eq for ValidationKind {}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::Regex(re) => write!(f, "regex({})", re.as_str()),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Compiled field descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Display name used as the CSV header
    pub label: String,
    /// Validation applied to non-empty values
    pub kind: ValidationKind,
    /// Whether an empty value is rejected
    pub required: bool,
}

impl FieldDef {
    /// Create a required field
    pub fn required(label: impl Into<String>, kind: ValidationKind) -> Self {
        Self {
            label: label.into(),
            kind,
            required: true,
        }
    }

    /// Create an optional field
    pub fn optional(label: impl Into<String>, kind: ValidationKind) -> Self {
        Self {
            label: label.into(),
            kind,
            required: false,
        }
    }
}

/// Immutable field schema.
///
/// Fields are kept in a `BTreeMap`, so every iteration (validation order,
/// reported invalid fields, CSV columns) is lexicographic by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: BTreeMap<String, FieldDef>,
    identity_field: Option<String>,
}

impl Schema {
    /// Create a schema without an identity field
    pub fn new(fields: BTreeMap<String, FieldDef>) -> Self {
        Self {
            fields,
            identity_field: None,
        }
    }

    /// Designate the field whose value becomes the row identifier
    pub fn with_identity_field(mut self, name: impl Into<String>) -> Self {
        self.identity_field = Some(name.into());
        self
    }

    /// Field definitions in column order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Field names in column order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn identity_field(&self) -> Option<&str> {
        self.identity_field.as_deref()
    }

    /// Validates the schema structure itself (not a submission)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("schema declares no fields".into());
        }

        if self.fields.contains_key(TIMESTAMP_FIELD) {
            return Err(format!("field name '{}' is reserved", TIMESTAMP_FIELD));
        }

        if let Some(identity) = &self.identity_field {
            if !self.fields.contains_key(identity) {
                return Err(format!(
                    "identity field '{}' is not declared in the schema",
                    identity
                ));
            }
        }

        Ok(())
    }
}

/// Raw schema section of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Optional identity field name; empty means none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Field specs keyed by field name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
}

/// Raw field spec as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredFlag>,
}

/// `required` accepts a boolean or the legacy `"true"`/`"false"` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredFlag {
    Bool(bool),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut fields = BTreeMap::new();
        fields.insert("name".into(), FieldDef::required("Name", ValidationKind::Alpha));
        fields.insert("email".into(), FieldDef::required("Email", ValidationKind::Email));
        fields.insert("age".into(), FieldDef::optional("Age", ValidationKind::Numeric));
        Schema::new(fields)
    }

    #[test]
    fn test_fields_iterate_lexicographically() {
        let schema = sample_schema();
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["age", "email", "name"]);
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
        assert!(sample_schema()
            .with_identity_field("email")
            .validate_structure()
            .is_ok());
    }

    #[test]
    fn test_schema_rejects_unknown_identity() {
        let result = sample_schema()
            .with_identity_field("user_id")
            .validate_structure();
        assert!(result.unwrap_err().contains("user_id"));
    }

    #[test]
    fn test_schema_rejects_timestamp_field() {
        let mut fields = BTreeMap::new();
        fields.insert(
            TIMESTAMP_FIELD.to_string(),
            FieldDef::optional("When", ValidationKind::None),
        );
        assert!(Schema::new(fields).validate_structure().is_err());
    }

    #[test]
    fn test_empty_schema_invalid() {
        assert!(Schema::new(BTreeMap::new()).validate_structure().is_err());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for name in ["email", "numeric", "url", "alpha", "alphanumeric", "none"] {
            let kind = ValidationKind::from_name(name).unwrap();
            assert_eq!(kind.name(), name);
        }
        assert!(ValidationKind::from_name("regex").is_none());
        assert!(ValidationKind::from_name("phone").is_none());
    }

    #[test]
    fn test_regex_kind_equality_uses_pattern() {
        let a = ValidationKind::Regex(Regex::new("^[0-9]{5}$").unwrap());
        let b = ValidationKind::Regex(Regex::new("^[0-9]{5}$").unwrap());
        let c = ValidationKind::Regex(Regex::new("^[0-9]{4}$").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, ValidationKind::None);
    }

    #[test]
    fn test_field_spec_decodes_legacy_shape() {
        let spec: FieldSpec = serde_json::from_str(
            r#"{"label": "Name", "validation": "alpha", "required": "true"}"#,
        )
        .unwrap();
        assert_eq!(spec.label, "Name");
        assert_eq!(spec.validation.as_deref(), Some("alpha"));
        assert_eq!(spec.required, Some(RequiredFlag::Text("true".into())));
    }

    #[test]
    fn test_field_spec_decodes_boolean_required() {
        let spec: FieldSpec =
            serde_json::from_str(r#"{"label": "Age", "required": false}"#).unwrap();
        assert_eq!(spec.required, Some(RequiredFlag::Bool(false)));
        assert!(spec.validation.is_none());
    }
}
