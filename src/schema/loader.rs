//! Schema loader that compiles the configured field specs at startup
//!
//! - Missing or malformed schema files are fatal
//! - Bad regex patterns are fatal here, never at request time
//! - Unknown validation kinds degrade to `none` and produce a warning

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{SchemaError, SchemaResult, SchemaWarning};
use super::types::{FieldDef, FieldSpec, RequiredFlag, Schema, SchemaDefinition, ValidationKind};

/// Compiles raw schema definitions and collects non-fatal warnings.
#[derive(Debug, Default)]
pub struct SchemaLoader {
    warnings: Vec<SchemaWarning>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the schema section (`id`, `fields`) from a JSON configuration file.
    ///
    /// Other top-level keys are ignored.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        self.load_str(&content)
    }

    /// Loads the schema section from a JSON document.
    pub fn load_str(&mut self, content: &str) -> SchemaResult<Schema> {
        let definition: SchemaDefinition = serde_json::from_str(content)
            .map_err(|e| SchemaError::Malformed(format!("invalid JSON: {}", e)))?;

        self.compile(&definition)
    }

    /// Compiles a decoded definition into an immutable `Schema`.
    pub fn compile(&mut self, definition: &SchemaDefinition) -> SchemaResult<Schema> {
        let mut fields = BTreeMap::new();

        for (name, spec) in &definition.fields {
            let field = self.compile_field(name, spec)?;
            fields.insert(name.clone(), field);
        }

        let mut schema = Schema::new(fields);
        if let Some(identity) = definition.id.as_deref().filter(|id| !id.is_empty()) {
            schema = schema.with_identity_field(identity);
        }

        schema.validate_structure().map_err(SchemaError::Malformed)?;

        Ok(schema)
    }

    /// Warnings collected by every compile on this loader
    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }

    fn compile_field(&mut self, name: &str, spec: &FieldSpec) -> SchemaResult<FieldDef> {
        let label = if spec.label.is_empty() {
            name.to_string()
        } else {
            spec.label.clone()
        };

        let required = match &spec.required {
            None => false,
            Some(RequiredFlag::Bool(flag)) => *flag,
            Some(RequiredFlag::Text(text)) => match text.as_str() {
                "true" => true,
                "false" | "" => false,
                other => {
                    return Err(SchemaError::InvalidRequiredFlag {
                        field: name.to_string(),
                        value: other.to_string(),
                    })
                }
            },
        };

        let kind_name = spec.validation.as_deref().unwrap_or("");
        let kind = if kind_name == "regex" {
            let pattern = spec
                .regex
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| SchemaError::MissingPattern {
                    field: name.to_string(),
                })?;

            let compiled = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                field: name.to_string(),
                reason: e.to_string(),
            })?;

            ValidationKind::Regex(compiled)
        } else {
            if spec.regex.as_deref().is_some_and(|p| !p.is_empty()) {
                self.warn(
                    name,
                    format!("regex pattern ignored for validation kind '{}'", kind_name),
                );
            }

            match ValidationKind::from_name(kind_name) {
                Some(kind) => kind,
                None => {
                    self.warn(
                        name,
                        format!(
                            "unknown validation kind '{}', field accepts any value",
                            kind_name
                        ),
                    );
                    ValidationKind::None
                }
            }
        };

        Ok(FieldDef {
            label,
            kind,
            required,
        })
    }

    fn warn(&mut self, field: &str, message: String) {
        log_event_with_fields(Event::SchemaWarning, &[("field", field), ("message", &message)]);
        self.warnings.push(SchemaWarning::new(field, message));
    }
}
