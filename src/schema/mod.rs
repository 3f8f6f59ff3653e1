//! Field schema for formcapture
//!
//! The schema is loaded once at startup from configuration and is immutable
//! afterwards. It drives both submission validation and CSV column layout.
//!
//! # Design Principles
//!
//! - Typed field descriptors, decoded directly from configuration
//! - Closed set of validation kinds; unknown kinds only exist at the
//!   decoding boundary and degrade to `none` with a warning
//! - Regex patterns are compiled at load time
//! - Deterministic field order (lexicographic by name)

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, SchemaWarning};
pub use loader::SchemaLoader;
pub use types::{
    FieldDef, FieldSpec, RequiredFlag, Schema, SchemaDefinition, ValidationKind,
    TIMESTAMP_FIELD, TIMESTAMP_LABEL,
};
pub use validator::{validate, Verdict};
