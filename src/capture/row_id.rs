//! Row identifiers
//!
//! A row identifier is either the value of the schema's identity field or a
//! fresh random token.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Bytes of entropy in a generated identifier
pub const RANDOM_ID_BYTES: usize = 32;

/// Store key for one record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Generate a random identifier: 32 bytes from the OS CSPRNG, URL-safe
    /// base64 with padding. Collisions are not checked.
    pub fn random() -> Self {
        let mut bytes = [0u8; RANDOM_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE.encode(bytes))
    }

    /// Use a submitted identity value as the identifier
    pub fn from_identity(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
