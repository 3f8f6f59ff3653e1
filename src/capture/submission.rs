//! Submitted form values

use std::collections::HashMap;

/// Raw values submitted for one capture, one string per field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedValues {
    values: HashMap<String, String>,
}

impl SubmittedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered pairs. The first value submitted for a name wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (name, value) in pairs {
            values.entry(name.into()).or_insert_with(|| value.into());
        }
        Self { values }
    }

    /// Value for `name`; fields that were not submitted read as empty.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
