//! String-valued field maps produced by the input parsers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to raw value, as produced by either parsing stage.
///
/// Lookups of absent keys yield `""`, so no optional value ever reaches
/// the validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns the trimmed value for `key`.
    pub fn get_trimmed(&self, key: &str) -> &str {
        self.get(key).trim()
    }

    /// True when `key` holds something other than whitespace.
    pub fn has(&self, key: &str) -> bool {
        !self.get_trimmed(key).is_empty()
    }

    /// True when no key holds a non-blank value.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    /// Overlays every non-blank value of `other` onto a copy of `self`.
    pub fn overlay(&self, other: &FieldMap) -> FieldMap {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            if !value.trim().is_empty() {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
