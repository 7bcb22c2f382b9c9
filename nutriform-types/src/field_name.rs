use std::fmt;

use serde::{Deserialize, Serialize};

/// The name of a form field, e.g. `"activity_level"`.
///
/// Used as keys in `FieldValues` and as the wire name of the field in
/// request payloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName {
    name: String,
}

impl FieldName {
    /// Create a new field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Check if the name is empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&FieldName> for FieldName {
    fn from(name: &FieldName) -> Self {
        name.clone()
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl PartialEq<str> for FieldName {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}
