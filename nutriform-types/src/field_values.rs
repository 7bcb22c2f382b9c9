use std::collections::HashMap;

use crate::FieldName;

/// Scalar values collected by the form, keyed by field name.
///
/// Every field holds a plain string exactly as collected from its input,
/// whether it is typed, picked from a card grid, or chosen from a dropdown.
/// A field that was never written reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: HashMap<FieldName, String>,
}

impl FieldValues {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Write a value, returning the previous one if any.
    pub fn set(&mut self, name: impl Into<FieldName>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    /// Get the raw value of a field.
    pub fn get(&self, name: &FieldName) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get the value of a field, or the empty string if it was never written.
    pub fn value(&self, name: &FieldName) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Check whether a field is empty after trimming whitespace.
    pub fn is_blank(&self, name: &FieldName) -> bool {
        self.value(name).trim().is_empty()
    }

    /// Remove a value.
    pub fn remove(&mut self, name: &FieldName) -> Option<String> {
        self.values.remove(name)
    }

    /// Get an iterator over all name-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Get the number of written fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no field has been written.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for FieldValues
where
    N: Into<FieldName>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.set(name, value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_field_reads_empty() {
        let values = FieldValues::new();
        assert_eq!(values.value(&FieldName::new("age")), "");
        assert!(values.is_blank(&FieldName::new("age")));
    }

    #[test]
    fn whitespace_only_is_blank() {
        let mut values = FieldValues::new();
        values.set("age", "   ");
        assert!(values.is_blank(&FieldName::new("age")));
        values.set("age", " 30 ");
        assert!(!values.is_blank(&FieldName::new("age")));
    }

    #[test]
    fn set_returns_previous() {
        let mut values = FieldValues::new();
        assert_eq!(values.set("gender", "Male"), None);
        assert_eq!(values.set("gender", "Female"), Some("Male".to_string()));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn collect_from_pairs() {
        let values: FieldValues = [("age", "30"), ("weight", "60")].into_iter().collect();
        assert_eq!(values.value(&FieldName::new("weight")), "60");
        assert_eq!(values.len(), 2);
    }
}
