//! Form values and error maps
//!
//! Both maps preserve insertion order: the payload keeps the order fields were
//! read from the form, and the error map keeps the order errors were recorded,
//! which decides where focus lands after a failed submission.

use crate::field::FieldError;
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

/// Raw field values captured from the form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, String>);

impl FormValues {
    /// Create an empty value set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a field, if the form has it
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Set a field value, keeping the original position when it already exists
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Remove a field
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.shift_remove(field)
    }

    /// Iterate `(field, value)` pairs in capture order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field was captured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Field name to failure reason, rebuilt on every validation pass
///
/// An empty map means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(IndexMap<String, FieldError>);

impl ErrorMap {
    /// Create an empty error map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field
    ///
    /// A field keeps a single reason; recording it again replaces the reason
    /// but not the field's position.
    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.insert(field.into(), error);
    }

    /// Failure reason for a field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    /// Human-readable message for a field
    #[must_use]
    pub fn message(&self, field: &str) -> Option<String> {
        self.0.get(field).map(ToString::to_string)
    }

    /// Whether a field has a recorded failure
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// First field with an error, in recording order
    #[must_use]
    pub fn first_field(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }

    /// Iterate `(field, reason)` pairs in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names with errors, in recording order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of failing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field failed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_values_keep_capture_order() {
        let values = FormValues::new()
            .with("teamName", "X")
            .with("leaderName", "Ada")
            .with("teamName", "Y");

        let order: Vec<_> = values.iter().collect();
        assert_eq!(order, vec![("teamName", "Y"), ("leaderName", "Ada")]);
    }

    #[test]
    fn error_map_first_field_is_first_recorded() {
        let mut errors = ErrorMap::new();
        errors.insert("leaderEmail", FieldError::InvalidEmail);
        errors.insert("leaderName", FieldError::Required);

        assert_eq!(errors.first_field(), Some("leaderEmail"));
        assert_eq!(
            errors.message("leaderName").as_deref(),
            Some("This field is required")
        );
    }

    #[test]
    fn error_map_serializes_messages() {
        let mut errors = ErrorMap::new();
        errors.insert("teamName", FieldError::TooShort { min: 3 });

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"teamName":"Must be at least 3 characters"}"#);
    }

    #[test]
    fn form_values_json_is_flat_object() {
        let values = FormValues::new().with("teamName", "X");
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"teamName":"X"}"#);

        let back: FormValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
