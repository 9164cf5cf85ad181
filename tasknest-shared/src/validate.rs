//! Ordered field-level validation errors.
//!
//! Validators collect `{field, message}` pairs in insertion order so the API
//! layer can render them back to the client in a stable sequence. Validation
//! failures are user-correctable and kept strictly separate from
//! infrastructure errors (`StoreError` and friends).

use serde::{Deserialize, Serialize};

/// A single validation failure tied to a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field the failure refers to (snake_case, matches the request payload)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

/// Ordered collection of validation failures.
///
/// Preserves insertion order so repeated validation of the same input yields
/// the same sequence of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Errors(Vec<FieldError>);

impl Errors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a failure for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Adds a presence failure when `value` is empty or whitespace-only.
    ///
    /// Returns whether the value was present, so callers can skip dependent
    /// checks (e.g. uniqueness) for blank input.
    pub fn check_presence(
        &mut self,
        field: impl Into<String>,
        value: &str,
        message: impl Into<String>,
    ) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            false
        } else {
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates failures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl IntoIterator for Errors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
