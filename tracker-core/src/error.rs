use std::fmt;

use indexmap::IndexMap;

/// Errors produced by the `tracker-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// One or more input fields failed validation.
    #[error("{0}")]
    Validation(ValidationErrors),
}

/// Field validation failures in the order they were detected.
///
/// Only the first message per field is kept. [`Display`](fmt::Display)
/// renders the first failure, which is what clients get to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: IndexMap<&'static str, String>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field` unless one is already recorded.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// Records a "required" failure for `field`.
    pub fn required(&mut self, field: &'static str) {
        self.push(field, format!("Path `{field}` is required."));
    }

    /// Records a failed cast of `value` for `field`.
    pub fn cast(&mut self, field: &'static str, kind: &str, value: &str) {
        self.push(
            field,
            format!("Cast to {kind} failed for value \"{value}\" at path \"{field}\""),
        );
    }

    /// Returns the first recorded `(field, message)` pair.
    #[must_use]
    pub fn first(&self) -> Option<(&'static str, &str)> {
        self.errors.first().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Returns the message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `Ok(value)` when nothing was recorded.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] carrying `self` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, CoreError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some((_, message)) => f.write_str(message),
            None => f.write_str("validation failed"),
        }
    }
}
