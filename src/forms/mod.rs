//! Form parsing and validation.
//!
//! Forms deserialize from `application/x-www-form-urlencoded` bodies with every
//! field optional, then validate into either a clean value or a set of
//! per-field error messages that the page re-renders next to the inputs.

mod note_form;
mod user_forms;

use std::collections::BTreeMap;

pub use note_form::{NoteForm, WARNING};
pub use user_forms::{LoginForm, NewAccount, SignupForm, MIN_PASSWORD_LENGTH, USERNAME_TAKEN};

pub(crate) const REQUIRED: &str = "This field is required.";

/// Outcome of validating a form against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(FormErrors),
}

/// Error messages keyed by field name, plus errors not tied to any field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Messages attached to `field`, empty if it has none
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_field(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Finish validation: `Valid(value)` if no errors were recorded
    pub fn into_validated<T>(self, value: T) -> Validated<T> {
        if self.is_empty() {
            Validated::Valid(value)
        } else {
            Validated::Invalid(self)
        }
    }
}

/// Length message for a field over its limit
pub(crate) fn too_long(max: usize, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        max, actual
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_errors_collect_per_field() {
        let mut errors = FormErrors::new();
        assert!(errors.is_empty());

        errors.add("slug", "taken");
        errors.add("slug", "too long");
        errors.add_non_field("bad login");

        assert_eq!(errors.field("slug"), ["taken", "too long"]);
        assert!(errors.field("title").is_empty());
        assert!(errors.has_field("slug"));
        assert_eq!(errors.non_field(), ["bad login"]);
    }

    #[test]
    fn test_into_validated() {
        assert_eq!(FormErrors::new().into_validated(5), Validated::Valid(5));

        let mut errors = FormErrors::new();
        errors.add("title", REQUIRED);
        assert!(matches!(errors.into_validated(5), Validated::Invalid(_)));
    }
}
