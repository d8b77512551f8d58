//! Field-level validation shared by the write payloads.
//!
//! Payloads deserialize every field as [`Field<T>`] so that an absent key,
//! an explicit `null` and a value can be told apart. Partial updates overlay
//! the stored row underneath the payload and then run the same validation as
//! a full update.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A payload field: `None` when absent, `Some(None)` when `null`.
pub type Field<T> = Option<Option<T>>;

/// Deserialize a [`Field`], keeping explicit `null` distinct from absence.
///
/// Use together with `#[serde(default)]`.
///
/// # Errors
///
/// Propagates the inner deserializer's error.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Field<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Wrap a stored value so it can sit underneath a partial update.
pub fn stored<T>(value: T) -> Field<T> {
    Some(Some(value))
}

/// Wrap a stored optional value so it can sit underneath a partial update.
pub fn stored_opt<T>(value: Option<T>) -> Field<T> {
    Some(value)
}

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors with a single message against one field.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when no errors were recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed validation.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Validate a required, non-blank text field of at most `max` characters.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Field<String>,
    max: usize,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Some(text)) => {
            let text = text.trim();
            if text.is_empty() {
                errors.add(field, NOT_BLANK);
                return None;
            }
            check_length(errors, field, text, max)
        }
    }
}

/// Validate an optional text field. Blank strings are stored as `NULL`.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Field<String>,
    max: Option<usize>,
) -> Option<String> {
    let text = value.flatten()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match max {
        Some(max) => check_length(errors, field, text, max),
        None => Some(text.to_owned()),
    }
}

/// Validate a required value with no further constraints.
pub fn required<T>(errors: &mut FieldErrors, field: &str, value: Field<T>) -> Option<T> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Some(v)) => Some(v),
    }
}

/// Validate a non-nullable value that falls back to `default` when absent.
pub fn with_default<T>(errors: &mut FieldErrors, field: &str, value: Field<T>, default: T) -> Option<T> {
    match value {
        None => Some(default),
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Some(v)) => Some(v),
    }
}

fn check_length(errors: &mut FieldErrors, field: &str, text: &str, max: usize) -> Option<String> {
    if text.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
        return None;
    }
    Some(text.to_owned())
}
