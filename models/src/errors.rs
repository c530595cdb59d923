// models/src/errors.rs

pub use thiserror::Error;

/// A validation error raised while building or re-validating a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were absent, null or empty.
    #[error("{entity} validation failed: missing required field(s): {}", .fields.join(", "))]
    MissingFields {
        entity: &'static str,
        fields: Vec<&'static str>,
    },
    /// A value outside of a closed enum was provided.
    #[error("{entity} validation failed: `{value}` is not a valid value for {field}, expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        entity: &'static str,
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    /// The merged document could not be cast back into its schema.
    #[error("{entity} validation failed: {reason}")]
    Malformed { entity: &'static str, reason: String },
}

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Collects missing required fields so that every omission is reported at once.
#[derive(Debug)]
pub struct Requirements {
    entity: &'static str,
    missing: Vec<&'static str>,
}

impl Requirements {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            missing: Vec::new(),
        }
    }

    /// Takes a required string. Absent and empty strings are both missing.
    pub fn string(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// Takes any other required value.
    pub fn value<T: Default>(&mut self, field: &'static str, value: Option<T>) -> T {
        match value {
            Some(value) => value,
            None => {
                self.missing.push(field);
                T::default()
            }
        }
    }

    /// Checks a string already stored on a document.
    pub fn check(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.missing.push(field);
        }
    }

    pub fn finish(self) -> ValidationResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                entity: self.entity,
                fields: self.missing,
            })
        }
    }
}
