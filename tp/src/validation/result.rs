//! Validation outcome types

use std::collections::BTreeMap;
use std::fmt;

/// Field keys used in validation errors
pub mod field {
    pub const TITLE: &str = "title";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const REGION: &str = "region";
    pub const PREFECTURE: &str = "prefecture";
    pub const SPOTS: &str = "spots";
    pub const CUSTOM_SPOTS: &str = "custom_spots";
}

/// Outcome of validating one step
///
/// Success when no field has an error. Only the first message per field is
/// kept, so a form shows one inline error per input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    /// A passing result
    pub fn ok() -> Self {
        Self::default()
    }

    /// A failing result with a single field error
    pub fn with_error(field: &str, message: impl Into<String>) -> Self {
        let mut result = Self::ok();
        result.add_error(field, message);
        result
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error for a field unless one is already present
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Error message for a field, if any
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// All field errors, ordered by field name
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Fold another result's errors into this one
    pub fn merge(&mut self, other: ValidationResult) {
        for (field, message) in other.errors {
            self.errors.entry(field).or_insert(message);
        }
    }

    /// Convert into a Result, failing when any field has an error
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.is_valid() { Ok(()) } else { Err(ValidationFailure(self)) }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "ok");
        }
        let parts: Vec<String> = self.errors.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A rejected step, carrying the field errors that caused it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {0}")]
pub struct ValidationFailure(pub ValidationResult);

impl ValidationFailure {
    pub fn result(&self) -> &ValidationResult {
        &self.0
    }
}
