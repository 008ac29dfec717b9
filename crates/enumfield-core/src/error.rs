//! Core error types for the enumfield crates.
//!
//! This module provides [`EnumError`], which covers registry construction,
//! value conversion, lookup preparation, configuration, and serialization
//! failures, plus [`ValidationError`] for field-level validation.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with an optional set of parameters.
///
/// Mirrors Django's `ValidationError`: a human message plus a short code
/// (`"null"`, `"blank"`, `"invalid_choice"`, ...) that callers can match on.
///
/// # Examples
///
/// ```
/// use enumfield_core::error::ValidationError;
///
/// let err = ValidationError::new("This field cannot be null.", "null");
/// assert_eq!(err.code, "null");
///
/// let err = ValidationError::new("Value 9 is not a valid choice.", "invalid_choice")
///     .with_param("value", "9");
/// assert_eq!(err.params["value"], "9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure.
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for enumerations and enum fields.
#[derive(Error, Debug)]
pub enum EnumError {
    // ── Definition ───────────────────────────────────────────────────

    /// An item was declared with an unusable slug or display label.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Two items in one enumeration share a value.
    #[error("Duplicate value {value} in enumeration {enumeration}")]
    DuplicateValue {
        /// The enumeration being built.
        enumeration: String,
        /// The repeated value.
        value: i64,
    },

    /// Two items in one enumeration share a slug.
    #[error("Duplicate slug '{slug}' in enumeration {enumeration}")]
    DuplicateSlug {
        /// The enumeration being built.
        enumeration: String,
        /// The repeated slug.
        slug: String,
    },

    /// An operation needed at least one item but the enumeration has none.
    #[error("Enumeration {0} has no items")]
    EmptyEnumeration(String),

    // ── Conversion ───────────────────────────────────────────────────

    /// No item carries the requested value.
    #[error("{enumeration} has no item with value {value}")]
    UnknownValue {
        /// The enumeration searched.
        enumeration: String,
        /// The requested value.
        value: i64,
    },

    /// No item carries the requested slug.
    #[error("{enumeration} has no item with slug '{slug}'")]
    UnknownSlug {
        /// The enumeration searched.
        enumeration: String,
        /// The requested slug.
        slug: String,
    },

    /// A value of a kind that can never represent an item.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A lookup the enum field cannot prepare.
    #[error("Lookup type '{0}' not supported.")]
    UnsupportedLookup(String),

    // ── Validation ───────────────────────────────────────────────────

    /// Field validation failed.
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EnumError {
    /// Returns a short, stable code for this error.
    ///
    /// Codes follow the validation-code convention so form layers can map
    /// conversion failures onto field errors:
    ///
    /// - `UnknownValue`, `UnknownSlug`, `InvalidValue` -> `"invalid_choice"`
    /// - `ValidationError` -> the inner code
    /// - definition errors -> `"improperly_configured"`
    /// - everything else -> `"error"`
    pub fn code(&self) -> &str {
        match self {
            Self::UnknownValue { .. } | Self::UnknownSlug { .. } | Self::InvalidValue(_) => {
                "invalid_choice"
            }
            Self::ValidationError(err) => &err.code,
            Self::InvalidItem(_)
            | Self::DuplicateValue { .. }
            | Self::DuplicateSlug { .. }
            | Self::EmptyEnumeration(_)
            | Self::ConfigurationError(_) => "improperly_configured",
            Self::UnsupportedLookup(_) | Self::SerializationError(_) | Self::IoError(_) => "error",
        }
    }

    /// Converts a conversion failure into a field [`ValidationError`].
    pub fn into_validation_error(self) -> ValidationError {
        match self {
            Self::ValidationError(err) => err,
            other => {
                let code = other.code().to_string();
                ValidationError::new(other.to_string(), code)
            }
        }
    }
}

/// A convenience type alias for `Result<T, EnumError>`.
pub type EnumResult<T> = Result<T, EnumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("This field cannot be blank.", "blank");
        assert_eq!(err.to_string(), "This field cannot be blank.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Bad.", "invalid_choice").with_param("value", "3");
        assert_eq!(err.params.get("value").unwrap(), "3");
    }

    #[test]
    fn test_unsupported_lookup_display() {
        let err = EnumError::UnsupportedLookup("contains".into());
        assert_eq!(err.to_string(), "Lookup type 'contains' not supported.");
    }

    #[test]
    fn test_duplicate_value_display() {
        let err = EnumError::DuplicateValue {
            enumeration: "Color".into(),
            value: 1,
        };
        assert_eq!(err.to_string(), "Duplicate value 1 in enumeration Color");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EnumError::UnknownValue {
                enumeration: "Color".into(),
                value: 9
            }
            .code(),
            "invalid_choice"
        );
        assert_eq!(EnumError::InvalidItem("x".into()).code(), "improperly_configured");
        assert_eq!(EnumError::UnsupportedLookup("x".into()).code(), "error");
        assert_eq!(
            EnumError::ValidationError(ValidationError::new("x", "null")).code(),
            "null"
        );
    }

    #[test]
    fn test_into_validation_error() {
        let err = EnumError::UnknownSlug {
            enumeration: "Color".into(),
            slug: "mauve".into(),
        }
        .into_validation_error();
        assert_eq!(err.code, "invalid_choice");
        assert!(err.message.contains("mauve"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: EnumError = io_err.into();
        assert_eq!(err.code(), "error");
        assert!(err.to_string().contains("file missing"));
    }
}
