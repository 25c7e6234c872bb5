//! Error types for domain construction and parsing

use thiserror::Error;

/// Construction-time validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error when parsing a vocabulary string into one of the domain enums.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {vocabulary}: {value}")]
pub struct ParseEnumError {
    pub vocabulary: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(vocabulary: &'static str, value: impl Into<String>) -> Self {
        Self {
            vocabulary,
            value: value.into(),
        }
    }
}

/// Result type alias for domain construction.
pub type CoreResult<T> = Result<T, ValidationError>;
