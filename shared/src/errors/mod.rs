//! Shared error types

use thiserror::Error;

/// Configuration and bootstrap errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Value out of range for {field} (min: {min}, max: {max}, actual: {actual})")]
    OutOfRange {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Unknown country code: {code}")]
    UnknownCountry { code: String },

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

/// Result type with ConfigError as error
pub type ConfigResult<T> = Result<T, ConfigError>;
