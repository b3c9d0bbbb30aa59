//! Recipe configuration error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("recipe file not found: {path}")]
    NotFound { path: String },

    #[error("recipe parse error: {message}")]
    ParseError { message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {value} (expected one of {expected})")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("invalid version: {message}")]
    InvalidVersion { message: String },

    #[error("invalid dependency reference: {input} (expected name/version@origin)")]
    InvalidDependency { input: String },
}
