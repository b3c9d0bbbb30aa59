#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for tlmpkg
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling across phases.

use thiserror::Error;

pub mod build;
pub mod config;
pub mod package;
pub mod resolve;

// Re-export all error types at the root
pub use build::BuildError;
pub use config::ConfigError;
pub use package::PackageError;
pub use resolve::ResolveError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("package error: {0}")]
    Package(#[from] PackageError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<semver::Error> for Error {
    fn from(err: semver::Error) -> Self {
        Self::Config(ConfigError::InvalidVersion {
            message: err.to_string(),
        })
    }
}

/// Result type alias for tlmpkg operations
pub type Result<T> = std::result::Result<T, Error>;
