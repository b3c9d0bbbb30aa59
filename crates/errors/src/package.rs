//! Artifact packaging error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PackageError {
    #[error("failed to copy {src} to {dest}: {message}")]
    CopyFailed {
        src: String,
        dest: String,
        message: String,
    },

    #[error("no artifacts matched {pattern} under {path}")]
    NoArtifacts { pattern: String, path: String },

    #[error("invalid artifact pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}
