//! Dependency resolution error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("dependency not found: {name}/{version}@{origin}")]
    NotFound {
        name: String,
        version: String,
        origin: String,
    },

    #[error("resolver failure for {name}: {message}")]
    ResolverFailure { name: String, message: String },
}
