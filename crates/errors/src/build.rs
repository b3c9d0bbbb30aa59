//! Build backend error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("{program} exited with {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("configure failed: {message}")]
    ConfigureFailed { message: String },

    #[error("compile failed: {message}")]
    CompileFailed { message: String },

    #[error("tests failed: {message}")]
    TestsFailed { message: String },

    #[error("missing build entry point {entry} in {path}")]
    MissingEntryPoint { entry: String, path: String },

    #[error("phase order violation: {phase} called before {required}")]
    PhaseOrder {
        phase: &'static str,
        required: &'static str,
    },
}
