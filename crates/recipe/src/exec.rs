//! Blocking child-process execution for build backends

use std::path::Path;
use tlmpkg_errors::{BuildError, Error};
use tokio::process::Command;
use tracing::debug;

/// Outcome of one backend command
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run a build tool to completion and capture its output
///
/// The child's exit status is propagated unchanged in the result; callers
/// decide which phase-specific error a failure maps to. No timeout and no
/// cancellation, matching the one-shot nature of a package build.
///
/// # Errors
///
/// Returns an error only if the process cannot be spawned.
pub async fn run_command(
    program: &str,
    args: &[&str],
    working_dir: &Path,
) -> Result<CommandResult, Error> {
    debug!(
        program,
        args = args.join(" "),
        cwd = %working_dir.display(),
        "executing build command"
    );

    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .output()
        .await
        .map_err(|e| BuildError::SpawnFailed {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    let result = CommandResult {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!(
        program,
        success = result.success,
        exit_code = ?result.exit_code,
        "build command finished"
    );

    Ok(result)
}

impl CommandResult {
    /// Convert a failed result into a `CommandFailed` error
    #[must_use]
    pub fn failure(&self, program: &str) -> BuildError {
        BuildError::CommandFailed {
            program: program.to_string(),
            code: self.exit_code,
            stderr: self.stderr.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let err = run_command("definitely-not-a-real-tool", &[], Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::SpawnFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_propagates() {
        let result = run_command("sh", &["-c", "echo out; echo err >&2; exit 3"], Path::new("."))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "err");
    }
}
