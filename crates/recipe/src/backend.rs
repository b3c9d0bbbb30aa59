//! Build backend dispatch
//!
//! Exactly one of two mutually exclusive backends runs per package build:
//! the script backend (a single scons invocation) or the generator backend
//! (cmake configure followed by a compile step). The choice is fixed at
//! configure time as a two-variant sum type and never re-decided mid-build.

use crate::exec::run_command;
use std::path::Path;
use tlmpkg_errors::{BuildError, Error};
use tlmpkg_types::{BuildTool, Options, Settings};
use tracing::info;

/// Fixed parallelism hint passed opaquely to the script backend's own
/// job scheduler.
const SCONS_JOBS: &str = "-j4";

/// The backend selected for one build
#[derive(Debug, Clone)]
pub enum Backend {
    /// Script-based build tool, invoked once in the source tree
    Script(SconsBuild),
    /// Native build-file generator plus compile step, in a build tree
    Generator(CmakeBuild),
}

impl Backend {
    /// Select the backend variant for a configured build tool
    #[must_use]
    pub fn for_tool(tool: BuildTool) -> Self {
        match tool {
            BuildTool::Scons => Self::Script(SconsBuild::new()),
            BuildTool::Cmake => Self::Generator(CmakeBuild::new()),
        }
    }

    /// Backend name for diagnostics
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Script(_) => "scons",
            Self::Generator(_) => "cmake",
        }
    }

    /// Build-file entry point this backend expects in the source tree
    #[must_use]
    pub fn entry_point(&self) -> &'static str {
        match self {
            Self::Script(_) => "SConstruct",
            Self::Generator(_) => "CMakeLists.txt",
        }
    }

    /// Check that the source tree carries this backend's entry point
    ///
    /// # Errors
    ///
    /// Returns `MissingEntryPoint` if the build file is absent.
    pub fn check_entry_point(&self, source_dir: &Path) -> Result<(), Error> {
        if source_dir.join(self.entry_point()).exists() {
            Ok(())
        } else {
            Err(BuildError::MissingEntryPoint {
                entry: self.entry_point().to_string(),
                path: source_dir.display().to_string(),
            }
            .into())
        }
    }
}

/// Script backend: one scons run in the source tree
#[derive(Debug, Clone)]
pub struct SconsBuild {
    program: String,
}

impl SconsBuild {
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "scons".to_string(),
        }
    }

    /// Override the invoked program (used by tests with stub tools)
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run the script build with the fixed parallelism hint
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or exits non-zero.
    pub async fn build(&self, source_dir: &Path) -> Result<(), Error> {
        info!(program = %self.program, "running script-backend build");
        let result = run_command(&self.program, &[SCONS_JOBS], source_dir).await?;
        if !result.success {
            return Err(result.failure(&self.program).into());
        }
        Ok(())
    }
}

impl Default for SconsBuild {
    fn default() -> Self {
        Self::new()
    }
}

/// Generator backend: cmake configure, compile, and an optional test step
#[derive(Debug, Clone)]
pub struct CmakeBuild {
    program: String,
    test_program: String,
}

impl CmakeBuild {
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "cmake".to_string(),
            test_program: "ctest".to_string(),
        }
    }

    /// Override the invoked programs (used by tests with stub tools)
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_test_program(mut self, program: impl Into<String>) -> Self {
        self.test_program = program.into();
        self
    }

    /// Generate native build files for the resolved source directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigureFailed` if the generator exits non-zero.
    pub async fn configure(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        defines: &[String],
    ) -> Result<(), Error> {
        tokio::fs::create_dir_all(build_dir).await?;

        let source = source_dir.display().to_string();
        let mut args = vec![source.as_str()];
        args.extend(defines.iter().map(String::as_str));

        info!(program = %self.program, build_dir = %build_dir.display(), "running generator configure");
        let result = run_command(&self.program, &args, build_dir).await?;
        if !result.success {
            return Err(BuildError::ConfigureFailed {
                message: format!("cmake configuration failed: {}", result.stderr),
            }
            .into());
        }
        Ok(())
    }

    /// Compile the generated build
    ///
    /// # Errors
    ///
    /// Returns `CompileFailed` if the compile step exits non-zero.
    pub async fn build(&self, build_dir: &Path) -> Result<(), Error> {
        info!(program = %self.program, "running generator-backend compile");
        let result = run_command(&self.program, &["--build", "."], build_dir).await?;
        if !result.success {
            return Err(BuildError::CompileFailed {
                message: format!("cmake build failed: {}", result.stderr),
            }
            .into());
        }
        Ok(())
    }

    /// Run the test suite of the generated build
    ///
    /// Disabled by default in the executor; kept wired so it can be
    /// reinstated per recipe run.
    ///
    /// # Errors
    ///
    /// Returns `TestsFailed` if the test runner exits non-zero.
    pub async fn test(&self, build_dir: &Path) -> Result<(), Error> {
        info!(program = %self.test_program, "running generator-backend tests");
        let result = run_command(&self.test_program, &["--output-on-failure"], build_dir).await?;
        if !result.success {
            return Err(BuildError::TestsFailed {
                message: result.stderr,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for CmakeBuild {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache defines the generator backend derives from the option set
///
/// Resolved dependency roots are surfaced through `CMAKE_PREFIX_PATH` so
/// the wrapped library's own build files can locate them.
#[must_use]
pub fn cache_defines(options: &Options, settings: &Settings, prefix_paths: &[String]) -> Vec<String> {
    let on_off = |v: bool| if v { "ON" } else { "OFF" };

    let mut defines = vec![
        format!("-DCMAKE_BUILD_TYPE={}", settings.build_type.cmake_name()),
        format!("-DCMAKE_POSITION_INDEPENDENT_CODE={}", on_off(options.fpic)),
        format!("-DBUILD_SHARED_LIBS={}", on_off(options.shared)),
        format!("-DCONANPKG={}", options.packaging.cmake_value()),
    ];

    if !prefix_paths.is_empty() {
        defines.push(format!("-DCMAKE_PREFIX_PATH={}", prefix_paths.join(";")));
    }

    defines
}
