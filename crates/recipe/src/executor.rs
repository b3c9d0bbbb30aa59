//! The four-phase package recipe executor

use crate::backend::{cache_defines, Backend};
use crate::model::Recipe;
use crate::packaging::{copy_artifacts, copy_headers};
use crate::resolver::{DependencyResolver, ResolvedDependency};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tlmpkg_errors::{BuildError, Error, PackageError};
use tlmpkg_types::{PackageId, Settings};
use tracing::{info, warn};

const HEADER_PATTERNS: &[&str] = &["*.hh", "*.h"];
const ARCHIVE_PATTERN: &str = "*.a";
const SHARED_PATTERN: &str = "*.so";

/// Directory layout of one package build
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// Source tree carrying `include/`, `src/`, and the build entry points
    pub source_dir: PathBuf,
    /// Out-of-source build tree used by the generator backend
    pub build_dir: PathBuf,
    /// Canonical package output tree (`include/` + `lib/`)
    pub package_dir: PathBuf,
}

impl BuildPaths {
    /// Create a layout with the default `<source>/build` build tree
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, package_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let build_dir = source_dir.join("build");
        Self {
            source_dir,
            build_dir,
            package_dir: package_dir.into(),
        }
    }

    /// Override the build tree location
    #[must_use]
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }
}

/// Files placed into the package output tree, relative to it
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageReport {
    pub headers: Vec<PathBuf>,
    pub archives: Vec<PathBuf>,
    pub shared_objects: Vec<PathBuf>,
}

impl PackageReport {
    /// Total number of packaged files
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.headers.len() + self.archives.len() + self.shared_objects.len()
    }
}

/// Linkage metadata published for downstream consumers
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    pub package: PackageId,
    pub libs: Vec<String>,
    pub settings: Settings,
    pub include_dir: PathBuf,
    pub lib_dir: PathBuf,
}

/// Drives configure, build, package, and publish-metadata for one recipe
///
/// Phases run strictly in order; calling a phase before its predecessor
/// has completed is a phase-order error. A failed build leaves the tree
/// in its post-failure state, there is no rollback.
pub struct RecipeExecutor {
    recipe: Recipe,
    paths: BuildPaths,
    strict: bool,
    run_tests: bool,
    backend_override: Option<Backend>,
    backend: Option<Backend>,
    resolved: Vec<ResolvedDependency>,
    built: bool,
}

impl RecipeExecutor {
    /// Create an executor for one recipe and directory layout
    #[must_use]
    pub fn new(recipe: Recipe, paths: BuildPaths) -> Self {
        Self {
            recipe,
            paths,
            strict: false,
            run_tests: false,
            backend_override: None,
            backend: None,
            resolved: Vec::new(),
            built: false,
        }
    }

    /// Fail packaging when an artifact pattern matches zero files
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable the generator backend's test step, disabled by default
    #[must_use]
    pub fn with_run_tests(mut self, run_tests: bool) -> Self {
        self.run_tests = run_tests;
        self
    }

    /// Replace the backend chosen at configure time
    ///
    /// Used by drivers and tests that point the build at stub tools.
    #[must_use]
    pub fn with_backend_override(mut self, backend: Backend) -> Self {
        self.backend_override = Some(backend);
        self
    }

    /// The recipe being executed
    #[must_use]
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Dependencies resolved during configure
    #[must_use]
    pub fn resolved_dependencies(&self) -> &[ResolvedDependency] {
        &self.resolved
    }

    /// Configure phase: resolve dependencies and fix the backend
    ///
    /// Dependencies are resolved exactly once and are immutable for the
    /// rest of the build. Option validation has already happened at
    /// recipe load, before any process could be spawned.
    ///
    /// # Errors
    ///
    /// Surfaces resolver errors verbatim.
    pub async fn configure(&mut self, resolver: &dyn DependencyResolver) -> Result<(), Error> {
        let mut resolved = Vec::with_capacity(self.recipe.requires.len());
        for reference in &self.recipe.requires {
            resolved.push(resolver.resolve(reference).await?);
        }
        self.resolved = resolved;

        let backend = match self.backend_override.take() {
            Some(backend) => backend,
            None => Backend::for_tool(self.recipe.options.build_tool),
        };
        info!(
            package = %self.recipe.package_id(),
            backend = backend.name(),
            dependencies = self.resolved.len(),
            "configured"
        );
        self.backend = Some(backend);
        Ok(())
    }

    /// Build phase: dispatch to exactly one backend
    ///
    /// # Errors
    ///
    /// Returns a phase-order error if `configure` has not run, a
    /// missing-entry-point error if the source tree lacks the backend's
    /// build file, and otherwise propagates the backend's failure.
    pub async fn build(&mut self) -> Result<(), Error> {
        let backend = self.backend.as_ref().ok_or(BuildError::PhaseOrder {
            phase: "build",
            required: "configure",
        })?;

        backend.check_entry_point(&self.paths.source_dir)?;

        match backend {
            Backend::Script(scons) => {
                scons.build(&self.paths.source_dir).await?;
            }
            Backend::Generator(cmake) => {
                let prefix_paths: Vec<String> = self
                    .resolved
                    .iter()
                    .map(|dep| dep.root.display().to_string())
                    .collect();
                let defines =
                    cache_defines(&self.recipe.options, &self.recipe.settings, &prefix_paths);
                cmake
                    .configure(&self.paths.source_dir, &self.paths.build_dir, &defines)
                    .await?;
                cmake.build(&self.paths.build_dir).await?;
                if self.run_tests {
                    cmake.test(&self.paths.build_dir).await?;
                }
            }
        }

        self.built = true;
        Ok(())
    }

    /// Package phase: copy artifacts into the canonical output tree
    ///
    /// Headers keep their relative paths under `include/`; archives and
    /// shared objects are flattened into `lib/`. An empty match set is
    /// logged as a warning, or rejected when strict mode is on.
    ///
    /// # Errors
    ///
    /// Returns a phase-order error if `build` has not completed, a
    /// `NoArtifacts` error in strict mode, or any copy failure.
    pub async fn package(&self) -> Result<PackageReport, Error> {
        if !self.built {
            return Err(BuildError::PhaseOrder {
                phase: "package",
                required: "build",
            }
            .into());
        }

        let headers = copy_headers(
            &self.paths.source_dir.join("include"),
            &self.paths.package_dir.join("include"),
            HEADER_PATTERNS,
        )
        .await?;

        let artifact_root = self.artifact_root();
        let dest_lib = self.paths.package_dir.join("lib");
        let archives = copy_artifacts(artifact_root, &dest_lib, ARCHIVE_PATTERN).await?;
        let shared_objects = copy_artifacts(artifact_root, &dest_lib, SHARED_PATTERN).await?;

        self.check_matches("*.hh, *.h", headers.len(), &self.paths.source_dir)?;
        self.check_matches(
            "*.a, *.so",
            archives.len() + shared_objects.len(),
            artifact_root,
        )?;

        let report = PackageReport {
            headers,
            archives,
            shared_objects,
        };
        info!(
            package = %self.recipe.package_id(),
            files = report.file_count(),
            dest = %self.paths.package_dir.display(),
            "packaged"
        );
        Ok(report)
    }

    /// Publish-metadata phase: emit linkage metadata
    ///
    /// Pure metadata, no I/O beyond returning the descriptor.
    #[must_use]
    pub fn package_info(&self) -> PackageInfo {
        PackageInfo {
            package: self.recipe.package_id(),
            libs: self.recipe.published_libs(),
            settings: self.recipe.settings.clone(),
            include_dir: self.paths.package_dir.join("include"),
            lib_dir: self.paths.package_dir.join("lib"),
        }
    }

    /// Run all four phases in order
    ///
    /// # Errors
    ///
    /// Propagates the first failing phase; later phases never run.
    pub async fn run(
        &mut self,
        resolver: &dyn DependencyResolver,
    ) -> Result<(PackageReport, PackageInfo), Error> {
        self.configure(resolver).await?;
        self.build().await?;
        let report = self.package().await?;
        Ok((report, self.package_info()))
    }

    /// Where binary artifacts are collected from: the script backend
    /// builds in the source tree, the generator backend in the build tree.
    fn artifact_root(&self) -> &Path {
        match &self.backend {
            Some(Backend::Script(_)) => &self.paths.source_dir,
            _ => &self.paths.build_dir,
        }
    }

    fn check_matches(&self, pattern: &str, count: usize, root: &Path) -> Result<(), Error> {
        if count > 0 {
            return Ok(());
        }
        if self.strict {
            return Err(PackageError::NoArtifacts {
                pattern: pattern.to_string(),
                path: root.display().to_string(),
            }
            .into());
        }
        warn!(pattern, root = %root.display(), "copy pattern matched zero files");
        Ok(())
    }
}
