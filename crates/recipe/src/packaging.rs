//! Artifact packaging
//!
//! Pure copy/selection into the canonical package layout: headers keep
//! their relative paths under `include/`, binary artifacts are flattened
//! into `lib/`. File contents are never transformed.

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tlmpkg_errors::{Error, PackageError};
use tracing::debug;

/// Copy headers from a source `include/` tree, preserving path structure
///
/// A missing source tree yields an empty set, not an error; strictness is
/// the executor's decision.
///
/// # Errors
///
/// Returns an error if a matched file cannot be copied.
pub async fn copy_headers(
    source_include: &Path,
    dest_include: &Path,
    patterns: &[&str],
) -> Result<Vec<PathBuf>, Error> {
    let matchers = build_matchers(patterns)?;
    let mut copied = Vec::new();

    for path in walk_files(source_include) {
        let Ok(relative) = path.strip_prefix(source_include) else {
            continue;
        };
        if !matches_name(&matchers, &path) {
            continue;
        }

        let dest = dest_include.join(relative);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        copy_file(&path, &dest).await?;
        copied.push(relative.to_path_buf());
    }

    copied.sort();
    debug!(count = copied.len(), "headers packaged");
    Ok(copied)
}

/// Copy binary artifacts matching one pattern into a flat `lib/` directory
///
/// Artifacts are collected from the whole tree at arbitrary nesting depth
/// and land directly under `dest_lib` with no subdirectories.
///
/// # Errors
///
/// Returns an error if a matched file cannot be copied.
pub async fn copy_artifacts(
    build_dir: &Path,
    dest_lib: &Path,
    pattern: &str,
) -> Result<Vec<PathBuf>, Error> {
    let matchers = build_matchers(&[pattern])?;
    let mut copied = Vec::new();

    for path in walk_files(build_dir) {
        if !matches_name(&matchers, &path) {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };

        tokio::fs::create_dir_all(dest_lib).await?;
        let dest = dest_lib.join(name);
        copy_file(&path, &dest).await?;
        copied.push(PathBuf::from(name));
    }

    copied.sort();
    copied.dedup();
    debug!(pattern, count = copied.len(), "artifacts packaged");
    Ok(copied)
}

fn build_matchers(patterns: &[&str]) -> Result<Vec<GlobMatcher>, Error> {
    patterns
        .iter()
        .map(|p| {
            Glob::new(p)
                .map(|g| g.compile_matcher())
                .map_err(|e| {
                    PackageError::InvalidPattern {
                        pattern: (*p).to_string(),
                        message: e.to_string(),
                    }
                    .into()
                })
        })
        .collect()
}

fn matches_name(matchers: &[GlobMatcher], path: &Path) -> bool {
    path.file_name()
        .map(Path::new)
        .is_some_and(|name| matchers.iter().any(|m| m.is_match(name)))
}

fn walk_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(Result::ok)
        .map(ignore::DirEntry::into_path)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

async fn copy_file(src: &Path, dest: &Path) -> Result<(), Error> {
    tokio::fs::copy(src, dest)
        .await
        .map_err(|e| PackageError::CopyFailed {
            src: src.display().to_string(),
            dest: dest.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(())
}
