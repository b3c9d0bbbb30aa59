//! Dependency resolution interface
//!
//! Resolution is a capability supplied by the surrounding driver: the
//! executor only asks for "a located artifact for name/version@origin"
//! and never depends on a specific resolution mechanism.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tlmpkg_errors::{Error, ResolveError};
use tlmpkg_types::DependencyRef;
use tracing::debug;

/// A dependency located on the local filesystem
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub reference: DependencyRef,
    /// Root of the located package tree
    pub root: PathBuf,
}

impl ResolvedDependency {
    /// Conventional header directory of the located package
    #[must_use]
    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    /// Conventional library directory of the located package
    #[must_use]
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }
}

/// Capability interface for locating declared dependencies
#[async_trait]
pub trait DependencyResolver: Send + Sync {
    /// Locate one declared dependency
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` if the dependency cannot be located.
    async fn resolve(&self, reference: &DependencyRef) -> Result<ResolvedDependency, Error>;
}

/// Resolver that locates packages under `<root>/<name>/<version>`
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DependencyResolver for DirectoryResolver {
    async fn resolve(&self, reference: &DependencyRef) -> Result<ResolvedDependency, Error> {
        let root = self
            .root
            .join(&reference.name)
            .join(reference.version.to_string());

        if !root.is_dir() {
            return Err(ResolveError::NotFound {
                name: reference.name.clone(),
                version: reference.version.to_string(),
                origin: reference.origin.clone(),
            }
            .into());
        }

        debug!(dependency = %reference, root = %root.display(), "dependency resolved");
        Ok(ResolvedDependency {
            reference: reference.clone(),
            root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlmpkg_types::Version;

    fn reference() -> DependencyRef {
        DependencyRef::new("systemc", Version::parse("2.3.3").unwrap(), "syssim/stable")
    }

    #[tokio::test]
    async fn test_resolves_existing_package() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("systemc").join("2.3.3");
        std::fs::create_dir_all(&root).unwrap();

        let resolver = DirectoryResolver::new(temp.path());
        let resolved = resolver.resolve(&reference()).await.unwrap();
        assert_eq!(resolved.root, root);
        assert_eq!(resolved.include_dir(), root.join("include"));
        assert_eq!(resolved.lib_dir(), root.join("lib"));
    }

    #[tokio::test]
    async fn test_missing_package_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(temp.path());
        let err = resolver.resolve(&reference()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Resolve(ResolveError::NotFound { .. })
        ));
    }
}
