#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared type definitions for tlmpkg
//!
//! Recipe metadata, platform settings, validated build options, and
//! dependency references. Option values are drawn from fixed enumerated
//! domains; anything outside a domain is rejected at parse time, before
//! any build action can run.

pub mod dependency;
pub mod options;
pub mod settings;

pub use dependency::DependencyRef;
pub use options::{BuildTool, BuildType, Options, PackagingMode};
pub use semver::Version;
pub use settings::Settings;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    pub version: Version,
}

impl PackageId {
    /// Create a new package ID
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}
