//! Dependency reference types

use semver::Version;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tlmpkg_errors::ConfigError;

/// Reference to an external package, written `name/version@origin`
///
/// Resolved once before a build through the resolver interface; immutable
/// afterwards for the duration of that build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRef {
    pub name: String,
    pub version: Version,
    pub origin: String,
}

impl DependencyRef {
    /// Create a new dependency reference
    pub fn new(name: impl Into<String>, version: Version, origin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version,
            origin: origin.into(),
        }
    }
}

impl FromStr for DependencyRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidDependency {
            input: s.to_string(),
        };

        let (spec, origin) = s.split_once('@').ok_or_else(invalid)?;
        let (name, version) = spec.split_once('/').ok_or_else(invalid)?;
        if name.is_empty() || origin.is_empty() {
            return Err(invalid());
        }

        let version = lenient_version(version).ok_or_else(invalid)?;

        Ok(Self {
            name: name.to_string(),
            version,
            origin: origin.to_string(),
        })
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.name, self.version, self.origin)
    }
}

impl Serialize for DependencyRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DependencyRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Parse a version, padding missing minor/patch components
///
/// Upstream registries commonly publish two-component versions like `1.0`
/// or `2.3.3`; semver requires all three.
fn lenient_version(s: &str) -> Option<Version> {
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }
    match s.split('.').count() {
        1 => Version::parse(&format!("{s}.0.0")).ok(),
        2 => Version::parse(&format!("{s}.0")).ok(),
        _ => None,
    }
}
