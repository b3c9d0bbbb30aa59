//! Build option definitions
//!
//! Every option value belongs to a fixed enumerated domain. Serde rejects
//! out-of-domain values when a recipe is loaded, and `FromStr` rejects them
//! when an option arrives via the command line, so validation always happens
//! before a backend process is spawned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tlmpkg_errors::ConfigError;

/// Build backend selector: script-based or generator-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    /// Generator backend: cmake configure followed by a compile step
    Cmake,
    /// Script backend: a single scons invocation
    Scons,
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cmake => write!(f, "cmake"),
            Self::Scons => write!(f, "scons"),
        }
    }
}

impl FromStr for BuildTool {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cmake" => Ok(Self::Cmake),
            "scons" => Ok(Self::Scons),
            other => Err(ConfigError::InvalidValue {
                field: "build_tool".to_string(),
                value: other.to_string(),
                expected: "cmake, scons".to_string(),
            }),
        }
    }
}

/// Package-bundling mode flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingMode {
    On,
    Off,
}

impl PackagingMode {
    /// Render as a cmake cache value
    #[must_use]
    pub fn cmake_value(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for PackagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// Build configuration of the platform triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
}

impl BuildType {
    /// Render as a `CMAKE_BUILD_TYPE` value
    #[must_use]
    pub fn cmake_name(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cmake_name())
    }
}

/// The validated option set for one package build
///
/// Defaults mirror the recipe's declared defaults: position-independent
/// code on, shared library on, bundling off, cmake backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Options {
    /// Position-independent-code flag
    pub fpic: bool,
    /// Shared (`.so`) vs static (`.a`) output
    pub shared: bool,
    /// Package-bundling mode flag
    pub packaging: PackagingMode,
    /// Chosen build backend
    pub build_tool: BuildTool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fpic: true,
            shared: true,
            packaging: PackagingMode::Off,
            build_tool: BuildTool::Cmake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tool_parse() {
        assert_eq!(BuildTool::from_str("cmake").unwrap(), BuildTool::Cmake);
        assert_eq!(BuildTool::from_str("scons").unwrap(), BuildTool::Scons);
        assert!(matches!(
            BuildTool::from_str("ninja"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_options_defaults() {
        let opts = Options::default();
        assert!(opts.fpic);
        assert!(opts.shared);
        assert_eq!(opts.packaging, PackagingMode::Off);
        assert_eq!(opts.build_tool, BuildTool::Cmake);
    }

    #[test]
    fn test_build_type_cmake_name() {
        assert_eq!(BuildType::Release.cmake_name(), "Release");
        assert_eq!(BuildType::RelWithDebInfo.cmake_name(), "RelWithDebInfo");
    }
}
