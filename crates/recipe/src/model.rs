//! Recipe document model

use serde::{Deserialize, Serialize};
use tlmpkg_types::{DependencyRef, Options, PackageId, Settings, Version};

/// One package-build recipe
///
/// Constructed from declared metadata at recipe load and immutable for
/// the duration of a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    /// Package identity and provenance
    pub package: RecipeMetadata,
    /// Target platform triple
    pub settings: Settings,
    /// Build options, all drawn from fixed enumerated domains
    #[serde(default)]
    pub options: Options,
    /// Declared external dependencies, `name/version@origin`
    #[serde(default)]
    pub requires: Vec<DependencyRef>,
    /// Source patterns the recipe ships verbatim to the build
    #[serde(default = "default_exports_sources")]
    pub exports_sources: Vec<String>,
    /// Linkable library names published by `package_info`
    ///
    /// Empty means "publish the package name itself".
    #[serde(default)]
    pub libs: Vec<String>,
}

/// Identity block of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeMetadata {
    pub name: String,
    pub version: Version,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Recipe {
    /// Identifier of the package this recipe builds
    #[must_use]
    pub fn package_id(&self) -> PackageId {
        PackageId::new(self.package.name.clone(), self.package.version.clone())
    }

    /// Library names exposed to downstream consumers
    #[must_use]
    pub fn published_libs(&self) -> Vec<String> {
        if self.libs.is_empty() {
            vec![self.package.name.clone()]
        } else {
            self.libs.clone()
        }
    }
}

fn default_exports_sources() -> Vec<String> {
    vec![
        "include/*".to_string(),
        "src/*".to_string(),
        "SConstruct".to_string(),
        "CMakeLists.txt".to_string(),
    ]
}
