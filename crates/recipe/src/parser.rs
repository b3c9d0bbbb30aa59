//! TOML recipe parser with validation

use crate::model::Recipe;
use std::path::Path;
use tlmpkg_errors::{ConfigError, Error};
use tracing::debug;

/// Parse a recipe from a file
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The TOML is invalid or contains unknown fields
/// - An option value falls outside its enumerated domain
/// - Validation fails
pub async fn load_recipe(path: &Path) -> Result<Recipe, Error> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ParseError {
                message: format!("failed to read recipe: {e}"),
            },
        })?;

    let recipe = parse_recipe(&content)?;
    debug!(recipe = %recipe.package_id(), path = %path.display(), "recipe loaded");
    Ok(recipe)
}

/// Parse a recipe from a string
///
/// # Errors
///
/// Returns an error if the TOML is invalid, any option value is outside
/// its domain, or validation fails.
pub fn parse_recipe(content: &str) -> Result<Recipe, Error> {
    let recipe: Recipe = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse TOML: {e}"),
    })?;

    validate_recipe(&recipe)?;
    Ok(recipe)
}

/// Validate a parsed recipe
fn validate_recipe(recipe: &Recipe) -> Result<(), Error> {
    if recipe.package.name.is_empty() {
        return Err(ConfigError::MissingField {
            field: "package.name".to_string(),
        }
        .into());
    }

    if recipe.libs.iter().any(String::is_empty) {
        return Err(ConfigError::InvalidValue {
            field: "libs".to_string(),
            value: String::new(),
            expected: "non-empty library names".to_string(),
        }
        .into());
    }

    if recipe.exports_sources.iter().any(String::is_empty) {
        return Err(ConfigError::InvalidValue {
            field: "exports_sources".to_string(),
            value: String::new(),
            expected: "non-empty glob patterns".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlmpkg_types::{BuildTool, PackagingMode};

    // Top-level keys come before the first table per TOML rules
    const RECIPE: &str = r#"
requires = [
    "systemc/2.3.3@syssim/stable",
    "gem5/1.0@demo/testing",
]
libs = ["gem5_wrapper"]

[package]
name = "gem5_wrapper"
version = "1.0.0"
description = "Gem5 TLM wrapper"
license = "Proprietary"

[settings]
os = "linux"
compiler = "gcc"
build_type = "release"
arch = "x86_64"

[options]
fpic = true
shared = true
packaging = "off"
build_tool = "cmake"
"#;

    #[test]
    fn test_parse_full_recipe() {
        let recipe = parse_recipe(RECIPE).unwrap();
        assert_eq!(recipe.package.name, "gem5_wrapper");
        assert_eq!(recipe.options.build_tool, BuildTool::Cmake);
        assert_eq!(recipe.options.packaging, PackagingMode::Off);
        assert_eq!(recipe.requires.len(), 2);
        assert_eq!(recipe.requires[0].name, "systemc");
        assert_eq!(recipe.requires[1].origin, "demo/testing");
        assert_eq!(recipe.published_libs(), vec!["gem5_wrapper".to_string()]);
        // The default export set ships both build entry points
        assert!(recipe.exports_sources.contains(&"SConstruct".to_string()));
        assert!(recipe
            .exports_sources
            .contains(&"CMakeLists.txt".to_string()));
    }

    #[test]
    fn test_defaults_when_options_omitted() {
        let recipe = parse_recipe(
            r#"
[package]
name = "gem5_wrapper"
version = "1.0.0"

[settings]
os = "linux"
compiler = "gcc"
build_type = "release"
arch = "x86_64"
"#,
        )
        .unwrap();
        assert!(recipe.options.fpic);
        assert!(recipe.options.shared);
        assert_eq!(recipe.options.build_tool, BuildTool::Cmake);
        assert!(recipe.requires.is_empty());
    }

    #[test]
    fn test_rejects_unknown_build_tool() {
        let bad = RECIPE.replace("\"cmake\"", "\"ninja\"");
        let err = parse_recipe(&bad).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_option_key() {
        let bad = RECIPE.replace("fpic = true", "fpic = true\nlto = true");
        assert!(parse_recipe(&bad).is_err());
    }

    #[test]
    fn test_rejects_malformed_dependency() {
        let bad = RECIPE.replace("gem5/1.0@demo/testing", "gem5");
        assert!(parse_recipe(&bad).is_err());
    }

    #[test]
    fn test_rejects_empty_lib_name() {
        let bad = RECIPE.replace("libs = [\"gem5_wrapper\"]", "libs = [\"\"]");
        assert!(matches!(
            parse_recipe(&bad).unwrap_err(),
            Error::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
