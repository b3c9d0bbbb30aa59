#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package recipe executor for tlmpkg
//!
//! Drives the four-phase lifecycle for one native-library package:
//! configure (validate options, resolve dependencies, fix the backend),
//! build (dispatch to exactly one of the two backends), package (copy
//! headers and binary artifacts into the canonical layout), and
//! `package_info` (emit linkage metadata for downstream consumers).
//!
//! Each package build is an isolated, one-shot run. There is no retry,
//! no rollback, and no recovery; every error surfaces immediately to
//! the invoking driver.

mod backend;
mod exec;
mod executor;
mod model;
mod packaging;
mod parser;
mod resolver;

pub use backend::{Backend, CmakeBuild, SconsBuild};
pub use exec::CommandResult;
pub use executor::{BuildPaths, PackageInfo, PackageReport, RecipeExecutor};
pub use model::{Recipe, RecipeMetadata};
pub use packaging::{copy_artifacts, copy_headers};
pub use parser::{load_recipe, parse_recipe};
pub use resolver::{DependencyResolver, DirectoryResolver, ResolvedDependency};
