//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// tlmpkg - build and package one native simulation-library wrapper
///
/// A single "build this package" command: configure, build, package,
/// publish-metadata, driven by a TOML recipe. Meant to be invoked by a
/// surrounding package-build driver rather than end users directly.
#[derive(Parser)]
#[command(name = "tlmpkg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Native-library package recipe executor")]
pub struct Cli {
    /// Recipe file describing the package
    #[arg(long, value_name = "PATH", default_value = "recipe.toml")]
    pub recipe: PathBuf,

    /// Source tree with include/, src/, and the build entry points
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Build tree for the generator backend (default: <source-dir>/build)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Package output tree (include/ + lib/)
    #[arg(long, value_name = "DIR", default_value = "package")]
    pub package_dir: PathBuf,

    /// Root the directory resolver locates dependencies under
    /// (default: <source-dir>/deps)
    #[arg(long, value_name = "DIR")]
    pub deps_root: Option<PathBuf>,

    /// Override the recipe's build_tool option (cmake or scons)
    #[arg(long, value_name = "TOOL")]
    pub build_tool: Option<String>,

    /// Fail when a copy pattern matches zero files
    #[arg(long)]
    pub strict: bool,

    /// Run the generator backend's test step (off by default)
    #[arg(long)]
    pub run_tests: bool,

    /// Emit package metadata as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
