//! tlmpkg - native-library package recipe executor
//!
//! Drives the four-phase lifecycle for one package build and renders the
//! published linkage metadata. Exit code 0 on success, 1 on any failing
//! phase, with the underlying tool's diagnostics surfaced verbatim.

mod cli;

use crate::cli::Cli;
use clap::Parser;
use std::process;
use tlmpkg_errors::Error;
use tlmpkg_recipe::{
    load_recipe, BuildPaths, DirectoryResolver, PackageInfo, PackageReport, RecipeExecutor,
};
use tlmpkg_types::BuildTool;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        error!("package build failed: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), Error> {
    let mut recipe = load_recipe(&cli.recipe).await?;

    // CLI override goes through the same enumerated-domain validation as
    // the recipe file, so a bad value still fails before any build action.
    if let Some(tool) = &cli.build_tool {
        recipe.options.build_tool = tool.parse::<BuildTool>()?;
    }

    info!(
        package = %recipe.package_id(),
        build_tool = %recipe.options.build_tool,
        "starting package build"
    );

    let mut paths = BuildPaths::new(&cli.source_dir, &cli.package_dir);
    if let Some(build_dir) = &cli.build_dir {
        paths = paths.with_build_dir(build_dir);
    }

    let deps_root = cli
        .deps_root
        .clone()
        .unwrap_or_else(|| cli.source_dir.join("deps"));
    let resolver = DirectoryResolver::new(deps_root);

    let mut executor = RecipeExecutor::new(recipe, paths)
        .with_strict(cli.strict)
        .with_run_tests(cli.run_tests);

    let (report, package_info) = executor.run(&resolver).await?;
    render(&report, &package_info, cli.json)?;
    Ok(())
}

fn render(report: &PackageReport, info: &PackageInfo, json: bool) -> Result<(), Error> {
    if json {
        let doc = serde_json::json!({
            "package": info,
            "files": report,
        });
        let rendered = serde_json::to_string_pretty(&doc)
            .map_err(|e| Error::internal(format!("JSON error: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("packaged {} ({} files)", info.package, report.file_count());
    println!("  settings: {}", info.settings);
    println!("  include:  {}", info.include_dir.display());
    println!("  lib:      {}", info.lib_dir.display());
    println!("  libs:     {}", info.libs.join(", "));
    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
