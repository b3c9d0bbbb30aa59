//! End-to-end executor scenarios against stub build tools

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tlmpkg_errors::{BuildError, Error, PackageError, ResolveError};
use tlmpkg_recipe::{
    parse_recipe, Backend, BuildPaths, CmakeBuild, DirectoryResolver, Recipe, RecipeExecutor,
    SconsBuild,
};

const SCONS_RECIPE: &str = r#"
[package]
name = "gem5_wrapper"
version = "1.0.0"

[settings]
os = "linux"
compiler = "gcc"
build_type = "release"
arch = "x86_64"

[options]
build_tool = "scons"
"#;

const CMAKE_RECIPE: &str = r#"
[package]
name = "gem5_wrapper"
version = "1.0.0"

[settings]
os = "linux"
compiler = "gcc"
build_type = "release"
arch = "x86_64"

[options]
build_tool = "cmake"
"#;

fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn recipe(toml: &str) -> Recipe {
    parse_recipe(toml).unwrap()
}

fn source_tree(temp: &TempDir, entry: &str) -> PathBuf {
    let source = temp.path().join("source");
    fs::create_dir_all(source.join("include")).unwrap();
    fs::write(source.join("include/foo.hh"), "// foo\n").unwrap();
    fs::write(source.join(entry), "\n").unwrap();
    source
}

fn invocations(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .map(|s| s.lines().map(ToString::to_string).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_scons_scenario_end_to_end() {
    let temp = TempDir::new().unwrap();
    let source = source_tree(&temp, "SConstruct");
    let package = temp.path().join("package");
    let log = temp.path().join("invocations.log");

    // The stub records its arguments and drops artifacts in the source
    // tree, the way a real scons build would.
    let stub = write_stub(
        temp.path(),
        "scons",
        &format!(
            "echo \"scons $@\" >> {log}\ntouch libgem5_wrapper.so\nmkdir -p out\ntouch out/libgem5_extra.a",
            log = log.display()
        ),
    );

    let mut exec = RecipeExecutor::new(
        recipe(SCONS_RECIPE),
        BuildPaths::new(&source, &package),
    )
    .with_backend_override(Backend::Script(
        SconsBuild::new().with_program(stub.display().to_string()),
    ));

    let resolver = DirectoryResolver::new(temp.path().join("deps"));
    let (report, info) = exec.run(&resolver).await.unwrap();

    // One script invocation with the fixed parallelism hint, no generator run
    let calls = invocations(&log);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("-j4"));

    assert_eq!(report.headers, vec![PathBuf::from("foo.hh")]);
    assert_eq!(report.shared_objects, vec![PathBuf::from("libgem5_wrapper.so")]);
    assert_eq!(report.archives, vec![PathBuf::from("libgem5_extra.a")]);
    assert!(package.join("include/foo.hh").is_file());
    assert!(package.join("lib/libgem5_wrapper.so").is_file());
    // Flattened: the out/ subdirectory is not reproduced
    assert!(package.join("lib/libgem5_extra.a").is_file());
    assert!(!package.join("lib/out").exists());

    assert_eq!(info.libs, vec!["gem5_wrapper".to_string()]);
}

#[tokio::test]
async fn test_cmake_scenario_end_to_end() {
    let temp = TempDir::new().unwrap();
    let source = source_tree(&temp, "CMakeLists.txt");
    let package = temp.path().join("package");
    let log = temp.path().join("invocations.log");

    let stub = write_stub(
        temp.path(),
        "cmake",
        &format!(
            "echo \"cmake $@\" >> {log}\nif [ \"$1\" = \"--build\" ]; then touch libgem5_wrapper.so; fi",
            log = log.display()
        ),
    );

    let mut exec = RecipeExecutor::new(
        recipe(CMAKE_RECIPE),
        BuildPaths::new(&source, &package),
    )
    .with_backend_override(Backend::Generator(
        CmakeBuild::new().with_program(stub.display().to_string()),
    ));

    let resolver = DirectoryResolver::new(temp.path().join("deps"));
    let (report, _info) = exec.run(&resolver).await.unwrap();

    // Configure then compile, nothing else: the test step stays disabled
    let calls = invocations(&log);
    assert_eq!(calls.len(), 2);
    assert!(calls[0].contains(&source.display().to_string()));
    assert!(calls[0].contains("-DCMAKE_BUILD_TYPE=Release"));
    assert!(calls[0].contains("-DCMAKE_POSITION_INDEPENDENT_CODE=ON"));
    assert!(calls[0].contains("-DBUILD_SHARED_LIBS=ON"));
    assert!(calls[0].contains("-DCONANPKG=OFF"));
    assert!(calls[1].contains("--build ."));

    assert_eq!(report.headers, vec![PathBuf::from("foo.hh")]);
    assert!(package.join("include/foo.hh").is_file());
    assert!(package.join("lib/libgem5_wrapper.so").is_file());
}

#[tokio::test]
async fn test_failing_build_skips_packaging() {
    let temp = TempDir::new().unwrap();
    let source = source_tree(&temp, "SConstruct");
    let package = temp.path().join("package");

    let stub = write_stub(temp.path(), "scons", "echo 'link error' >&2\nexit 2");

    let mut exec = RecipeExecutor::new(
        recipe(SCONS_RECIPE),
        BuildPaths::new(&source, &package),
    )
    .with_backend_override(Backend::Script(
        SconsBuild::new().with_program(stub.display().to_string()),
    ));

    let resolver = DirectoryResolver::new(temp.path().join("deps"));
    let err = exec.run(&resolver).await.unwrap_err();
    match err {
        Error::Build(BuildError::CommandFailed { code, stderr, .. }) => {
            assert_eq!(code, Some(2));
            assert!(stderr.contains("link error"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Package phase never ran
    assert!(!package.exists());
}

#[tokio::test]
async fn test_missing_entry_point_fails_before_spawn() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    fs::create_dir_all(&source).unwrap();
    let log = temp.path().join("invocations.log");
    let stub = write_stub(
        temp.path(),
        "scons",
        &format!("echo ran >> {}", log.display()),
    );

    let mut exec = RecipeExecutor::new(
        recipe(SCONS_RECIPE),
        BuildPaths::new(&source, temp.path().join("package")),
    )
    .with_backend_override(Backend::Script(
        SconsBuild::new().with_program(stub.display().to_string()),
    ));

    let resolver = DirectoryResolver::new(temp.path().join("deps"));
    let err = exec.run(&resolver).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::MissingEntryPoint { .. })
    ));
    assert!(invocations(&log).is_empty());
}

#[tokio::test]
async fn test_strict_mode_rejects_empty_artifact_set() {
    let temp = TempDir::new().unwrap();
    let source = source_tree(&temp, "SConstruct");

    // Builds "successfully" but produces nothing linkable
    let stub = write_stub(temp.path(), "scons", "exit 0");

    let backend = || {
        Backend::Script(SconsBuild::new().with_program(stub.display().to_string()))
    };
    let resolver = DirectoryResolver::new(temp.path().join("deps"));

    // Permissive by default: an empty match set only warns
    let mut exec = RecipeExecutor::new(
        recipe(SCONS_RECIPE),
        BuildPaths::new(&source, temp.path().join("pkg-lenient")),
    )
    .with_backend_override(backend());
    let (report, _) = exec.run(&resolver).await.unwrap();
    assert!(report.archives.is_empty() && report.shared_objects.is_empty());

    // Strict mode turns the silent empty copy into an error
    let mut exec = RecipeExecutor::new(
        recipe(SCONS_RECIPE),
        BuildPaths::new(&source, temp.path().join("pkg-strict")),
    )
    .with_backend_override(backend())
    .with_strict(true);
    let err = exec.run(&resolver).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Package(PackageError::NoArtifacts { .. })
    ));
}

#[tokio::test]
async fn test_dependencies_resolve_into_prefix_path() {
    let temp = TempDir::new().unwrap();
    let source = source_tree(&temp, "CMakeLists.txt");
    let log = temp.path().join("invocations.log");

    let deps_root = temp.path().join("deps");
    let systemc_root = deps_root.join("systemc/2.3.3");
    let gem5_root = deps_root.join("gem5/1.0.0");
    fs::create_dir_all(&systemc_root).unwrap();
    fs::create_dir_all(&gem5_root).unwrap();

    let stub = write_stub(
        temp.path(),
        "cmake",
        &format!(
            "echo \"cmake $@\" >> {log}\nif [ \"$1\" = \"--build\" ]; then touch libgem5_wrapper.so; fi",
            log = log.display()
        ),
    );

    // Top-level keys must precede the first table in TOML
    let with_requires = format!(
        "requires = [\"systemc/2.3.3@syssim/stable\", \"gem5/1.0@demo/testing\"]\n{CMAKE_RECIPE}"
    );

    let mut exec = RecipeExecutor::new(
        recipe(&with_requires),
        BuildPaths::new(&source, temp.path().join("package")),
    )
    .with_backend_override(Backend::Generator(
        CmakeBuild::new().with_program(stub.display().to_string()),
    ));

    let resolver = DirectoryResolver::new(&deps_root);
    exec.run(&resolver).await.unwrap();

    assert_eq!(exec.resolved_dependencies().len(), 2);
    let calls = invocations(&log);
    let expected = format!(
        "-DCMAKE_PREFIX_PATH={};{}",
        systemc_root.display(),
        gem5_root.display()
    );
    assert!(calls[0].contains(&expected), "missing prefix path in {}", calls[0]);
}

#[tokio::test]
async fn test_unresolvable_dependency_fails_configure() {
    let temp = TempDir::new().unwrap();
    let source = source_tree(&temp, "CMakeLists.txt");
    let log = temp.path().join("invocations.log");
    let stub = write_stub(
        temp.path(),
        "cmake",
        &format!("echo ran >> {}", log.display()),
    );

    let with_requires = format!("requires = [\"gem5/1.0@demo/testing\"]\n{CMAKE_RECIPE}");
    let mut exec = RecipeExecutor::new(
        recipe(&with_requires),
        BuildPaths::new(&source, temp.path().join("package")),
    )
    .with_backend_override(Backend::Generator(
        CmakeBuild::new().with_program(stub.display().to_string()),
    ));

    let resolver = DirectoryResolver::new(temp.path().join("empty-deps"));
    let err = exec.run(&resolver).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Resolve(ResolveError::NotFound { .. })
    ));
    // Nothing was spawned
    assert!(invocations(&log).is_empty());
}
