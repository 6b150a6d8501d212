//! Registry building tests
//!
//! Each test lays out a small GOROOT/GOPATH tree on disk and resolves it
//! through the Go oracle.

use deadpkg::{
    list_source_roots, BuildContext, Config, Diagnostic, Diagnostics, GoOracle,
    ParallelRegistryBuilder, Registry, RegistryBuilder, SourceRoot,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn oracle() -> GoOracle {
    GoOracle::new(BuildContext::new("linux", "amd64"))
}

fn build(roots: &[SourceRoot], config: &Config) -> (Registry, Diagnostics) {
    let oracle = oracle();
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::new(&oracle, config).build(roots, &mut diagnostics);
    (registry, diagnostics)
}

/// GOROOT with a tiny standard library and a GOPATH with one project
fn workspace() -> (TempDir, TempDir) {
    let goroot = TempDir::new().unwrap();
    write(goroot.path(), "src/fmt/print.go", "package fmt\n\nimport \"io\"\n");
    write(goroot.path(), "src/io/io.go", "package io\n");
    write(goroot.path(), "src/container/ring/ring.go", "package ring\n");
    write(goroot.path(), "src/cmd/gofmt/main.go", "package main\n\nimport \"fmt\"\n");

    let gopath = TempDir::new().unwrap();
    write(
        gopath.path(),
        "src/example.com/app/main.go",
        "package main\n\nimport (\n\t\"fmt\"\n\t\"example.com/app/internal/store\"\n)\n",
    );
    write(gopath.path(), "src/example.com/app/internal/store/store.go", "package store\n");
    write(
        gopath.path(),
        "src/example.com/app/internal/store/store_test.go",
        "package store\n\nimport \"example.com/testutil\"\n",
    );
    write(gopath.path(), "src/example.com/testutil/util.go", "package testutil\n");
    write(gopath.path(), "src/example.com/legacy/old.go", "package legacy\n");
    write(gopath.path(), "src/example.com/README.md", "not go\n");

    (goroot, gopath)
}

fn config_for(goroot: &Path, gopath: &Path) -> Config {
    let mut config = Config::default();
    config.source.goroot = Some(goroot.to_path_buf());
    config.source.gopath = vec![gopath.to_path_buf()];
    config
}

#[test]
fn test_registry_contains_every_package() {
    let (goroot, gopath) = workspace();
    let config = config_for(goroot.path(), gopath.path());
    let roots = list_source_roots(&config);
    assert_eq!(roots.len(), 2);
    assert!(roots[0].is_standard());

    let (registry, diagnostics) = build(&roots, &config);

    assert_eq!(
        registry.import_paths(),
        vec![
            "cmd/gofmt",
            "container/ring",
            "example.com/app",
            "example.com/app/internal/store",
            "example.com/legacy",
            "example.com/testutil",
            "fmt",
            "io",
        ]
    );
    assert!(diagnostics.is_empty());

    let fmt = registry.get("fmt").unwrap();
    assert!(fmt.is_standard);
    assert_eq!(fmt.imports, vec!["io"]);

    let app = registry.get("example.com/app").unwrap();
    assert!(app.is_command);
    assert!(!app.is_standard);
    assert_eq!(app.imports, vec!["example.com/app/internal/store", "fmt"]);

    let store = registry.get("example.com/app/internal/store").unwrap();
    assert_eq!(store.test_imports, vec!["example.com/testutil"]);
}

#[test]
fn test_directories_without_go_files_are_skipped() {
    let (goroot, gopath) = workspace();
    let config = config_for(goroot.path(), gopath.path());
    let (registry, _) = build(&list_source_roots(&config), &config);

    // src/example.com only holds a README and subdirectories
    assert!(!registry.contains("example.com"));
    assert!(!registry.contains("cmd"));
    assert!(!registry.contains("container"));
}

#[test]
fn test_root_directory_is_not_a_package() {
    let gopath = TempDir::new().unwrap();
    write(gopath.path(), "src/stray.go", "package stray\n");
    write(gopath.path(), "src/real/real.go", "package real\n");

    let mut config = Config::default();
    config.source.goroot = Some(gopath.path().join("missing-goroot"));
    config.source.gopath = vec![gopath.path().to_path_buf()];

    let (registry, _) = build(&list_source_roots(&config), &config);
    assert_eq!(registry.import_paths(), vec!["real"]);
}

#[test]
fn test_later_root_wins_on_duplicate_import_path() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(first.path(), "shared/a.go", "package shared\n\nimport \"fmt\"\n");
    write(second.path(), "shared/b.go", "package shared\n\nimport \"os\"\n");

    let roots = vec![SourceRoot::user(first.path()), SourceRoot::user(second.path())];
    let (registry, _) = build(&roots, &Config::default());

    assert_eq!(registry.len(), 1);
    let shared = registry.get("shared").unwrap();
    assert_eq!(shared.imports, vec!["os"]);
    assert_eq!(shared.dir, second.path().join("shared"));
}

#[test]
fn test_parallel_build_matches_sequential() {
    let (goroot, gopath) = workspace();
    let config = config_for(goroot.path(), gopath.path());
    let roots = list_source_roots(&config);
    let oracle = oracle();

    let mut seq_diagnostics = Diagnostics::new();
    let sequential = RegistryBuilder::new(&oracle, &config).build(&roots, &mut seq_diagnostics);

    let mut par_diagnostics = Diagnostics::new();
    let parallel = ParallelRegistryBuilder::new(&oracle, &config).build(&roots, &mut par_diagnostics);

    assert_eq!(sequential.import_paths(), parallel.import_paths());
    for path in sequential.import_paths() {
        assert_eq!(sequential.get(path), parallel.get(path), "mismatch for {}", path);
    }
    assert_eq!(seq_diagnostics.len(), par_diagnostics.len());
}

#[test]
fn test_parallel_build_keeps_last_one_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(first.path(), "dup/a.go", "package dup\n");
    write(second.path(), "dup/b.go", "package dup\n\nimport \"strings\"\n");

    let roots = vec![SourceRoot::user(first.path()), SourceRoot::user(second.path())];
    let oracle = oracle();
    let mut diagnostics = Diagnostics::new();
    let registry = ParallelRegistryBuilder::new(&oracle, &Config::default()).build(&roots, &mut diagnostics);

    assert_eq!(registry.get("dup").unwrap().imports, vec!["strings"]);
}

#[test]
fn test_excluded_directories_are_not_registered() {
    let (goroot, gopath) = workspace();
    let mut config = config_for(goroot.path(), gopath.path());
    config.exclude = vec!["example.com/legacy".to_string(), "**/internal/**".to_string()];

    let (registry, _) = build(&list_source_roots(&config), &config);
    assert!(!registry.contains("example.com/legacy"));
    assert!(!registry.contains("example.com/app/internal/store"));
    assert!(registry.contains("example.com/app"));
}

#[test]
fn test_missing_root_is_a_walk_diagnostic() {
    let tmp = TempDir::new().unwrap();
    let roots = vec![SourceRoot::user(tmp.path().join("nope"))];

    let (registry, diagnostics) = build(&roots, &Config::default());
    assert!(registry.is_empty());
    assert_eq!(diagnostics.walk_errors().count(), 1);
    assert!(matches!(diagnostics.iter().next(), Some(Diagnostic::Walk { .. })));
}

#[test]
fn test_build_constraints_select_files() {
    let gopath = TempDir::new().unwrap();
    write(gopath.path(), "src/plat/plat.go", "package plat\n");
    write(gopath.path(), "src/plat/plat_windows.go", "package plat\n\nimport \"syscall\"\n");
    write(
        gopath.path(),
        "src/plat/plat_unix.go",
        "//go:build unix\n\npackage plat\n\nimport \"os/signal\"\n",
    );
    write(
        gopath.path(),
        "src/plat/ignored.go",
        "//go:build ignore\n\npackage main\n\nimport \"net/http\"\n",
    );

    let roots = vec![SourceRoot::user(gopath.path().join("src"))];
    let (registry, _) = build(&roots, &Config::default());

    let plat = registry.get("plat").unwrap();
    assert!(!plat.is_command);
    assert_eq!(plat.imports, vec!["os/signal"]);
}

#[test]
fn test_conflicting_package_names_are_skipped() {
    let gopath = TempDir::new().unwrap();
    write(gopath.path(), "mixed/a.go", "package alpha\n");
    write(gopath.path(), "mixed/b.go", "package beta\n");
    write(gopath.path(), "mixed/ok/ok.go", "package ok\n");

    let roots = vec![SourceRoot::user(gopath.path())];
    let (registry, diagnostics) = build(&roots, &Config::default());

    assert_eq!(registry.import_paths(), vec!["mixed/ok"]);
    assert!(diagnostics.is_empty());
}
