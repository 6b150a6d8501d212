//! Liveness analysis tests
//!
//! Registries are built in memory, so these tests exercise the walk and the
//! report independently of any source tree.

use deadpkg::{
    Config, Diagnostics, EntryPointDetector, LivenessAnalyzer, PackageDescriptor, Registry,
    UnresolvedPolicy, VisitOrder,
};
use std::collections::BTreeSet;

fn registry(packages: Vec<PackageDescriptor>) -> Registry {
    packages.into_iter().collect()
}

fn entry_points(registry: &Registry) -> BTreeSet<String> {
    EntryPointDetector::new(&Config::default()).detect(registry)
}

fn dead(analyzer: &LivenessAnalyzer, registry: &Registry) -> Vec<String> {
    let mut diagnostics = Diagnostics::new();
    analyzer
        .find_dead(registry, &entry_points(registry), &mut diagnostics)
        .import_paths()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_unreferenced_package_is_dead() {
    let registry = registry(vec![
        PackageDescriptor::command("a").with_imports(["b"]),
        PackageDescriptor::library("b"),
        PackageDescriptor::library("c"),
    ]);

    assert_eq!(dead(&LivenessAnalyzer::new(), &registry), vec!["c"]);
}

#[test]
fn test_import_cycle_through_entry_point_is_live() {
    let registry = registry(vec![
        PackageDescriptor::command("a").with_imports(["b"]),
        PackageDescriptor::library("b").with_imports(["a"]),
    ]);

    assert!(dead(&LivenessAnalyzer::new(), &registry).is_empty());
}

#[test]
fn test_test_imports_keep_packages_alive() {
    let registry = registry(vec![
        PackageDescriptor::command("a").with_test_imports(["b"]),
        PackageDescriptor::library("b"),
    ]);

    assert!(dead(&LivenessAnalyzer::new(), &registry).is_empty());
}

#[test]
fn test_unresolved_import_is_reported_not_fatal() {
    let registry = registry(vec![PackageDescriptor::command("a").with_imports(["x"])]);
    let mut diagnostics = Diagnostics::new();

    let (report, live) =
        LivenessAnalyzer::new().find_dead_with_live(&registry, &entry_points(&registry), &mut diagnostics);

    assert!(report.is_empty());
    assert!(!live.contains("x"));
    assert_eq!(diagnostics.unresolved_imports().collect::<Vec<_>>(), vec![("x", "a")]);
    assert_eq!(diagnostics.iter().next().unwrap().to_string(), "package \"x\" not found (imported by \"a\")");
}

#[test]
fn test_standard_library_filter() {
    let registry = registry(vec![
        PackageDescriptor::command("a"),
        PackageDescriptor::library("b").with_standard(true),
    ]);

    assert!(dead(&LivenessAnalyzer::new(), &registry).is_empty());
    assert_eq!(dead(&LivenessAnalyzer::new().with_report_std(true), &registry), vec!["b"]);
}

// ============================================================================
// Properties
// ============================================================================

/// A registry with a bit of everything: shared deps, a live cycle, a dead
/// cycle, test imports, standard packages and a missing import
fn mixed_registry() -> Registry {
    registry(vec![
        PackageDescriptor::command("cmd/server").with_imports(["net/http", "example.com/api", "example.com/missing"]),
        PackageDescriptor::command("cmd/tool").with_imports(["example.com/util", "C"]),
        PackageDescriptor::library("example.com/api")
            .with_imports(["example.com/model", "encoding/json"])
            .with_test_imports(["example.com/fixtures"]),
        PackageDescriptor::library("example.com/model").with_imports(["example.com/api"]),
        PackageDescriptor::library("example.com/util"),
        PackageDescriptor::library("example.com/fixtures"),
        PackageDescriptor::library("example.com/old/a").with_imports(["example.com/old/b"]),
        PackageDescriptor::library("example.com/old/b").with_imports(["example.com/old/a"]),
        PackageDescriptor::library("example.com/orphan"),
        PackageDescriptor::library("net/http").with_standard(true).with_imports(["io"]),
        PackageDescriptor::library("io").with_standard(true),
        PackageDescriptor::library("encoding/json").with_standard(true),
        PackageDescriptor::library("container/ring").with_standard(true),
    ])
}

#[test]
fn test_entry_points_are_always_live() {
    let registry = mixed_registry();
    let entry_points = entry_points(&registry);
    let mut diagnostics = Diagnostics::new();

    let live = LivenessAnalyzer::new().find_live(&registry, &entry_points, &mut diagnostics);
    for entry in &entry_points {
        assert!(live.contains(entry), "{} should be live", entry);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let registry = mixed_registry();
    let analyzer = LivenessAnalyzer::new().with_report_std(true);

    let first = dead(&analyzer, &registry);
    let second = dead(&analyzer, &registry);
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            "container/ring",
            "example.com/old/a",
            "example.com/old/b",
            "example.com/orphan",
        ]
    );
}

#[test]
fn test_adding_an_edge_only_grows_the_live_set() {
    let before = mixed_registry();
    let mut diagnostics = Diagnostics::new();
    let live_before = LivenessAnalyzer::new().find_live(&before, &entry_points(&before), &mut diagnostics);
    assert!(!live_before.contains("example.com/orphan"));

    let after = registry(
        before
            .packages()
            .cloned()
            .map(|pkg| {
                if pkg.import_path == "example.com/util" {
                    pkg.with_imports(["example.com/orphan"])
                } else {
                    pkg
                }
            })
            .collect(),
    );
    let live_after = LivenessAnalyzer::new().find_live(&after, &entry_points(&after), &mut diagnostics);

    assert!(live_after.contains("example.com/orphan"));
    for path in live_before.iter() {
        assert!(live_after.contains(path), "{} dropped out of the live set", path);
    }
    assert_eq!(live_after.len(), live_before.len() + 1);
}

#[test]
fn test_reachable_cycle_is_walked_once() {
    let registry = registry(vec![
        PackageDescriptor::command("main").with_imports(["a"]),
        PackageDescriptor::library("a").with_imports(["b"]),
        PackageDescriptor::library("b").with_imports(["c", "gone"]),
        PackageDescriptor::library("c").with_imports(["a"]),
    ]);

    for order in [VisitOrder::Preorder, VisitOrder::Postorder] {
        let mut diagnostics = Diagnostics::new();
        let live = LivenessAnalyzer::new()
            .with_visit_order(order)
            .find_live(&registry, &entry_points(&registry), &mut diagnostics);

        assert_eq!(live.sorted(), vec!["a", "b", "c", "main"]);
        // "b" is expanded once, so its missing import is reported once
        assert_eq!(diagnostics.len(), 1);
    }
}

#[test]
fn test_unresolved_imports_never_stop_the_walk() {
    let registry = registry(vec![
        PackageDescriptor::command("main").with_imports(["missing/one", "lib", "missing/two"]),
        PackageDescriptor::library("lib").with_imports(["missing/three", "deep"]),
        PackageDescriptor::library("deep"),
    ]);
    let mut diagnostics = Diagnostics::new();

    let live = LivenessAnalyzer::new().find_live(&registry, &entry_points(&registry), &mut diagnostics);

    assert_eq!(live.sorted(), vec!["deep", "lib", "main"]);
    assert_eq!(diagnostics.unresolved_imports().count(), 3);
    assert!(!live.iter().any(|path| path.starts_with("missing/")));
}

#[test]
fn test_std_filter_only_removes_entries() {
    let registry = mixed_registry();
    let with_std = dead(&LivenessAnalyzer::new().with_report_std(true), &registry);
    let without_std = dead(&LivenessAnalyzer::new(), &registry);

    assert!(without_std.len() < with_std.len());
    for path in &without_std {
        assert!(with_std.contains(path));
    }
    assert!(!without_std.contains(&"container/ring".to_string()));
}

#[test]
fn test_visit_orders_agree() {
    let registry = mixed_registry();
    let mut diagnostics = Diagnostics::new();

    let pre = LivenessAnalyzer::new()
        .with_visit_order(VisitOrder::Preorder)
        .find_live(&registry, &entry_points(&registry), &mut diagnostics);
    let post = LivenessAnalyzer::new()
        .with_visit_order(VisitOrder::Postorder)
        .find_live(&registry, &entry_points(&registry), &mut diagnostics);

    assert_eq!(pre.sorted(), post.sorted());
}

#[test]
fn test_pseudo_import_suppression() {
    let registry = mixed_registry();

    let mut diagnostics = Diagnostics::new();
    LivenessAnalyzer::new().find_live(&registry, &entry_points(&registry), &mut diagnostics);
    let imports: Vec<_> = diagnostics.unresolved_imports().map(|(import, _)| import).collect();
    assert_eq!(imports, vec!["example.com/missing"]);

    let mut diagnostics = Diagnostics::new();
    LivenessAnalyzer::new()
        .with_unresolved_policy(UnresolvedPolicy::ReportAll)
        .find_live(&registry, &entry_points(&registry), &mut diagnostics);
    let mut imports: Vec<_> = diagnostics.unresolved_imports().map(|(import, _)| import).collect();
    imports.sort_unstable();
    assert_eq!(imports, vec!["C", "example.com/missing"]);
}

#[test]
fn test_configured_entry_point_keeps_plugin_alive() {
    let registry = registry(vec![
        PackageDescriptor::command("cmd/app"),
        PackageDescriptor::library("example.com/plugins/audit").with_imports(["example.com/logsink"]),
        PackageDescriptor::library("example.com/logsink"),
        PackageDescriptor::library("example.com/unused"),
    ]);
    let mut config = Config::default();
    config.analysis.entry_points = vec!["example.com/plugins/*".to_string()];

    let entry_points = EntryPointDetector::new(&config).detect(&registry);
    let mut diagnostics = Diagnostics::new();
    let report = LivenessAnalyzer::from_config(&config).find_dead(&registry, &entry_points, &mut diagnostics);

    assert_eq!(report.import_paths(), vec!["example.com/unused"]);
}
