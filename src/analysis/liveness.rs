use super::DeadReport;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::package::PackageDescriptor;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace};

/// How imports with no registry entry are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Stay silent for pseudo-imports such as cgo's "C", report the rest
    #[default]
    SuppressPseudo,
    /// Report every unresolved import
    ReportAll,
}

/// When a package joins the live set during the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitOrder {
    /// Mark before walking the package's imports
    #[default]
    Preorder,
    /// Mark once all of the package's imports have been walked
    Postorder,
}

/// Import paths reachable from the entry points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LivenessSet {
    live: HashSet<String>,
}

impl LivenessSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, import_path: &str) -> bool {
        self.live.insert(import_path.to_string())
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.live.contains(import_path)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.live.iter().map(String::as_str)
    }

    /// Live import paths, sorted
    pub fn sorted(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.iter().collect();
        paths.sort_unstable();
        paths
    }
}

/// One pending package on the explicit walk stack
struct Frame<'r> {
    package: &'r PackageDescriptor,
    edges: Vec<&'r str>,
    next: usize,
}

/// Computes which packages are reachable from the entry points
#[derive(Debug, Clone)]
pub struct LivenessAnalyzer {
    visit_order: VisitOrder,
    unresolved: UnresolvedPolicy,
    pseudo_imports: Vec<String>,
    include_xtests: bool,
    report_std: bool,
}

impl LivenessAnalyzer {
    pub fn new() -> Self {
        Self {
            visit_order: VisitOrder::default(),
            unresolved: UnresolvedPolicy::default(),
            pseudo_imports: vec!["C".to_string()],
            include_xtests: false,
            report_std: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let analysis = &config.analysis;
        Self {
            visit_order: analysis.visit_order,
            unresolved: analysis.unresolved,
            pseudo_imports: analysis.pseudo_imports.clone(),
            include_xtests: analysis.include_external_tests,
            report_std: analysis.report_std,
        }
    }

    pub fn with_visit_order(mut self, order: VisitOrder) -> Self {
        self.visit_order = order;
        self
    }

    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn with_external_tests(mut self, include: bool) -> Self {
        self.include_xtests = include;
        self
    }

    pub fn with_report_std(mut self, report_std: bool) -> Self {
        self.report_std = report_std;
        self
    }

    /// Find the dead packages and also return the live set
    pub fn find_dead_with_live(
        &self,
        registry: &Registry,
        entry_points: &BTreeSet<String>,
        diagnostics: &mut Diagnostics,
    ) -> (DeadReport, LivenessSet) {
        let live = self.find_live(registry, entry_points, diagnostics);
        let report = DeadReport::from_liveness(registry, &live, self.report_std);
        (report, live)
    }

    pub fn find_dead(
        &self,
        registry: &Registry,
        entry_points: &BTreeSet<String>,
        diagnostics: &mut Diagnostics,
    ) -> DeadReport {
        self.find_dead_with_live(registry, entry_points, diagnostics).0
    }

    /// Walk from every entry point and collect every package reached
    pub fn find_live(
        &self,
        registry: &Registry,
        entry_points: &BTreeSet<String>,
        diagnostics: &mut Diagnostics,
    ) -> LivenessSet {
        let mut live = LivenessSet::new();

        for entry in entry_points {
            match registry.get(entry) {
                Some(package) => self.walk(registry, package, &mut live, diagnostics),
                None => debug!("Entry point {} is not in the registry", entry),
            }
        }

        debug!("{} of {} packages live", live.len(), registry.len());
        live
    }

    fn walk<'r>(
        &self,
        registry: &'r Registry,
        root: &'r PackageDescriptor,
        live: &mut LivenessSet,
        diagnostics: &mut Diagnostics,
    ) {
        if live.contains(&root.import_path) {
            return;
        }

        // Packages entered but not yet marked, only used for post-order
        let mut in_progress: HashSet<&'r str> = HashSet::new();
        let mut stack: Vec<Frame<'r>> = Vec::new();
        self.enter(root, &mut stack, &mut in_progress, live);

        while let Some(frame) = stack.last_mut() {
            let Some(&target) = frame.edges.get(frame.next) else {
                let done = stack.pop().map(|f| f.package);
                if let (VisitOrder::Postorder, Some(package)) = (self.visit_order, done) {
                    in_progress.remove(package.import_path.as_str());
                    live.insert(&package.import_path);
                }
                continue;
            };
            frame.next += 1;
            let importer = frame.package;

            match registry.get(target) {
                Some(dep) => {
                    if !live.contains(target) && !in_progress.contains(target) {
                        self.enter(dep, &mut stack, &mut in_progress, live);
                    }
                }
                None => self.unresolved_import(target, importer, diagnostics),
            }
        }
    }

    fn enter<'r>(
        &self,
        package: &'r PackageDescriptor,
        stack: &mut Vec<Frame<'r>>,
        in_progress: &mut HashSet<&'r str>,
        live: &mut LivenessSet,
    ) {
        trace!("Visiting {}", package.import_path);
        match self.visit_order {
            VisitOrder::Preorder => {
                live.insert(&package.import_path);
            }
            VisitOrder::Postorder => {
                in_progress.insert(package.import_path.as_str());
            }
        }

        stack.push(Frame {
            package,
            edges: package.edges(self.include_xtests).collect(),
            next: 0,
        });
    }

    fn unresolved_import(&self, import: &str, importer: &PackageDescriptor, diagnostics: &mut Diagnostics) {
        if self.unresolved == UnresolvedPolicy::SuppressPseudo
            && self.pseudo_imports.iter().any(|p| p == import)
        {
            return;
        }

        diagnostics.push(Diagnostic::UnresolvedImport {
            import: import.to_string(),
            importer: importer.import_path.clone(),
        });
    }
}

impl Default for LivenessAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
