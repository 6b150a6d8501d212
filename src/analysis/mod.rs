mod cycles;
mod entry_points;
mod liveness;

pub use cycles::{CycleDetector, DeadCycle};
pub use entry_points::EntryPointDetector;
pub use liveness::{LivenessAnalyzer, LivenessSet, UnresolvedPolicy, VisitOrder};

use crate::registry::Registry;
use serde::Serialize;
use std::path::PathBuf;

/// A registered package that no entry point reaches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadPackage {
    pub import_path: String,
    pub name: String,
    pub dir: PathBuf,
    pub is_standard: bool,
}

/// The dead packages of one run, sorted by import path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadReport {
    packages: Vec<DeadPackage>,
}

impl DeadReport {
    /// Every registry entry outside the live set. Standard library packages
    /// are left out unless `report_std` is set.
    pub fn from_liveness(registry: &Registry, live: &LivenessSet, report_std: bool) -> Self {
        let packages = registry
            .import_paths()
            .into_iter()
            .filter(|path| !live.contains(path))
            .filter_map(|path| registry.get(path))
            // Commands are live by definition, even when no walk started from them
            .filter(|pkg| !pkg.is_command)
            .filter(|pkg| report_std || !pkg.is_standard)
            .map(|pkg| DeadPackage {
                import_path: pkg.import_path.clone(),
                name: pkg.name.clone(),
                dir: pkg.dir.clone(),
                is_standard: pkg.is_standard,
            })
            .collect();

        Self { packages }
    }

    pub fn packages(&self) -> &[DeadPackage] {
        &self.packages
    }

    pub fn import_paths(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.import_path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn standard_count(&self) -> usize {
        self.packages.iter().filter(|p| p.is_standard).count()
    }

    /// Keep only the packages matching `keep`
    pub fn retain(&mut self, keep: impl FnMut(&DeadPackage) -> bool) {
        self.packages.retain(keep);
    }
}
