use crate::config::Config;
use crate::registry::Registry;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Detects the packages the liveness walk starts from
pub struct EntryPointDetector<'a> {
    config: &'a Config,
}

impl<'a> EntryPointDetector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Every command plus every package matching a configured entry point pattern
    pub fn detect(&self, registry: &Registry) -> BTreeSet<String> {
        let mut entry_points: BTreeSet<String> = registry
            .commands()
            .map(|pkg| pkg.import_path.clone())
            .collect();
        let commands = entry_points.len();

        if !self.config.analysis.entry_points.is_empty() {
            for pkg in registry.packages() {
                if !pkg.is_command && self.config.is_configured_entry_point(&pkg.import_path) {
                    debug!("Configured entry point: {}", pkg.import_path);
                    entry_points.insert(pkg.import_path.clone());
                }
            }
        }

        info!(
            "Detected {} entry points ({} commands, {} configured)",
            entry_points.len(),
            commands,
            entry_points.len() - commands
        );
        entry_points
    }
}
