use super::Registry;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::discovery::{DirectoryWalker, SourceRoot};
use crate::package::PackageOracle;
use indicatif::ProgressBar;
use tracing::{debug, info, trace};

/// Builds a registry by walking source roots and resolving each directory
pub struct RegistryBuilder<'a, O: PackageOracle> {
    oracle: &'a O,
    config: &'a Config,
    progress: Option<ProgressBar>,
}

impl<'a, O: PackageOracle> RegistryBuilder<'a, O> {
    pub fn new(oracle: &'a O, config: &'a Config) -> Self {
        Self {
            oracle,
            config,
            progress: None,
        }
    }

    /// Tick the given progress bar once per visited directory
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Walk every root in order and index each resolved package
    pub fn build(&self, roots: &[SourceRoot], diagnostics: &mut Diagnostics) -> Registry {
        let mut registry = Registry::new();
        let mut visited = 0usize;

        for root in roots {
            debug!("Scanning source root: {}", root.path.display());

            for dir in DirectoryWalker::new(&root.path, self.config, diagnostics) {
                visited += 1;
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }

                match self.oracle.resolve(&dir, root) {
                    Ok(package) => {
                        trace!("Resolved {} from {}", package.import_path, dir.display());
                        if let Some(previous) = registry.insert(package) {
                            debug!(
                                "Duplicate package {} ({} replaced)",
                                previous.import_path,
                                previous.dir.display()
                            );
                        }
                    }
                    Err(e) => trace!("Not a package: {}", e),
                }
            }
        }

        info!("Resolved {} packages from {} directories", registry.len(), visited);
        registry
    }
}
