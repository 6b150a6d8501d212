// Parallel registry builder using rayon

use super::Registry;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::discovery::{DirectoryWalker, SourceRoot};
use crate::package::{PackageDescriptor, PackageOracle};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Registry builder that resolves directories on the rayon pool.
///
/// Directories are enumerated first, resolved in parallel, then inserted in
/// enumeration order, so duplicate import paths end up exactly as they would
/// with [`RegistryBuilder`](super::RegistryBuilder).
pub struct ParallelRegistryBuilder<'a, O: PackageOracle + Sync> {
    oracle: &'a O,
    config: &'a Config,
    progress: Option<ProgressBar>,
}

impl<'a, O: PackageOracle + Sync> ParallelRegistryBuilder<'a, O> {
    pub fn new(oracle: &'a O, config: &'a Config) -> Self {
        Self {
            oracle,
            config,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn build(&self, roots: &[SourceRoot], diagnostics: &mut Diagnostics) -> Registry {
        let mut work: Vec<(PathBuf, &SourceRoot)> = Vec::new();
        for root in roots {
            debug!("Scanning source root: {}", root.path.display());
            work.extend(
                DirectoryWalker::new(&root.path, self.config, diagnostics).map(|dir| (dir, root)),
            );
        }

        info!("Resolving {} directories in parallel...", work.len());

        let resolved: Vec<Option<PackageDescriptor>> = work
            .par_iter()
            .map(|(dir, root)| {
                let result = self.oracle.resolve(dir, root);
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
                match result {
                    Ok(package) => Some(package),
                    Err(e) => {
                        trace!("Not a package: {}", e);
                        None
                    }
                }
            })
            .collect();

        let registry: Registry = resolved.into_iter().flatten().collect();

        info!("Resolved {} packages from {} directories", registry.len(), work.len());
        registry
    }
}
