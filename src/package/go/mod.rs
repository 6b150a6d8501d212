//! Package oracle for Go source trees.
//!
//! A directory is a package when it holds at least one buildable `.go` file
//! for the configured target. Only the header of each file is read: build
//! constraints, the package clause and the import declarations.

mod constraint;
mod context;
mod header;

pub use constraint::{parse_go_build, parse_plus_build, ConstraintError, Expr};
pub use context::BuildContext;
pub use header::{parse_header, FileHeader};

use super::{PackageDescriptor, PackageOracle, ResolveError};
use crate::discovery::SourceRoot;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Files declaring this package name are documentation only
const DOCUMENTATION_PACKAGE: &str = "documentation";

/// Resolves directories of Go source files into package descriptors
#[derive(Debug, Clone, Default)]
pub struct GoOracle {
    context: BuildContext,
}

impl GoOracle {
    pub fn new(context: BuildContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Candidate `.go` files of a directory, non-test files first, each group by name
    fn go_files(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>, ResolveError> {
        let entries = fs::read_dir(dir).map_err(|source| ResolveError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !name.ends_with(".go") || name.starts_with('_') || name.starts_with('.') {
                continue;
            }
            if !path.is_file() {
                continue;
            }
            if !self.context.matches_file_name(&name) {
                trace!("Skipping {} (file name constraint)", path.display());
                continue;
            }
            files.push((name, path));
        }

        files.sort_by(|(a, _), (b, _)| {
            (a.ends_with("_test.go"), a).cmp(&(b.ends_with("_test.go"), b))
        });
        Ok(files)
    }
}

impl PackageOracle for GoOracle {
    fn resolve(&self, dir: &Path, root: &SourceRoot) -> Result<PackageDescriptor, ResolveError> {
        let import_path = root
            .import_path_of(dir)
            .ok_or_else(|| ResolveError::NotInRoot(dir.to_path_buf()))?;

        let mut name: Option<String> = None;
        let mut imports = BTreeSet::new();
        let mut test_imports = BTreeSet::new();
        let mut xtest_imports = BTreeSet::new();

        for (file_name, path) in self.go_files(dir)? {
            let src = fs::read_to_string(&path).map_err(|source| ResolveError::Io {
                path: path.clone(),
                source,
            })?;
            let header = parse_header(&src).map_err(|message| ResolveError::Parse {
                path: path.clone(),
                message,
            })?;

            let buildable = self
                .context
                .matches_header(&header)
                .map_err(|err| ResolveError::Parse {
                    path: path.clone(),
                    message: err.to_string(),
                })?;
            if !buildable {
                trace!("Skipping {} (build constraints)", path.display());
                continue;
            }
            if header.imports_c() && !self.context.cgo_enabled {
                trace!("Skipping {} (cgo disabled)", path.display());
                continue;
            }
            if header.package == DOCUMENTATION_PACKAGE {
                continue;
            }

            let is_test = file_name.ends_with("_test.go");
            let mut package = header.package.as_str();
            let mut is_xtest = false;
            if is_test && name.as_deref() != Some(package) {
                if let Some(base) = package.strip_suffix("_test") {
                    is_xtest = true;
                    package = base;
                }
            }

            if let Some(existing) = &name {
                if existing != package {
                    return Err(ResolveError::MultiplePackages {
                        dir: dir.to_path_buf(),
                        first: existing.clone(),
                        second: package.to_string(),
                    });
                }
            } else {
                name = Some(package.to_string());
            }

            let target = if is_xtest {
                &mut xtest_imports
            } else if is_test {
                &mut test_imports
            } else {
                &mut imports
            };
            target.extend(header.imports);
        }

        let name = name.ok_or_else(|| ResolveError::NoGoFiles(dir.to_path_buf()))?;

        Ok(PackageDescriptor::new(import_path, name)
            .with_dir(dir)
            .with_standard(root.is_standard())
            .with_imports(imports)
            .with_test_imports(test_imports)
            .with_xtest_imports(xtest_imports))
    }
}
