use super::PackageDescriptor;
use crate::discovery::SourceRoot;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a directory does not yield a package.
///
/// These are expected for most directories and are never reported as
/// diagnostics.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no buildable Go source files in {0}")]
    NoGoFiles(PathBuf),

    #[error("found packages {first} and {second} in {dir}")]
    MultiplePackages {
        dir: PathBuf,
        first: String,
        second: String,
    },

    #[error("{path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{0} is not a package directory inside its source root")]
    NotInRoot(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves a single directory into package metadata
pub trait PackageOracle {
    fn resolve(&self, dir: &Path, root: &SourceRoot) -> Result<PackageDescriptor, ResolveError>;
}
