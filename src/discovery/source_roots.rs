use crate::config::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Whether a source root holds the bundled standard library or user code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Standard,
    User,
}

/// A directory that import paths are computed relative to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    /// The `src` directory itself
    pub path: PathBuf,

    pub kind: RootKind,
}

impl SourceRoot {
    pub fn new(path: impl Into<PathBuf>, kind: RootKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn standard(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootKind::Standard)
    }

    pub fn user(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RootKind::User)
    }

    pub fn is_standard(&self) -> bool {
        self.kind == RootKind::Standard
    }

    /// Import path of `dir` relative to this root, `None` for the root itself
    /// or for directories outside it
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        let relative = dir.strip_prefix(&self.path).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

/// List the source roots to scan: `GOROOT/src`, each `GOPATH/src`, then any
/// extra configured source directories. Roots that do not exist are dropped.
pub fn list_source_roots(config: &Config) -> Vec<SourceRoot> {
    let goroot = config.goroot();
    let mut candidates = Vec::new();

    if let Some(goroot) = &goroot {
        candidates.push(SourceRoot::standard(goroot.join("src")));
    }

    for entry in config.gopath() {
        // Go ignores GOPATH entries that repeat GOROOT or are not absolute
        if goroot.as_ref() == Some(&entry) {
            trace!("Skipping GOPATH entry equal to GOROOT: {}", entry.display());
            continue;
        }
        if !entry.is_absolute() {
            trace!("Skipping relative GOPATH entry: {}", entry.display());
            continue;
        }
        candidates.push(SourceRoot::user(entry.join("src")));
    }

    for dir in &config.source.src_dirs {
        candidates.push(SourceRoot::user(dir.clone()));
    }

    let mut roots: Vec<SourceRoot> = Vec::new();
    for root in candidates {
        if !root.path.is_dir() {
            debug!("Source root does not exist: {}", root.path.display());
            continue;
        }
        if roots.iter().any(|r| r.path == root.path) {
            continue;
        }
        roots.push(root);
    }

    debug!("Using {} source roots", roots.len());
    roots
}
