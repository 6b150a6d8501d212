//! Non-fatal problems collected during a run.
//!
//! Nothing recorded here aborts the analysis. The binary prints the
//! collected diagnostics to stderr once the report has been written.

use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// A single non-fatal problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A directory under a source root could not be read
    Walk { path: PathBuf, message: String },

    /// An import names a package that is not in the registry
    UnresolvedImport { import: String, importer: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Walk { path, message } => {
                write!(f, "error walking {:?}: {}", path.display().to_string(), message)
            }
            Diagnostic::UnresolvedImport { import, importer } => {
                write!(f, "package {:?} not found (imported by {:?})", import, importer)
            }
        }
    }
}

/// Diagnostic sink shared by the directory walk and the liveness walk
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        debug!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Unresolved imports as `(import, importer)` pairs, in the order found
    pub fn unresolved_imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|d| match d {
            Diagnostic::UnresolvedImport { import, importer } => {
                Some((import.as_str(), importer.as_str()))
            }
            Diagnostic::Walk { .. } => None,
        })
    }

    pub fn walk_errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| matches!(d, Diagnostic::Walk { .. }))
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
