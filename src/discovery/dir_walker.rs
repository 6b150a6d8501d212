use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Lazily yields every directory under a source root, the root included.
///
/// Files and symlinks are skipped. Directories that cannot be read are
/// pushed to the diagnostic sink and the walk carries on with the rest of
/// the tree. Excluded directories are skipped along with their subtree.
pub struct DirectoryWalker<'a> {
    root: PathBuf,
    inner: walkdir::IntoIter,
    config: &'a Config,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(root: &Path, config: &'a Config, diagnostics: &'a mut Diagnostics) -> Self {
        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            root: root.to_path_buf(),
            inner,
            config,
            diagnostics,
        }
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        let Ok(relative) = dir.strip_prefix(&self.root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }

        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        self.config.should_exclude(&relative)
    }
}

impl Iterator for DirectoryWalker<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if !entry.file_type().is_dir() {
                        continue;
                    }
                    if self.is_excluded(entry.path()) {
                        trace!("Excluding: {}", entry.path().display());
                        self.inner.skip_current_dir();
                        continue;
                    }
                    return Some(entry.into_path());
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    self.diagnostics.push(Diagnostic::Walk {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}
