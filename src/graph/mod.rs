//! Import graph over a finished registry.
//!
//! The liveness walk reads the registry directly; this petgraph view exists
//! for whole-graph algorithms such as strongly connected components.

use crate::registry::Registry;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Which import list an edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Import,
    TestImport,
    XTestImport,
}

/// Directed graph of packages, edges from importer to imported package.
///
/// Imports with no registry entry have no node and no edge.
#[derive(Debug)]
pub struct ImportGraph {
    inner: DiGraph<String, ImportKind>,
    node_map: HashMap<String, NodeIndex>,
}

impl ImportGraph {
    pub fn from_registry(registry: &Registry, include_xtests: bool) -> Self {
        let mut inner = DiGraph::new();
        let mut node_map = HashMap::new();

        // Sorted so node indices are stable across runs
        for path in registry.import_paths() {
            let idx = inner.add_node(path.to_string());
            node_map.insert(path.to_string(), idx);
        }

        for package in registry.packages() {
            let from = node_map[&package.import_path];
            let mut lists = vec![
                (&package.imports, ImportKind::Import),
                (&package.test_imports, ImportKind::TestImport),
            ];
            if include_xtests {
                lists.push((&package.xtest_imports, ImportKind::XTestImport));
            }

            for (imports, kind) in lists {
                for import in imports {
                    if let Some(&to) = node_map.get(import) {
                        inner.add_edge(from, to, kind);
                    }
                }
            }
        }

        Self { inner, node_map }
    }

    /// Get the underlying petgraph for advanced operations
    pub fn inner(&self) -> &DiGraph<String, ImportKind> {
        &self.inner
    }

    pub fn node_index(&self, import_path: &str) -> Option<NodeIndex> {
        self.node_map.get(import_path).copied()
    }

    pub fn import_path(&self, idx: NodeIndex) -> Option<&str> {
        self.inner.node_weight(idx).map(String::as_str)
    }

    pub fn package_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Import paths of the packages importing `import_path`, sorted
    pub fn importers_of(&self, import_path: &str) -> Vec<&str> {
        let Some(idx) = self.node_index(import_path) else {
            return Vec::new();
        };

        let mut importers: Vec<&str> = self
            .inner
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.import_path(edge.source()))
            .collect();
        importers.sort_unstable();
        importers.dedup();
        importers
    }
}
