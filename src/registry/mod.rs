// Registry module - the package index every later phase reads from

mod builder;
mod parallel_builder;

pub use builder::RegistryBuilder;
pub use parallel_builder::ParallelRegistryBuilder;

use crate::package::PackageDescriptor;
use std::collections::HashMap;

/// All resolved packages keyed by import path.
///
/// Built once by a registry builder and read-only afterwards. Every key is
/// the `import_path` of the descriptor stored under it.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    packages: HashMap<String, PackageDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor; a later package with the same import path replaces
    /// the earlier one
    pub(crate) fn insert(&mut self, package: PackageDescriptor) -> Option<PackageDescriptor> {
        self.packages.insert(package.import_path.clone(), package)
    }

    pub fn get(&self, import_path: &str) -> Option<&PackageDescriptor> {
        self.packages.get(import_path)
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.packages.contains_key(import_path)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All packages, in no particular order
    pub fn packages(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.values()
    }

    /// All import paths, sorted
    pub fn import_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.packages.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Packages declared as `package main`
    pub fn commands(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.values().filter(|p| p.is_command)
    }
}

impl FromIterator<PackageDescriptor> for Registry {
    fn from_iter<I: IntoIterator<Item = PackageDescriptor>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for package in iter {
            registry.insert(package);
        }
        registry
    }
}
