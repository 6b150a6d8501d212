use serde::Serialize;
use std::path::PathBuf;

/// Name a Go package declares to be a command
pub const COMMAND_PACKAGE_NAME: &str = "main";

/// One resolved source package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    /// Canonical import path; the graph node key
    pub import_path: String,

    /// Declared package name
    pub name: String,

    /// Directory the package was resolved from
    pub dir: PathBuf,

    /// The package is an executable entry point
    pub is_command: bool,

    /// The package lives under the standard library root
    pub is_standard: bool,

    /// Imports of the non-test source files, sorted and de-duplicated
    pub imports: Vec<String>,

    /// Imports of in-package test files
    pub test_imports: Vec<String>,

    /// Imports of external test files (`package <name>_test`)
    pub xtest_imports: Vec<String>,
}

impl PackageDescriptor {
    pub fn new(import_path: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            import_path: import_path.into(),
            is_command: name == COMMAND_PACKAGE_NAME,
            name,
            dir: PathBuf::new(),
            is_standard: false,
            imports: Vec::new(),
            test_imports: Vec::new(),
            xtest_imports: Vec::new(),
        }
    }

    /// A library package named after the last element of its import path
    pub fn library(import_path: impl Into<String>) -> Self {
        let import_path = import_path.into();
        let name = import_path
            .rsplit('/')
            .next()
            .unwrap_or(import_path.as_str())
            .to_string();
        Self::new(import_path, name)
    }

    /// A `package main` command
    pub fn command(import_path: impl Into<String>) -> Self {
        Self::new(import_path, COMMAND_PACKAGE_NAME)
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_standard(mut self, is_standard: bool) -> Self {
        self.is_standard = is_standard;
        self
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_test_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_xtest_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.xtest_imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Outgoing edges of this package in the import graph: ordinary imports
    /// followed by test imports, then external test imports when requested
    pub fn edges(&self, include_xtests: bool) -> impl Iterator<Item = &str> {
        let xtests: &[String] = if include_xtests { &self.xtest_imports } else { &[] };
        self.imports
            .iter()
            .chain(self.test_imports.iter())
            .chain(xtests.iter())
            .map(String::as_str)
    }
}
