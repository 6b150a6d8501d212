//! deadpkg - find Go packages that no command uses
//!
//! A package is dead when it is not a command (`package main`) and no
//! command imports it, directly or transitively. Test imports count as
//! imports.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Source roots** - GOROOT/src, each GOPATH/src and extra source dirs
//! 2. **Registry building** - Walk every directory and resolve it as a package
//! 3. **Entry point detection** - Commands plus configured patterns
//! 4. **Liveness analysis** - Depth-first walk over imports and test imports
//! 5. **Reporting** - Registry entries the walk never reached

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod graph;
pub mod package;
pub mod registry;
pub mod report;

pub use analysis::{
    CycleDetector, DeadPackage, DeadReport, EntryPointDetector, LivenessAnalyzer, LivenessSet,
    UnresolvedPolicy, VisitOrder,
};
pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use discovery::{list_source_roots, DirectoryWalker, RootKind, SourceRoot};
pub use graph::ImportGraph;
pub use package::{BuildContext, GoOracle, PackageDescriptor, PackageOracle, ResolveError};
pub use registry::{ParallelRegistryBuilder, Registry, RegistryBuilder};
pub use report::{ReportFormat, Reporter};
