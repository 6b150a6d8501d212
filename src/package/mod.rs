// Package metadata: the descriptor model and the oracles that produce it

mod descriptor;
pub mod go;
mod oracle;

pub use descriptor::PackageDescriptor;
pub use go::{BuildContext, GoOracle};
pub use oracle::{PackageOracle, ResolveError};
