mod dir_walker;
mod source_roots;

pub use dir_walker::DirectoryWalker;
pub use source_roots::{list_source_roots, RootKind, SourceRoot};
