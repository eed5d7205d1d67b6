//! Category tree entities.

pub mod model;
pub mod tree;

pub use model::{Category, PATH_SEPARATOR, build_path};
pub use tree::{CategoryNode, build_tree};
