//! Working-copy inspection: skip rules, file tree, project profile.

pub mod profile;
pub mod skip;
pub mod tree;

pub use profile::{Manifest, ProjectProfile, MANIFESTS};
pub use skip::SkipMatcher;
pub use tree::{build_tree, FileTree};
