//! Core domain types shared across the forge pipeline.

mod config;
mod error;

pub use config::{default_skip_patterns, Config};
pub use error::{AttemptFailure, AttemptKind, ForgeError};

/// File name of the generated context bundle inside a skill directory.
pub const BUNDLE_FILE_NAME: &str = "context_bundle.md";

/// File name of the documentation template inside a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";
