//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

pub mod env;
pub mod loader;
pub mod merge;

pub use env::{apply_env, ENV_PREFIX};
pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};
