//! skill-forge: turn GitHub repositories into agent skill skeletons
//!
//! A run fetches a repository, lays out a fixed skill directory and writes a
//! bounded context bundle that a person or agent uses to finish the skill.

pub mod bundle;
pub mod cli;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod forge;
pub mod scan;
pub mod skeleton;
pub mod utils;
