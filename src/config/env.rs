//! `SKILL_FORGE_*` environment layer.

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;

pub const ENV_PREFIX: &str = "SKILL_FORGE_";

/// Keys (after the prefix, lowercased) parsed as typed values.
const NUMERIC_KEYS: &[&str] = &["max_file_count", "max_doc_size", "clone_depth"];

/// Keys taken verbatim, so `SKILL_FORGE_SKILL_NAME=2048` stays a name.
const STRING_KEYS: &[&str] = &["skill_name", "output_dir", "mirror_base"];

/// Layer recognised `SKILL_FORGE_*` variables over `config`.
pub fn apply_env(config: Config) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(config))
        .merge(Env::prefixed(ENV_PREFIX).only(NUMERIC_KEYS));
    for (key, value) in Env::prefixed(ENV_PREFIX).only(STRING_KEYS).iter() {
        figment = figment.merge(Serialized::default(&key.as_str().to_ascii_lowercase(), value));
    }
    figment.extract().context("Invalid SKILL_FORGE_* environment configuration")
}
