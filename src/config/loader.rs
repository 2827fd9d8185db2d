//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Section name that may wrap the settings inside a shared config file.
const NESTED_SECTION: &str = "skill-forge";

const DISCOVERY_CANDIDATES: &[&str] =
    &["skill-forge.toml", ".skill-forge.toml", ".skill-forge.yml", ".skill-forge.yaml"];

/// Load the config file layer.
///
/// An explicit `config_path` must parse; a file found by discovery under
/// `anchor` only warns on errors and yields the defaults.
pub fn load_config(anchor: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(anchor),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let parsed = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))
        .and_then(|content| parse_config(&content, &config_file));

    match parsed {
        Ok(cfg) => {
            tracing::debug!("loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!("Ignoring auto-discovered config {}: {:#}", config_file.display(), e);
            Ok(Config::default())
        }
    }
}

fn parse_config(content: &str, config_file: &Path) -> Result<Config> {
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(content, config_file),
        "yaml" | "yml" => parse_yaml_config(content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(anchor: &Path) -> Option<PathBuf> {
    DISCOVERY_CANDIDATES.iter().map(|candidate| anchor.join(candidate)).find(|path| path.is_file())
}
