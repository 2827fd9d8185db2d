//! Flags shared between subcommands and their resolution into a [`Config`].

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use super::utils::parse_csv;
use crate::config::{apply_env, load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;

/// Limits that shape the context bundle.
#[derive(Args, Debug, Default)]
pub struct BundleSettings {
    /// Path to config file (skill-forge.toml or .skill-forge.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum entries listed in the file tree
    #[arg(long, value_name = "N")]
    pub max_file_count: Option<usize>,

    /// Maximum characters kept from each document
    #[arg(long, value_name = "CHARS")]
    pub max_doc_size: Option<usize>,

    /// Additional names or globs to skip (comma-separated)
    #[arg(long, value_name = "PATTERNS")]
    pub skip: Option<String>,

    /// Omit the generation timestamp from the bundle header
    #[arg(long)]
    pub no_timestamp: bool,
}

/// Where skills go and how repositories are fetched.
#[derive(Args, Debug, Default)]
pub struct FetchSettings {
    /// Directory that receives skill directories
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Clone depth (0 clones full history)
    #[arg(long, value_name = "N")]
    pub depth: Option<u32>,

    /// Do not retry through the mirror host when the direct clone fails
    #[arg(long)]
    pub no_mirror: bool,

    /// Mirror base URL used for the fallback clone
    #[arg(long, value_name = "URL")]
    pub mirror_base: Option<String>,

    /// Custom SKILL.md template
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Validate and print the plan without fetching or writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl BundleSettings {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_file_count: self.max_file_count,
            max_doc_size: self.max_doc_size,
            skip_patterns: parse_csv(&self.skip),
            include_timestamp: self.no_timestamp.then_some(false),
            ..CliOverrides::default()
        }
    }
}

impl FetchSettings {
    fn apply(&self, overrides: &mut CliOverrides) {
        overrides.output_dir = self.output_dir.clone();
        overrides.clone_depth = self.depth;
        overrides.mirror_enabled = self.no_mirror.then_some(false);
        overrides.mirror_base = self.mirror_base.clone();
        overrides.template_path = self.template.clone();
    }
}

/// Layer defaults, config file, environment and flags, lowest first.
pub fn resolve_config(
    anchor: &Path,
    bundle: &BundleSettings,
    fetch: Option<&FetchSettings>,
    skill_name: Option<String>,
) -> Result<Config> {
    let file_config = load_config(anchor, bundle.config.as_deref())?;
    let env_config = apply_env(file_config)?;

    let mut overrides = bundle.overrides();
    if let Some(fetch) = fetch {
        fetch.apply(&mut overrides);
    }
    overrides.skill_name = skill_name;

    let config = merge_cli_with_config(env_config, overrides);
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}
