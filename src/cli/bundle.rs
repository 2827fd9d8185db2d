//! Bundle command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use super::settings::{resolve_config, BundleSettings};
use crate::bundle::{aggregate, BundleOptions};
use crate::domain::BUNDLE_FILE_NAME;
use crate::scan::{ProjectProfile, SkipMatcher};
use crate::utils::write_atomic;

#[derive(Args)]
pub struct BundleArgs {
    /// Local directory to summarise
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output file (defaults to `<PATH>/context_bundle.md`)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Title for the bundle header (defaults to the directory name)
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    #[command(flatten)]
    pub settings: BundleSettings,
}

pub fn run(args: BundleArgs) -> Result<()> {
    if !args.path.is_dir() {
        anyhow::bail!("Not a directory: {}", args.path.display());
    }
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Failed resolving {}", args.path.display()))?;

    let cwd = std::env::current_dir()?;
    let config = resolve_config(&cwd, &args.settings, None, None)?;
    let dir_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".into());
    let title = args.title.unwrap_or_else(|| dir_name.clone());

    let skip = SkipMatcher::new(&config.skip_patterns);
    let profile = ProjectProfile::detect(&root, &skip);
    let options = BundleOptions::from_config(title, Some(root.display().to_string()), &config)
        .with_tree_label(dir_name);
    let bundle = aggregate(&root, &profile, &skip, &options)?;

    let output = args.output.unwrap_or_else(|| root.join(BUNDLE_FILE_NAME));
    write_atomic(&output, &bundle.render())?;

    println!("{} Wrote {}", style("✔").green().bold(), output.display());
    if bundle.tree.is_truncated() {
        println!("  File tree: {} of {} entries", bundle.tree.shown(), bundle.tree.total());
    }
    if bundle.skipped_files() > 0 {
        println!("  {} {} file(s) were skipped", style("!").yellow(), bundle.skipped_files());
    }
    Ok(())
}
