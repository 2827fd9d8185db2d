//! Batch command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;

use super::forge::{print_outcome, print_plan};
use super::settings::{resolve_config, BundleSettings, FetchSettings};
use crate::domain::Config;
use crate::fetch::GitCloner;
use crate::forge::{execute, plan};

#[derive(Args)]
pub struct BatchArgs {
    /// File with one `URL [NAME]` per line; `#` starts a comment
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub bundle: BundleSettings,

    #[command(flatten)]
    pub fetch: FetchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub line: usize,
    pub url: String,
    pub name: Option<String>,
}

pub fn parse_batch(content: &str) -> Vec<BatchEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = raw.split('#').next().unwrap_or("").trim();
            let mut parts = line.split_whitespace();
            let url = parts.next()?.to_string();
            let name = parts.next().map(str::to_string);
            if parts.next().is_some() {
                tracing::warn!("line {}: ignoring text after the skill name", idx + 1);
            }
            Some(BatchEntry { line: idx + 1, url, name })
        })
        .collect()
}

pub fn run(args: BatchArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed reading batch file: {}", args.file.display()))?;
    let entries = parse_batch(&content);
    if entries.is_empty() {
        anyhow::bail!("No repositories listed in {}", args.file.display());
    }

    let cwd = std::env::current_dir()?;
    let base = resolve_config(&cwd, &args.bundle, Some(&args.fetch), None)?;

    let mut failed = Vec::new();
    for entry in &entries {
        // A name from the environment or config file would collide across lines.
        let config = Config { skill_name: entry.name.clone(), ..base.clone() };
        if let Err(err) = forge_entry(entry, &config, args.fetch.dry_run) {
            let mark = style("✘").red().bold();
            eprintln!("{} {} (line {}): {:#}", mark, entry.url, entry.line, err);
            failed.push(entry);
        }
    }

    let succeeded = entries.len() - failed.len();
    println!(
        "Batch finished: {} succeeded, {} failed",
        style(succeeded).green(),
        style(failed.len()).red()
    );
    if !failed.is_empty() {
        anyhow::bail!("{} of {} repositories failed", failed.len(), entries.len());
    }
    Ok(())
}

fn forge_entry(entry: &BatchEntry, config: &Config, dry_run: bool) -> Result<()> {
    let plan = plan(&entry.url, config)?;
    if dry_run {
        print_plan(&plan);
        return Ok(());
    }
    let outcome = execute(&plan, config, &GitCloner::new(config.clone_depth))?;
    print_outcome(&outcome);
    Ok(())
}
