//! Command-line interface for skill-forge
//!
//! Provides `forge`, `batch` and `bundle` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod batch;
mod bundle;
mod forge;
mod settings;
mod utils;

/// Turn GitHub repositories into agent skill skeletons
#[derive(Parser)]
#[command(name = "skill-forge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Forge a skill skeleton and context bundle from a GitHub repository
    Forge(Box<forge::ForgeArgs>),

    /// Forge one skill per line of a batch file (`URL [NAME]`)
    Batch(Box<batch::BatchArgs>),

    /// Write a context bundle for a local directory
    Bundle(bundle::BundleArgs),
}

pub fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose, cli.quiet, std::env::var("RUST_LOG").ok().as_deref()))
        .try_init();

    match cli.command {
        Commands::Forge(args) => forge::run(*args),
        Commands::Batch(args) => batch::run(*args),
        Commands::Bundle(args) => bundle::run(args),
    }
}

/// A non-empty `RUST_LOG` wins outright; otherwise the flags pick the level.
fn log_filter(verbose: bool, quiet: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("warning: ignoring invalid RUST_LOG '{directives}': {e}"),
        }
    }
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    EnvFilter::new(level.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn rust_log_takes_precedence_over_flags() {
        let from_env = log_filter(false, false, Some("debug"));
        assert_eq!(from_env.max_level_hint(), Some(LevelFilter::DEBUG));
        let despite_verbose = log_filter(true, false, Some("error"));
        assert_eq!(despite_verbose.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn flags_apply_without_rust_log() {
        assert_eq!(log_filter(true, false, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(false, true, None).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(log_filter(false, false, Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }
}
