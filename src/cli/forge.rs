//! Forge command implementation

use anyhow::Result;
use clap::Args;
use console::style;

use super::settings::{resolve_config, BundleSettings, FetchSettings};
use crate::fetch::GitCloner;
use crate::forge::{execute, plan, ForgeOutcome, ForgePlan};

#[derive(Args)]
pub struct ForgeArgs {
    /// GitHub repository URL (https://github.com/OWNER/REPO or git@github.com:OWNER/REPO.git)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Skill name (defaults to `<repo>-skill`)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub bundle: BundleSettings,

    #[command(flatten)]
    pub fetch: FetchSettings,
}

pub fn run(args: ForgeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(&cwd, &args.bundle, Some(&args.fetch), args.name)?;

    let plan = plan(&args.url, &config)?;
    if args.fetch.dry_run {
        print_plan(&plan);
        return Ok(());
    }

    let cloner = GitCloner::new(config.clone_depth);
    let outcome = execute(&plan, &config, &cloner)?;
    print_outcome(&outcome);
    Ok(())
}

pub(super) fn print_plan(plan: &ForgePlan) {
    println!("{} nothing fetched or written", style("Dry run:").yellow().bold());
    println!("  Repository: {}", plan.reference);
    println!("  Skill name: {}", plan.skill_name);
    println!("  Skill directory: {}", plan.layout.root.display());
    for (i, attempt) in plan.attempts.iter().enumerate() {
        println!("  Attempt {} ({}): {}", i + 1, attempt.kind, attempt.url);
    }
}

pub(super) fn print_outcome(outcome: &ForgeOutcome) {
    println!("{} Forged skill {}", style("✔").green().bold(), style(&outcome.skill_name).bold());
    println!("  Skill directory: {}", outcome.layout.root.display());
    println!("  Context bundle: {}", outcome.layout.bundle.display());
    println!("  Primary language: {}", outcome.language.unwrap_or("unknown"));
    if outcome.tree_shown < outcome.tree_total {
        println!("  File tree: {} of {} entries", outcome.tree_shown, outcome.tree_total);
    } else {
        println!("  File tree: {} entries", outcome.tree_total);
    }
    if outcome.skipped_files > 0 {
        println!(
            "  {} {} file(s) could not be read and were skipped",
            style("!").yellow(),
            outcome.skipped_files
        );
    }
    println!(
        "Next: replace the description placeholder in {} using the context bundle.",
        outcome.layout.skill_doc.display()
    );
}
