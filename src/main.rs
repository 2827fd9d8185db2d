//! skill-forge: turn GitHub repositories into agent skill skeletons
//!
//! Fetches a repository, creates a skill directory with a SKILL.md template
//! and writes a context bundle summarising the upstream project.

use anyhow::Result;

fn main() -> Result<()> {
    skill_forge::cli::run()
}
