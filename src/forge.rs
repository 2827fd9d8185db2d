//! The forge pipeline: Fetch → Skeleton → Aggregate → Report.
//!
//! Validation and the destination check happen in [`plan`], before any
//! network or filesystem side effect. [`execute`] then runs the stages in
//! order; a failure after the skeleton exists removes it again.

use crate::bundle::{aggregate, BundleOptions};
use crate::domain::{Config, ForgeError};
use crate::fetch::{fetch_working_copy, plan_attempts, Cloner, FetchAttempt, RepoRef};
use crate::scan::{ProjectProfile, SkipMatcher};
use crate::skeleton::{
    build_skeleton, validate_skill_name, write_library_index, SkillLayout, TemplateVars,
};
use crate::utils::{normalize_path, write_atomic};
use anyhow::Result;
use std::fs;
use tracing::info;

/// A validated request, ready to run.
#[derive(Debug, Clone)]
pub struct ForgePlan {
    pub reference: RepoRef,
    pub skill_name: String,
    pub layout: SkillLayout,
    pub attempts: Vec<FetchAttempt>,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ForgeOutcome {
    pub skill_name: String,
    pub layout: SkillLayout,
    pub language: Option<&'static str>,
    pub tree_shown: usize,
    pub tree_total: usize,
    pub skipped_files: usize,
}

/// Validate the reference and name, and refuse an existing destination.
pub fn plan(reference: &str, config: &Config) -> Result<ForgePlan, ForgeError> {
    let reference = RepoRef::parse(reference)?;
    let skill_name = match &config.skill_name {
        Some(name) => {
            validate_skill_name(name)?;
            name.clone()
        }
        None => reference.default_skill_name(),
    };

    let layout = SkillLayout::new(&config.output_dir, &skill_name);
    layout.ensure_absent()?;

    let attempts = plan_attempts(&reference, config);
    Ok(ForgePlan { reference, skill_name, layout, attempts })
}

pub fn execute(plan: &ForgePlan, config: &Config, cloner: &dyn Cloner) -> Result<ForgeOutcome> {
    let working_copy = fetch_working_copy(&plan.reference, config, cloner)?;
    let root = working_copy.root();

    fs::read_dir(root)
        .map_err(|source| ForgeError::UnreadableRoot { path: root.to_path_buf(), source })?;

    let skip = SkipMatcher::new(&config.skip_patterns);
    let profile = ProjectProfile::detect(root, &skip);
    let entry_file = profile.entry_points.first().map(|p| normalize_path(&p.to_string_lossy()));

    let vars = TemplateVars {
        skill_name: &plan.skill_name,
        repo_url: plan.reference.as_str(),
        language: profile.language,
        description: None,
        entry_file: entry_file.as_deref(),
    };
    let guard = build_skeleton(&plan.layout, &vars, &profile, config.template_path.as_deref())?;

    let options =
        BundleOptions::from_config(&plan.skill_name, Some(plan.reference.to_string()), config)
            .with_tree_label(plan.reference.name());
    let bundle = aggregate(root, &profile, &skip, &options)?;
    write_atomic(&plan.layout.bundle, &bundle.render())?;
    info!("wrote context bundle to {}", plan.layout.bundle.display());

    guard.commit();
    write_library_index(&plan.layout, &vars)?;

    Ok(ForgeOutcome {
        skill_name: plan.skill_name.clone(),
        layout: plan.layout.clone(),
        language: bundle.language,
        tree_shown: bundle.tree.shown(),
        tree_total: bundle.tree.total(),
        skipped_files: bundle.skipped_files(),
    })
}

pub fn forge_skill(reference: &str, config: &Config, cloner: &dyn Cloner) -> Result<ForgeOutcome> {
    let plan = plan(reference, config)?;
    execute(&plan, config, cloner)
}
