//! Skeleton Builder: the fixed skill directory layout.
//!
//! ```text
//! <output_dir>/<skill_name>/
//! ├── SKILL.md
//! ├── context_bundle.md      (written later by the aggregator)
//! ├── .gitignore
//! ├── src/
//! ├── scripts/
//! └── references/
//! ```

use crate::domain::{ForgeError, BUNDLE_FILE_NAME, SKILL_FILE_NAME};
use crate::scan::ProjectProfile;
use crate::utils::write_atomic;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub mod template;

pub use template::{render_skill_doc, TemplateVars, DESCRIPTION_PLACEHOLDER};

/// Files whose presence, without a `requirements.txt`, earns a placeholder.
const PYTHON_BUILD_FILES: &[&str] = &["setup.py", "pyproject.toml", "Pipfile"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLayout {
    pub output_dir: PathBuf,
    pub root: PathBuf,
    pub src: PathBuf,
    pub scripts: PathBuf,
    pub references: PathBuf,
    pub skill_doc: PathBuf,
    pub bundle: PathBuf,
}

impl SkillLayout {
    pub fn new(output_dir: &Path, skill_name: &str) -> Self {
        let root = output_dir.join(skill_name);
        Self {
            output_dir: output_dir.to_path_buf(),
            src: root.join("src"),
            scripts: root.join("scripts"),
            references: root.join("references"),
            skill_doc: root.join(SKILL_FILE_NAME),
            bundle: root.join(BUNDLE_FILE_NAME),
            root,
        }
    }

    /// Fail fast if the skill directory is already there.
    pub fn ensure_absent(&self) -> Result<(), ForgeError> {
        if self.root.exists() {
            return Err(ForgeError::DestinationExists(self.root.clone()));
        }
        Ok(())
    }
}

/// A supplied skill name must be usable verbatim as one directory name.
pub fn validate_skill_name(name: &str) -> Result<(), ForgeError> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(ForgeError::InvalidSkillName(name.to_string()));
    }
    Ok(())
}

/// Removes a half-built skill directory unless [`SkeletonGuard::commit`] is called.
#[must_use = "dropping the guard deletes the skeleton"]
pub struct SkeletonGuard {
    root: PathBuf,
    armed: bool,
}

impl SkeletonGuard {
    pub fn commit(mut self) {
        self.armed = false;
    }
}

impl Drop for SkeletonGuard {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("removing incomplete skill directory {}", self.root.display());
            let _ = fs::remove_dir_all(&self.root);
        }
    }
}

/// Create the layout and its documentation files.
///
/// The skill root is created with a non-recursive `create_dir`, so a
/// directory that appeared since [`SkillLayout::ensure_absent`] still
/// yields [`ForgeError::DestinationExists`] and is left untouched.
pub fn build_skeleton(
    layout: &SkillLayout,
    vars: &TemplateVars<'_>,
    profile: &ProjectProfile,
    template_path: Option<&Path>,
) -> Result<SkeletonGuard> {
    fs::create_dir_all(&layout.output_dir).with_context(|| {
        format!("Failed creating output directory: {}", layout.output_dir.display())
    })?;

    match fs::create_dir(&layout.root) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(ForgeError::DestinationExists(layout.root.clone()).into());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed creating {}", layout.root.display())));
        }
    }
    let guard = SkeletonGuard { root: layout.root.clone(), armed: true };

    for dir in [&layout.src, &layout.scripts, &layout.references] {
        fs::create_dir(dir).with_context(|| format!("Failed creating {}", dir.display()))?;
    }

    write_atomic(&layout.skill_doc, &render_skill_doc(vars, template_path)?)?;
    write_atomic(&layout.root.join(".gitignore"), template::GITIGNORE)?;

    let wants_placeholder = !profile.has_manifest("requirements.txt")
        && PYTHON_BUILD_FILES.iter().any(|f| profile.has_manifest(f));
    if wants_placeholder {
        fs::write(layout.src.join("requirements.txt"), "")
            .context("Failed creating requirements.txt placeholder")?;
        tracing::debug!("created src/requirements.txt placeholder");
    }

    tracing::info!("created skeleton at {}", layout.root.display());
    Ok(guard)
}

/// Create `<output_dir>/README.md` if the library has no index yet.
///
/// Called once the skill is complete, so a failed run never leaves the index
/// naming a removed skill.
pub fn write_library_index(layout: &SkillLayout, vars: &TemplateVars<'_>) -> Result<()> {
    let index = layout.output_dir.join("README.md");
    if !index.exists() {
        write_atomic(&index, &template::library_readme(vars.skill_name, vars.repo_url))?;
    }
    Ok(())
}
