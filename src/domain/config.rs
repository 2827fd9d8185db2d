//! Run configuration assembled once at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fully resolved configuration for one invocation.
///
/// Built from defaults, an optional config file, `SKILL_FORGE_*` environment
/// variables and CLI flags (in increasing precedence), then passed by reference
/// to the fetcher, skeleton builder and aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Replaces the inferred `<repo>-skill` name.
    pub skill_name: Option<String>,
    /// Directory that receives one sub-directory per skill.
    pub output_dir: PathBuf,
    /// Maximum number of entries listed in the bundle's file tree.
    pub max_file_count: usize,
    /// Maximum number of characters kept from any single document.
    pub max_doc_size: usize,
    /// Shallow clone depth; `0` fetches full history.
    pub clone_depth: u32,
    /// Retry through the mirror host when the direct clone fails.
    pub mirror_enabled: bool,
    /// Base URL of the mirror; `<owner>/<repo>.git` is appended.
    pub mirror_base: String,
    /// Entry-name globs hidden from the tree and from language detection.
    pub skip_patterns: Vec<String>,
    /// Custom SKILL.md template with `{{placeholder}}` substitution.
    pub template_path: Option<PathBuf>,
    /// Stamp the bundle header with the generation time.
    pub include_timestamp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skill_name: None,
            output_dir: PathBuf::from(".trae/skills"),
            max_file_count: 100,
            max_doc_size: 20_000,
            clone_depth: 1,
            mirror_enabled: true,
            mirror_base: "https://gitclone.com/github.com".to_string(),
            skip_patterns: default_skip_patterns().iter().map(|s| s.to_string()).collect(),
            template_path: None,
            include_timestamp: true,
        }
    }
}

pub fn default_skip_patterns() -> &'static [&'static str] {
    &[
        ".git",
        ".github",
        ".gitignore",
        ".gitattributes",
        "node_modules",
        "__pycache__",
        "*.pyc",
        ".venv",
        "venv",
        "dist",
        "build",
        "target",
        ".tox",
        ".mypy_cache",
        ".pytest_cache",
        "coverage",
        ".idea",
        ".vscode",
        "*.swp",
        "*.swo",
        "*~",
    ]
}
