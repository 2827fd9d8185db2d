//! Context Aggregator.
//!
//! Produces the single bounded-size summary of a working copy. Sections are
//! always emitted in the same order: header, file tree, README, key documents,
//! dependency manifests, entry points. Unreadable individual files are recorded as
//! skipped in their section; only an unreadable root aborts.

use crate::domain::{Config, ForgeError};
use crate::scan::{build_tree, FileTree, ProjectProfile, SkipMatcher};
use crate::utils::{display_relative, normalize_path};
use std::fs;
use std::path::{Path, PathBuf};

pub mod excerpt;
pub mod render;

pub use excerpt::{read_excerpt, Excerpt, FileRead, Shaping};
pub use render::render_bundle;

/// Lines kept from each entry-point file before truncation applies.
const ENTRY_POINT_LINES: usize = 100;

/// README extensions in order of preference; `""` is a bare `README`.
const README_EXTENSIONS: &[&str] = &["md", "markdown", "rst", "txt", "adoc", "org", ""];

/// Name prefixes of project documents listed after the README, in bundle order.
const KEY_DOCUMENT_PREFIXES: &[&str] =
    &["readme", "contributing", "authors", "license", "changelog"];

#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub title: String,
    /// Name shown on the first line of the file tree.
    pub tree_label: String,
    pub source: Option<String>,
    pub max_file_count: usize,
    pub max_doc_size: usize,
    pub include_timestamp: bool,
}

impl BundleOptions {
    pub fn from_config(title: impl Into<String>, source: Option<String>, config: &Config) -> Self {
        let title = title.into();
        Self {
            tree_label: title.clone(),
            title,
            source,
            max_file_count: config.max_file_count,
            max_doc_size: config.max_doc_size,
            include_timestamp: config.include_timestamp,
        }
    }

    pub fn with_tree_label(mut self, label: impl Into<String>) -> Self {
        self.tree_label = label.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBundle {
    pub title: String,
    pub source: Option<String>,
    pub language: Option<&'static str>,
    pub generated_at: Option<String>,
    pub tree: FileTree,
    pub readme: Option<Excerpt>,
    pub key_documents: Vec<Excerpt>,
    pub manifests: Vec<Excerpt>,
    pub entry_points: Vec<Excerpt>,
}

impl ContextBundle {
    pub fn render(&self) -> String {
        render_bundle(self)
    }

    pub fn skipped_files(&self) -> usize {
        self.readme
            .iter()
            .chain(&self.key_documents)
            .chain(&self.manifests)
            .chain(&self.entry_points)
            .filter(|e| e.is_skipped())
            .count()
    }
}

pub fn aggregate(
    root: &Path,
    profile: &ProjectProfile,
    skip: &SkipMatcher,
    options: &BundleOptions,
) -> Result<ContextBundle, ForgeError> {
    let tree = build_tree(root, &options.tree_label, options.max_file_count, skip)?;
    let limit = options.max_doc_size;

    let readme_path = find_readme(root);
    let document = |path: &Path| Excerpt {
        heading: display_relative(root, path),
        syntax: doc_syntax(path),
        read: read_excerpt(path, limit, Shaping::Verbatim),
    };
    let readme = readme_path.as_deref().map(document);
    let key_documents = find_key_documents(root, readme_path.as_deref())
        .iter()
        .map(|path| document(path.as_path()))
        .collect();

    let manifests = profile
        .manifests
        .iter()
        .map(|m| Excerpt {
            heading: format!("{}: {}", m.ecosystem, m.file_name),
            syntax: m.syntax,
            read: read_excerpt(&root.join(m.file_name), limit, Shaping::Manifest),
        })
        .collect();

    let entry_points = profile
        .entry_points
        .iter()
        .map(|rel| Excerpt {
            heading: format!(
                "{} (first {} lines)",
                normalize_path(&rel.to_string_lossy()),
                ENTRY_POINT_LINES
            ),
            syntax: syntax_for(rel),
            read: read_excerpt(&root.join(rel), limit, Shaping::Head(ENTRY_POINT_LINES)),
        })
        .collect();

    let generated_at = options
        .include_timestamp
        .then(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

    Ok(ContextBundle {
        title: options.title.clone(),
        source: options.source.clone(),
        language: profile.language,
        generated_at,
        tree,
        readme,
        key_documents,
        manifests,
        entry_points,
    })
}

/// README-like file at the root, matched case-insensitively.
pub fn find_readme(root: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<(usize, String, PathBuf)> = fs::read_dir(root)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let lower = name.to_ascii_lowercase();
            let ext = match lower.strip_prefix("readme")? {
                "" => "",
                rest => rest.strip_prefix('.')?,
            };
            let rank = README_EXTENSIONS.iter().position(|e| *e == ext)?;
            Some((rank, name, entry.path()))
        })
        .collect();

    candidates.sort();
    candidates.into_iter().next().map(|(_, _, path)| path)
}

/// Root-level CONTRIBUTING, AUTHORS, LICENSE and CHANGELOG files, plus README
/// variants other than `readme`. Grouped by prefix, then sorted by name.
pub fn find_key_documents(root: &Path, readme: Option<&Path>) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut found: Vec<(usize, String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| Some(entry.path().as_path()) != readme)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let lower = name.to_ascii_lowercase();
            let rank = KEY_DOCUMENT_PREFIXES.iter().position(|p| lower.starts_with(p))?;
            Some((rank, name, entry.path()))
        })
        .collect();

    found.sort();
    found.into_iter().map(|(_, _, path)| path).collect()
}

fn doc_syntax(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("md" | "markdown") => "markdown",
        Some("rst") => "rst",
        _ => "text",
    }
}

fn syntax_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "rb" => "ruby",
        _ => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(max_file_count: usize, max_doc_size: usize) -> BundleOptions {
        BundleOptions {
            title: "demo-skill".to_string(),
            tree_label: "demo".to_string(),
            source: Some("https://github.com/acme/demo".to_string()),
            max_file_count,
            max_doc_size,
            include_timestamp: false,
        }
    }

    fn bundle_for(root: &Path, opts: &BundleOptions) -> ContextBundle {
        let skip = SkipMatcher::default();
        let profile = ProjectProfile::detect(root, &skip);
        aggregate(root, &profile, &skip, opts).expect("aggregate")
    }

    #[test]
    fn readme_lookup_is_case_insensitive_and_prefers_markdown() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("readme.txt"), "plain").expect("write");
        fs::write(tmp.path().join("ReadMe.MD"), "# md").expect("write");
        fs::write(tmp.path().join("README-zh.md"), "# zh").expect("write");
        let found = find_readme(tmp.path()).expect("readme");
        assert_eq!(found.file_name().and_then(|n| n.to_str()), Some("ReadMe.MD"));
    }

    #[test]
    fn readme_absent_returns_none() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir(tmp.path().join("README.md")).expect("dir named like a readme");
        assert!(find_readme(tmp.path()).is_none());
    }

    #[test]
    fn end_to_end_small_repository_is_untruncated_and_ordered() {
        let tmp = TempDir::new().expect("tmp");
        let readme: String = (1..=50).map(|i| format!("README line {i}\n")).collect();
        fs::write(tmp.path().join("README.md"), &readme).expect("readme");
        fs::write(tmp.path().join("requirements.txt"), "flask==3.0\nrequests>=2.31\n")
            .expect("reqs");
        fs::create_dir(tmp.path().join("app")).expect("mkdir");
        fs::write(tmp.path().join("app/main.py"), "print('hi')\n").expect("main");

        let bundle = bundle_for(tmp.path(), &options(100, 5000));
        assert!(!bundle.tree.is_truncated());
        let text = bundle.render();

        let tree_at = text.find("## File Tree").expect("tree header");
        let readme_at = text.find("## README").expect("readme header");
        let deps_at = text.find("## Dependency Manifests").expect("deps header");
        assert!(tree_at < readme_at && readme_at < deps_at);

        assert!(text.contains(&readme));
        assert!(text.contains("### Python: requirements.txt"));
        assert!(text.contains("flask==3.0\nrequests>=2.31\n"));
        assert!(text.contains("app/main.py (first 100 lines)"));
        assert!(!text.contains("truncated"));
        assert_eq!(bundle.skipped_files(), 0);
    }

    #[test]
    fn no_manifests_is_stated_explicitly() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("notes.txt"), "hello").expect("write");
        let text = bundle_for(tmp.path(), &options(10, 100)).render();
        let deps = text.split("## Dependency Manifests").nth(1).expect("section");
        assert!(deps.trim_start().starts_with("_None found._"));
        assert!(text.contains("_No README found._"));
    }

    #[test]
    fn long_readme_is_truncated_with_marker() {
        let tmp = TempDir::new().expect("tmp");
        let original = "abcdefghij".repeat(50);
        fs::write(tmp.path().join("README"), &original).expect("write");

        let bundle = bundle_for(tmp.path(), &options(10, 120));
        match &bundle.readme.as_ref().expect("readme").read {
            FileRead::Included { text, truncated, .. } => {
                assert!(*truncated);
                assert_eq!(text.chars().count(), 120);
                assert!(original.starts_with(text.as_str()));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(bundle.render().contains("showing the first 120 of 500 characters"));
    }

    #[test]
    fn binary_manifest_is_noted_not_fatal() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("package.json"), [0u8, 159, 146, 150]).expect("write");
        let bundle = bundle_for(tmp.path(), &options(10, 100));
        assert_eq!(bundle.skipped_files(), 1);
        assert!(bundle.render().contains("> Skipped: binary or undecodable content"));
    }

    #[test]
    fn header_carries_title_source_and_language() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("lib.rs"), "pub fn x() {}\n").expect("write");
        let text = bundle_for(tmp.path(), &options(10, 100)).render();
        assert!(text.starts_with("# Context Bundle: demo-skill\n"));
        assert!(text.contains("- **Source:** https://github.com/acme/demo"));
        assert!(text.contains("- **Primary language:** Rust"));
        assert!(!text.contains("**Generated:**"));
    }

    #[test]
    fn key_documents_follow_the_readme() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("README.md"), "# Demo\n").expect("write");
        fs::write(tmp.path().join("README-zh.md"), "# 演示\n").expect("write");
        fs::write(tmp.path().join("LICENSE"), "MIT License\n").expect("write");
        fs::write(tmp.path().join("CHANGELOG.md"), "## 1.0.0\n").expect("write");
        fs::write(tmp.path().join("CONTRIBUTING.md"), "Send patches.\n").expect("write");
        fs::create_dir(tmp.path().join("AUTHORS")).expect("dir is not a document");

        let bundle = bundle_for(tmp.path(), &options(10, 100));
        let headings: Vec<&str> =
            bundle.key_documents.iter().map(|e| e.heading.as_str()).collect();
        assert_eq!(headings, vec!["README-zh.md", "CONTRIBUTING.md", "LICENSE", "CHANGELOG.md"]);

        let text = bundle.render();
        let readme_at = text.find("## README").expect("readme");
        let docs_at = text.find("## Key Documents").expect("key documents");
        let deps_at = text.find("## Dependency Manifests").expect("deps");
        assert!(readme_at < docs_at && docs_at < deps_at);
        assert!(text.contains("MIT License"));
    }

    #[test]
    fn key_documents_are_truncated_like_the_readme() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("LICENSE.txt"), "x".repeat(300)).expect("write");
        let bundle = bundle_for(tmp.path(), &options(10, 50));
        match &bundle.key_documents[0].read {
            FileRead::Included { text, truncated, original_chars } => {
                assert!(*truncated);
                assert_eq!(text.len(), 50);
                assert_eq!(*original_chars, 300);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tree_uses_the_configured_label() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("main.go"), "package main\n").expect("write");
        let bundle = bundle_for(tmp.path(), &options(10, 100));
        assert!(bundle.tree.render().starts_with("demo/\n"));
    }

    #[test]
    fn truncated_readme_cannot_leak_an_open_fence() {
        let tmp = TempDir::new().expect("tmp");
        let readme = format!("# Demo\n\n```bash\n{}\n```\n", "echo hi\n".repeat(40));
        fs::write(tmp.path().join("README.md"), &readme).expect("write");
        fs::write(tmp.path().join("go.mod"), "module demo\n").expect("write");

        let text = bundle_for(tmp.path(), &options(10, 60)).render();
        let deps = text.split("## Dependency Manifests").nth(1).expect("section");
        let before_deps = &text[..text.len() - deps.len()];
        let outer_fences = before_deps
            .lines()
            .filter(|line| line.starts_with("````"))
            .count();
        assert_eq!(outer_fences, 2, "README fence must be opened and closed");
        assert!(deps.contains("module demo"));
    }

    #[cfg(unix)]
    #[test]
    fn permission_denied_manifest_is_skipped_and_the_run_continues() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("README.md"), "# Demo\n").expect("write");
        let locked = tmp.path().join("Cargo.toml");
        fs::write(&locked, "[package]\nname = \"demo\"\n").expect("write");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read(&locked).is_ok() {
            // Running as root: permissions are not enforced.
            return;
        }

        let bundle = bundle_for(tmp.path(), &options(10, 100));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).expect("chmod");

        assert_eq!(bundle.skipped_files(), 1);
        let text = bundle.render();
        assert!(text.contains("### Rust: Cargo.toml\n\n> Skipped:"));
        assert!(text.contains("# Demo"));
    }
}
