//! Bounded directory tree for the context bundle.
//!
//! Order is depth-first pre-order: directories before files within a level,
//! each group sorted by name. Every listed directory or file is one entry;
//! once `limit` entries are listed the rest are only counted.

use super::SkipMatcher;
use crate::domain::ForgeError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    root_label: String,
    lines: Vec<String>,
    total_entries: usize,
}

impl FileTree {
    pub fn shown(&self) -> usize {
        self.lines.len()
    }

    pub fn total(&self) -> usize {
        self.total_entries
    }

    pub fn omitted(&self) -> usize {
        self.total_entries - self.lines.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.omitted() > 0
    }

    pub fn render(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 2);
        out.push(format!("{}/", self.root_label));
        out.extend(self.lines.iter().cloned());
        if self.is_truncated() {
            out.push(format!("… and {} more", self.omitted()));
        }
        out.join("\n")
    }
}

struct Walk<'a> {
    skip: &'a SkipMatcher,
    limit: usize,
    lines: Vec<String>,
    total: usize,
}

impl Walk<'_> {
    fn record(&mut self, line: String) {
        self.total += 1;
        if self.lines.len() < self.limit {
            self.lines.push(line);
        }
    }
}

/// Build the tree for `root`, headed by `label` and listing at most `limit` entries.
///
/// Only an unreadable `root` is fatal; unreadable subdirectories are listed
/// with an `[unreadable]` note.
pub fn build_tree(
    root: &Path,
    label: &str,
    limit: usize,
    skip: &SkipMatcher,
) -> Result<FileTree, ForgeError> {
    let entries = read_sorted(root, skip)
        .map_err(|source| ForgeError::UnreadableRoot { path: root.to_path_buf(), source })?;

    let mut walk = Walk { skip, limit, lines: Vec::new(), total: 0 };
    walk_entries(entries, "", &mut walk);

    if walk.total > walk.lines.len() {
        tracing::debug!(
            shown = walk.lines.len(),
            total = walk.total,
            "file tree truncated at {} entries",
            limit
        );
    }

    Ok(FileTree { root_label: label.to_string(), lines: walk.lines, total_entries: walk.total })
}

fn walk_entries(entries: Vec<(bool, String, PathBuf)>, prefix: &str, walk: &mut Walk<'_>) {
    let count = entries.len();
    for (idx, (is_dir, name, path)) in entries.into_iter().enumerate() {
        let is_last = idx + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };

        if !is_dir {
            walk.record(format!("{prefix}{connector}{name}"));
            continue;
        }

        match read_sorted(&path, walk.skip) {
            Ok(children) => {
                walk.record(format!("{prefix}{connector}{name}/"));
                let extension = if is_last { "    " } else { "│   " };
                walk_entries(children, &format!("{prefix}{extension}"), walk);
            }
            Err(e) => {
                tracing::warn!("cannot list {}: {}", path.display(), e);
                walk.record(format!("{prefix}{connector}{name}/ [unreadable]"));
            }
        }
    }
}

fn read_sorted(dir: &Path, skip: &SkipMatcher) -> io::Result<Vec<(bool, String, PathBuf)>> {
    let mut entries: Vec<(bool, String, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let file_type = entry.file_type().ok()?;
            let name = entry.file_name().to_string_lossy().to_string();
            if skip.is_skipped(&name) {
                return None;
            }
            Some((file_type.is_dir(), name, entry.path()))
        })
        .collect();

    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir_all(root.join("src/util")).expect("mkdir");
        fs::create_dir_all(root.join(".git/objects")).expect("mkdir git");
        fs::write(root.join(".git/HEAD"), "ref").expect("head");
        fs::write(root.join("src/util/strings.rs"), "").expect("write");
        fs::write(root.join("src/main.rs"), "fn main() {}\n").expect("write");
        fs::write(root.join("README.md"), "# Demo\n").expect("write");
        fs::write(root.join("Cargo.toml"), "[package]\n").expect("write");
        tmp
    }

    #[test]
    fn lists_dirs_first_then_files_alphabetically() {
        let tmp = fixture();
        let tree = build_tree(tmp.path(), "demo", 100, &SkipMatcher::default()).expect("tree");
        let rendered = tree.render();
        let body: Vec<&str> = rendered.lines().skip(1).collect();
        similar_asserts::assert_eq!(
            body,
            vec![
                "├── src/",
                "│   ├── util/",
                "│   │   └── strings.rs",
                "│   └── main.rs",
                "├── Cargo.toml",
                "└── README.md",
            ]
        );
        assert!(!tree.is_truncated());
        assert!(!rendered.contains(".git"));
    }

    #[test]
    fn limit_caps_entries_and_reports_the_rest() {
        let tmp = fixture();
        let tree = build_tree(tmp.path(), "demo", 3, &SkipMatcher::default()).expect("tree");
        assert_eq!(tree.shown(), 3);
        assert_eq!(tree.total(), 6);
        let rendered = tree.render();
        assert!(rendered.ends_with("… and 3 more"));
        assert_eq!(rendered.lines().count(), 1 + 3 + 1);
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let tmp = fixture();
        let tree = build_tree(tmp.path(), "demo", 6, &SkipMatcher::default()).expect("tree");
        assert!(!tree.is_truncated());
        assert!(!tree.render().contains("more"));
    }

    #[test]
    fn skip_patterns_hide_entries_and_their_contents() {
        let tmp = fixture();
        fs::create_dir_all(tmp.path().join("node_modules/left-pad")).expect("mkdir");
        fs::write(tmp.path().join("node_modules/left-pad/index.js"), "").expect("write");
        let skip = SkipMatcher::new(&["node_modules".to_string()]);
        let tree = build_tree(tmp.path(), "demo", 100, &skip).expect("tree");
        assert_eq!(tree.total(), 6);
        assert!(!tree.render().contains("left-pad"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let err = build_tree(&tmp.path().join("gone"), "demo", 10, &SkipMatcher::default())
            .expect_err("should fail");
        assert!(matches!(err, ForgeError::UnreadableRoot { .. }));
    }

    #[test]
    fn root_line_uses_the_label() {
        let tmp = fixture();
        let tree = build_tree(tmp.path(), "widget", 100, &SkipMatcher::default()).expect("tree");
        assert_eq!(tree.render().lines().next(), Some("widget/"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_noted_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = fixture();
        let locked = tmp.path().join("src/util");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read_dir(&locked).is_ok() {
            // Running as root: permissions are not enforced.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
            return;
        }

        let result = build_tree(tmp.path(), "demo", 100, &SkipMatcher::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        let rendered = result.expect("tree").render();
        assert!(rendered.contains("│   ├── util/ [unreadable]"));
        assert!(!rendered.contains("strings.rs"));
        assert!(rendered.contains("main.rs"));
    }
}
