//! Project profile: primary language, entry points, dependency manifests.

use super::SkipMatcher;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A well-known dependency manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manifest {
    pub ecosystem: &'static str,
    pub file_name: &'static str,
    /// Info string for the markdown fence.
    pub syntax: &'static str,
}

pub const MANIFESTS: &[Manifest] = &[
    Manifest { ecosystem: "Python", file_name: "requirements.txt", syntax: "text" },
    Manifest { ecosystem: "Python", file_name: "Pipfile", syntax: "toml" },
    Manifest { ecosystem: "Python", file_name: "pyproject.toml", syntax: "toml" },
    Manifest { ecosystem: "Python", file_name: "setup.py", syntax: "python" },
    Manifest { ecosystem: "Node.js", file_name: "package.json", syntax: "json" },
    Manifest { ecosystem: "Go", file_name: "go.mod", syntax: "text" },
    Manifest { ecosystem: "Rust", file_name: "Cargo.toml", syntax: "toml" },
    Manifest { ecosystem: "Java", file_name: "pom.xml", syntax: "xml" },
    Manifest { ecosystem: "Java", file_name: "build.gradle", syntax: "groovy" },
    Manifest { ecosystem: "Java", file_name: "build.gradle.kts", syntax: "kotlin" },
    Manifest { ecosystem: "Ruby", file_name: "Gemfile", syntax: "ruby" },
];

const ENTRY_POINT_NAMES: &[&str] = &[
    "__main__.py",
    "main.py",
    "app.py",
    "cli.py",
    "index.js",
    "main.js",
    "app.js",
    "server.js",
    "index.ts",
    "main.ts",
    "app.ts",
    "main.go",
    "main.rs",
    "lib.rs",
    "Main.java",
    "App.java",
    "main.rb",
];

const ENTRY_POINT_MAX_DEPTH: usize = 3;
pub const ENTRY_POINT_LIMIT: usize = 10;

fn language_for_extension(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "py" => "Python",
        "js" | "mjs" | "cjs" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "go" => "Go",
        "rs" => "Rust",
        "java" => "Java",
        "kt" => "Kotlin",
        "scala" => "Scala",
        "c" => "C",
        "cpp" | "cc" | "cxx" => "C++",
        "cs" => "C#",
        "rb" => "Ruby",
        "php" => "PHP",
        "swift" => "Swift",
        "r" => "R",
        "m" => "Objective-C",
        _ => return None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectProfile {
    pub language: Option<&'static str>,
    /// Relative to the working-copy root.
    pub entry_points: Vec<PathBuf>,
    pub manifests: Vec<Manifest>,
}

impl ProjectProfile {
    pub fn detect(root: &Path, skip: &SkipMatcher) -> Self {
        Self {
            language: detect_language(root, skip),
            entry_points: find_entry_points(root, skip),
            manifests: MANIFESTS
                .iter()
                .copied()
                .filter(|m| root.join(m.file_name).is_file())
                .collect(),
        }
    }

    pub fn has_manifest(&self, file_name: &str) -> bool {
        self.manifests.iter().any(|m| m.file_name == file_name)
    }
}

fn walk_unskipped<'a>(
    root: &Path,
    max_depth: usize,
    skip: &'a SkipMatcher,
) -> impl Iterator<Item = walkdir::DirEntry> + 'a {
    WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| e.depth() == 0 || !skip.is_skipped(&e.file_name().to_string_lossy()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
}

/// Most frequent source language; ties go to the alphabetically first name.
pub fn detect_language(root: &Path, skip: &SkipMatcher) -> Option<&'static str> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for entry in walk_unskipped(root, usize::MAX, skip) {
        let ext = entry.path().extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        if let Some(lang) = language_for_extension(&ext) {
            *counts.entry(lang).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.first().map(|(lang, _)| *lang)
}

/// Well-known entry files at most three levels deep, in entry-name order.
pub fn find_entry_points(root: &Path, skip: &SkipMatcher) -> Vec<PathBuf> {
    let mut found: Vec<(usize, PathBuf)> = walk_unskipped(root, ENTRY_POINT_MAX_DEPTH, skip)
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            let rank = ENTRY_POINT_NAMES.iter().position(|n| *n == name)?;
            let rel = entry.path().strip_prefix(root).ok()?.to_path_buf();
            Some((rank, rel))
        })
        .collect();

    found.sort();
    found.into_iter().take(ENTRY_POINT_LIMIT).map(|(_, rel)| rel).collect()
}
