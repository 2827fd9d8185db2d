//! SKILL.md and companion file templates.

use anyhow::{Context, Result};
use std::path::Path;

pub const DESCRIPTION_PLACEHOLDER: &str = "<one-line description of what this skill does>";

/// Values substituted into the documentation template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub skill_name: &'a str,
    pub repo_url: &'a str,
    pub language: Option<&'a str>,
    pub description: Option<&'a str>,
    pub entry_file: Option<&'a str>,
}

impl TemplateVars<'_> {
    fn description(&self) -> &str {
        self.description.unwrap_or(DESCRIPTION_PLACEHOLDER)
    }

    fn tags(&self) -> Vec<String> {
        let mut tags = vec![self.skill_name.trim_end_matches("-skill").to_string()];
        if let Some(lang) = self.language {
            tags.push(lang.to_ascii_lowercase());
        }
        tags
    }
}

/// Render SKILL.md from `template_path`, or the built-in template.
///
/// Custom templates may use `{{skill_name}}`, `{{repo_url}}`,
/// `{{language}}` and `{{description}}`.
pub fn render_skill_doc(vars: &TemplateVars<'_>, template_path: Option<&Path>) -> Result<String> {
    match template_path {
        Some(path) => {
            let template = std::fs::read_to_string(path)
                .with_context(|| format!("Failed reading template: {}", path.display()))?;
            Ok(substitute(&template, vars))
        }
        None => Ok(default_skill_doc(vars)),
    }
}

fn substitute(template: &str, vars: &TemplateVars<'_>) -> String {
    template
        .replace("{{skill_name}}", vars.skill_name)
        .replace("{{repo_url}}", vars.repo_url)
        .replace("{{language}}", vars.language.unwrap_or("Unknown"))
        .replace("{{description}}", vars.description())
}

fn guides(language: Option<&str>, entry: &str) -> (String, String) {
    match language {
        Some("Python") => {
            ("pip install -r requirements.txt".into(), format!("python3 {entry} --help"))
        }
        Some("JavaScript" | "TypeScript") => ("npm install".into(), format!("node {entry} --help")),
        Some("Go") => ("go mod download".into(), format!("go run {entry} --help")),
        Some("Rust") => ("cargo build".into(), "cargo run -- --help".into()),
        _ => (
            "# see context_bundle.md for installation instructions".into(),
            format!("# see context_bundle.md for usage\n./{entry} --help"),
        ),
    }
}

fn default_skill_doc(vars: &TemplateVars<'_>) -> String {
    let name = vars.skill_name;
    let description = vars.description();
    let language = vars.language.unwrap_or("an unknown language");
    let (install, run) = guides(vars.language, vars.entry_file.unwrap_or("<entry-point>"));
    let tags = vars.tags().iter().map(|t| format!("\"{t}\"")).collect::<Vec<_>>().join(", ");

    format!(
        r#"---
name: {name}
description: {description}
tags: [{tags}]
---

# {name}

## Role
You are an expert agent for {name}. You know the core logic of the upstream project
({repo}) and apply it to the user's concrete problems.

## When to Use
- The user needs: {description}
- A task is best handled by a wrapper script under `scripts/`.
- Development work needs this project's API, library or CLI as a building block.

## Overview
The upstream project is written in {language}. Read `context_bundle.md` for its file
layout, README and dependency manifests before changing this file.

## Usage

### 1. Install
```bash
{install}
```

### 2. Run directly
```bash
{run}
```

### 3. Scripted use
Put wrapper scripts in `scripts/` and keep vendored sources in `src/`.
Reference material belongs in `references/`.

## Steps
1. Map the user's request to the tool's options.
2. Check the dependencies listed in `context_bundle.md` are installed.
3. Prefer an existing script in `scripts/`; otherwise run the tool directly.
4. Turn the tool's output into the result the user asked for.
"#,
        repo = vars.repo_url,
    )
}

pub const GITIGNORE: &str = "\
# Python
__pycache__/
*.py[cod]
*.egg-info/
.venv/
build/
dist/

# Node.js
node_modules/
npm-debug.log*

# IDE
.idea/
.vscode/
*.swp
*~

# OS
.DS_Store
Thumbs.db
";

pub fn library_readme(skill_name: &str, repo_url: &str) -> String {
    format!("# Skills\n\nSkills generated by skill-forge.\n\n- **{skill_name}**: {repo_url}\n")
}
