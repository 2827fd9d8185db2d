//! Markdown rendering of a [`ContextBundle`].

use super::{ContextBundle, Excerpt, FileRead};
use crate::utils::fence_for;
use std::fmt::Write;

pub fn render_bundle(bundle: &ContextBundle) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Context Bundle: {}\n", bundle.title);
    if let Some(source) = &bundle.source {
        let _ = writeln!(out, "- **Source:** {source}");
    }
    let _ = writeln!(out, "- **Primary language:** {}", bundle.language.unwrap_or("unknown"));
    if let Some(ts) = &bundle.generated_at {
        let _ = writeln!(out, "- **Generated:** {ts}");
    }

    let tree = bundle.tree.render();
    let fence = fence_for(&tree);
    let _ = writeln!(out, "\n## File Tree\n\n{fence}text\n{tree}\n{fence}");

    out.push_str("\n## README\n\n");
    match &bundle.readme {
        Some(excerpt) => push_excerpt(&mut out, excerpt),
        None => out.push_str("_No README found._\n"),
    }

    out.push_str("\n## Key Documents\n\n");
    push_excerpts(&mut out, &bundle.key_documents);

    out.push_str("\n## Dependency Manifests\n\n");
    push_excerpts(&mut out, &bundle.manifests);

    out.push_str("\n## Entry Points\n\n");
    push_excerpts(&mut out, &bundle.entry_points);

    out
}

fn push_excerpts(out: &mut String, excerpts: &[Excerpt]) {
    if excerpts.is_empty() {
        out.push_str("_None found._\n");
        return;
    }
    for (idx, excerpt) in excerpts.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        push_excerpt(out, excerpt);
    }
}

fn push_excerpt(out: &mut String, excerpt: &Excerpt) {
    let _ = writeln!(out, "### {}\n", excerpt.heading);
    match &excerpt.read {
        FileRead::Skipped { reason } => {
            let _ = writeln!(out, "> Skipped: {reason}");
        }
        FileRead::Included { text, truncated, original_chars } => {
            let fence = fence_for(text);
            let body = text.trim_end_matches('\n');
            let _ = writeln!(out, "{fence}{}\n{body}\n{fence}", excerpt.syntax);
            if *truncated {
                let _ = writeln!(
                    out,
                    "\n_… truncated: showing the first {} of {} characters._",
                    text.chars().count(),
                    original_chars
                );
            }
        }
    }
}
