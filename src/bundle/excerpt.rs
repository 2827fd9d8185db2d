//! Per-file read outcomes.

use crate::utils::{head_lines, normalize_manifest, read_text, truncate_chars, Decoded};
use std::path::Path;

/// Result of trying to include one file in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRead {
    Included { text: String, truncated: bool, original_chars: usize },
    Skipped { reason: String },
}

/// How file content is shaped before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shaping {
    /// Exact text; the excerpt stays a prefix of the file.
    Verbatim,
    /// CRLF folded, trailing whitespace trimmed.
    Manifest,
    /// Only the first N lines.
    Head(usize),
}

/// One file's section in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub heading: String,
    /// Fence info string.
    pub syntax: &'static str,
    pub read: FileRead,
}

impl Excerpt {
    pub fn is_skipped(&self) -> bool {
        matches!(self.read, FileRead::Skipped { .. })
    }
}

/// Read `path`, shape it, then cut it to `max_chars` characters.
///
/// Never fails: I/O errors and binary content become [`FileRead::Skipped`].
pub fn read_excerpt(path: &Path, max_chars: usize, shaping: Shaping) -> FileRead {
    let content = match read_text(path) {
        Ok(Decoded::Text { content, .. }) => content,
        Ok(Decoded::Binary) => {
            tracing::debug!("skipping binary file {}", path.display());
            return FileRead::Skipped { reason: "binary or undecodable content".to_string() };
        }
        Err(e) => {
            tracing::warn!("skipping unreadable file {}: {}", path.display(), e);
            return FileRead::Skipped { reason: e.to_string() };
        }
    };

    let shaped = match shaping {
        Shaping::Verbatim => content,
        Shaping::Manifest => normalize_manifest(&content),
        Shaping::Head(lines) => head_lines(&content, lines).to_string(),
    };

    let original_chars = shaped.chars().count();
    let (kept, truncated) = truncate_chars(&shaped, max_chars);
    FileRead::Included { text: kept.to_string(), truncated, original_chars }
}
