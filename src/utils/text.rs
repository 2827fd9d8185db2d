//! Character-based truncation and markdown fencing.

/// Keep at most `max_chars` characters of `text`.
///
/// Returns the kept prefix and whether anything was cut. Counting is by
/// Unicode scalar value, so the cut never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// First `max_lines` lines of `text`, line endings preserved.
pub fn head_lines(text: &str, max_lines: usize) -> &str {
    if max_lines == 0 {
        return "";
    }
    match text.match_indices('\n').nth(max_lines - 1) {
        Some((idx, _)) => &text[..=idx],
        None => text,
    }
}

/// Light normalisation for manifests: CRLF to LF, trailing whitespace trimmed.
pub fn normalize_manifest(text: &str) -> String {
    text.replace("\r\n", "\n").trim_end().to_string()
}

/// A backtick fence longer than any backtick run inside `content`.
pub fn fence_for(content: &str) -> String {
    let mut longest = 0usize;
    let mut run = 0usize;
    for ch in content.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}
