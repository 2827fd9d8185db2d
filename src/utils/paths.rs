//! Path normalization

use std::path::Path;

/// Forward-slash form of a path, as shown in the bundle.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// `path` relative to `root`, forward-slashed; falls back to the file name.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .map(|rel| normalize_path(&rel.to_string_lossy()))
        .unwrap_or_else(|| {
            path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
        })
}
