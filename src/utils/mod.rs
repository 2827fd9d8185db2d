//! Shared helpers: decoding, truncation, paths, atomic writes.

pub mod atomic;
pub mod encoding;
pub mod paths;
pub mod text;

pub use atomic::write_atomic;
pub use encoding::{decode_bytes, read_text, Decoded};
pub use paths::{display_relative, normalize_path};
pub use text::{fence_for, head_lines, normalize_manifest, truncate_chars};
