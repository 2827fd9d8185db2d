//! Entry-name skip rules.

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Version-control internals, hidden regardless of configuration.
const ALWAYS_SKIPPED: &[&str] = &[".git", ".hg", ".svn"];

/// Matches directory/file *names* (not paths) against the configured globs.
#[derive(Debug, Clone)]
pub struct SkipMatcher {
    set: GlobSet,
}

impl SkipMatcher {
    /// Invalid patterns are logged and ignored.
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!("ignoring invalid skip pattern '{}': {}", pattern, e),
            }
        }
        let set = builder.build().unwrap_or_else(|e| {
            tracing::warn!("skip patterns unusable, only VCS directories will be hidden: {}", e);
            GlobSet::empty()
        });
        Self { set }
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        ALWAYS_SKIPPED.contains(&name) || self.set.is_match(name)
    }
}

impl Default for SkipMatcher {
    fn default() -> Self {
        Self { set: GlobSet::empty() }
    }
}
