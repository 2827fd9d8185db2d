//! Fatal error taxonomy.
//!
//! Everything here aborts the run with a non-zero exit status. Recoverable
//! per-file problems during aggregation are modelled by
//! [`crate::bundle::FileRead::Skipped`] instead.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(
        "invalid repository reference '{0}': expected https://github.com/<owner>/<repo> or git@github.com:<owner>/<repo>"
    )]
    InvalidReference(String),

    #[error("invalid skill name '{0}': must be a single, non-empty directory name")]
    InvalidSkillName(String),

    #[error(
        "destination already exists: {}; choose another skill name or remove the existing directory",
        .0.display()
    )]
    DestinationExists(PathBuf),

    #[error("failed to fetch {reference}: {}", describe_attempts(.attempts))]
    FetchExhausted { reference: String, attempts: Vec<AttemptFailure> },

    #[error("working copy root is unreadable: {}", .path.display())]
    UnreadableRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which leg of the two-attempt fetch sequence an attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    Primary,
    Mirror,
}

impl fmt::Display for AttemptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("direct"),
            Self::Mirror => f.write_str("mirror"),
        }
    }
}

/// Why one clone attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub kind: AttemptKind,
    pub url: String,
    pub reason: String,
}

fn describe_attempts(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} clone of {} failed ({})", a.kind, a.url, a.reason))
        .collect::<Vec<_>>()
        .join("; ")
}
