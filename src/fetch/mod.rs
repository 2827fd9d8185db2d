//! Repository Fetcher: obtain a working copy with one mirror fallback.
//!
//! The fetch is an explicit sequence of at most two attempts: the direct
//! URL, then (if enabled) the same repository through the mirror host. Each
//! attempt starts from an empty destination, so a successful mirror clone is
//! a full substitute for the failed direct one, never a merge.

use crate::domain::{AttemptFailure, AttemptKind, Config, ForgeError};
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

pub mod git;
pub mod reference;
pub mod working_copy;

pub use git::GitCloner;
pub use reference::RepoRef;
pub use working_copy::{strip_vcs_metadata, WorkingCopy};

/// Produces a checkout of `url` in the existing, empty directory `dest`.
pub trait Cloner {
    fn clone_into(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub kind: AttemptKind,
    pub url: String,
}

pub fn plan_attempts(reference: &RepoRef, config: &Config) -> Vec<FetchAttempt> {
    let mut attempts =
        vec![FetchAttempt { kind: AttemptKind::Primary, url: reference.primary_url() }];
    if config.mirror_enabled {
        attempts.push(FetchAttempt {
            kind: AttemptKind::Mirror,
            url: reference.mirror_url(&config.mirror_base),
        });
    }
    attempts
}

/// Fetch `reference` into a scratch working copy and strip its `.git`.
///
/// Fails with [`ForgeError::FetchExhausted`] once every planned attempt
/// failed; the scratch directory is removed in that case.
pub fn fetch_working_copy(
    reference: &RepoRef,
    config: &Config,
    cloner: &dyn Cloner,
) -> Result<WorkingCopy> {
    let copy = WorkingCopy::scratch();
    let mut failures = Vec::new();

    for attempt in plan_attempts(reference, config) {
        copy.reset()?;
        info!(kind = %attempt.kind, url = %attempt.url, "cloning");
        match cloner.clone_into(&attempt.url, copy.root()) {
            Ok(()) => {
                info!(kind = %attempt.kind, "clone succeeded");
                if let Err(e) = strip_vcs_metadata(copy.root()) {
                    warn!("could not remove VCS metadata: {:#}", e);
                }
                return Ok(copy);
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(kind = %attempt.kind, url = %attempt.url, %reason, "clone failed");
                failures.push(AttemptFailure { kind: attempt.kind, url: attempt.url, reason });
            }
        }
    }

    Err(ForgeError::FetchExhausted { reference: reference.to_string(), attempts: failures }.into())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Cloner;
    use anyhow::Result;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    /// Scripted cloner: URLs in `failing` leave debris and error, others
    /// materialise `files` plus a `.git` directory.
    pub struct FakeCloner {
        pub failing: Vec<String>,
        pub files: Vec<(String, String)>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeCloner {
        pub fn new(files: &[(&str, &str)]) -> Self {
            Self {
                failing: Vec::new(),
                files: files.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn failing_on(mut self, url: &str) -> Self {
            self.failing.push(url.to_string());
            self
        }
    }

    impl Cloner for FakeCloner {
        fn clone_into(&self, url: &str, dest: &Path) -> Result<()> {
            self.calls.borrow_mut().push(url.to_string());
            if self.failing.iter().any(|f| f == url) {
                fs::write(dest.join("partial.pack"), "half a download")?;
                anyhow::bail!("connection reset by peer");
            }
            fs::create_dir_all(dest.join(".git"))?;
            fs::write(dest.join(".git/HEAD"), "ref: refs/heads/main\n")?;
            for (rel, content) in &self.files {
                let path = dest.join(rel);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, content)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeCloner;
    use super::*;

    fn reference() -> RepoRef {
        RepoRef::parse("https://github.com/acme/widget").expect("ref")
    }

    #[test]
    fn plan_has_primary_then_mirror() {
        let plan = plan_attempts(&reference(), &Config::default());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].kind, AttemptKind::Primary);
        assert_eq!(plan[0].url, "https://github.com/acme/widget.git");
        assert_eq!(plan[1].kind, AttemptKind::Mirror);
        assert_eq!(plan[1].url, "https://gitclone.com/github.com/acme/widget.git");
    }

    #[test]
    fn plan_without_mirror_is_single_attempt() {
        let config = Config { mirror_enabled: false, ..Config::default() };
        assert_eq!(plan_attempts(&reference(), &config).len(), 1);
    }

    #[test]
    fn direct_success_uses_one_attempt_and_strips_git() {
        let cloner = FakeCloner::new(&[("README.md", "# widget\n")]);
        let copy = fetch_working_copy(&reference(), &Config::default(), &cloner).expect("fetch");

        assert_eq!(cloner.calls.borrow().len(), 1);
        assert!(copy.root().join("README.md").exists());
        assert!(!copy.root().join(".git").exists());
    }

    #[test]
    fn mirror_result_fully_replaces_failed_primary() {
        let cloner = FakeCloner::new(&[("src/lib.rs", "pub fn w() {}\n")])
            .failing_on("https://github.com/acme/widget.git");
        let copy = fetch_working_copy(&reference(), &Config::default(), &cloner).expect("fetch");

        assert_eq!(
            *cloner.calls.borrow(),
            vec![
                "https://github.com/acme/widget.git".to_string(),
                "https://gitclone.com/github.com/acme/widget.git".to_string(),
            ]
        );
        let mut names: Vec<String> = std::fs::read_dir(copy.root())
            .expect("read")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["src".to_string()]);
    }

    #[test]
    fn both_attempts_failing_reports_each_reason_and_cleans_up() {
        let cloner = FakeCloner::new(&[])
            .failing_on("https://github.com/acme/widget.git")
            .failing_on("https://gitclone.com/github.com/acme/widget.git");
        let err = fetch_working_copy(&reference(), &Config::default(), &cloner)
            .err()
            .expect("should fail");

        match err.downcast_ref::<ForgeError>() {
            Some(ForgeError::FetchExhausted { attempts, .. }) => {
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].kind, AttemptKind::Primary);
                assert_eq!(attempts[1].kind, AttemptKind::Mirror);
                assert!(attempts.iter().all(|a| a.reason.contains("connection reset")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
