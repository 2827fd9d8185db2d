//! Cloning through libgit2.

use super::Cloner;
use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks};
use std::cell::Cell;
use std::fs;
use std::path::Path;

/// Clones with git2, shallow unless `depth` is zero.
///
/// A rejected shallow clone is retried as a full clone within the same
/// attempt; some hosts and dumb-HTTP mirrors do not serve `depth`.
pub struct GitCloner {
    depth: u32,
}

impl GitCloner {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }
}

impl Cloner for GitCloner {
    fn clone_into(&self, url: &str, dest: &Path) -> Result<()> {
        if self.depth == 0 {
            return clone_with_depth(url, dest, None)
                .with_context(|| format!("Clone from {url} failed"));
        }
        let shallow = || {
            clone_with_depth(url, dest, Some(self.depth))
                .with_context(|| format!("Shallow clone (depth {}) from {url} failed", self.depth))
        };
        let full = || {
            clone_with_depth(url, dest, None).with_context(|| format!("Clone from {url} failed"))
        };
        shallow_then_full(dest, shallow, full)
    }
}

fn shallow_then_full(
    dest: &Path,
    shallow: impl FnOnce() -> Result<()>,
    full: impl FnOnce() -> Result<()>,
) -> Result<()> {
    match shallow() {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!("{:#}; retrying as a full clone", e);
            clear_dir(dest)?;
            full()
        }
    }
}

fn clear_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("Failed clearing {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed creating {}", dir.display()))
}

fn clone_with_depth(url: &str, dest: &Path, depth: Option<u32>) -> Result<()> {
    let mut fo = FetchOptions::new();
    fo.remote_callbacks(credential_callbacks());
    if let Some(depth) = depth {
        fo.depth(i32::try_from(depth).unwrap_or(i32::MAX));
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fo);
    builder.clone(url, dest)?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum CredentialSource {
    SshAgent(String),
    Default,
    GiveUp,
}

/// libgit2 asks again after a rejected credential; answer once, then stop.
fn credential_source(
    allowed: CredentialType,
    username: Option<&str>,
    asked_before: bool,
) -> CredentialSource {
    if asked_before {
        CredentialSource::GiveUp
    } else if allowed.contains(CredentialType::SSH_KEY) {
        CredentialSource::SshAgent(username.unwrap_or("git").to_string())
    } else if allowed.contains(CredentialType::DEFAULT) {
        CredentialSource::Default
    } else {
        CredentialSource::GiveUp
    }
}

/// SSH references (`git@github.com:…`) authenticate through the SSH agent.
fn credential_callbacks<'a>() -> RemoteCallbacks<'a> {
    let asked = Cell::new(false);
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username, allowed| {
        let source = credential_source(allowed, username, asked.replace(true));
        match source {
            CredentialSource::SshAgent(user) => Cred::ssh_key_from_agent(&user),
            CredentialSource::Default => Cred::default(),
            CredentialSource::GiveUp => Err(git2::Error::from_str("no usable credentials")),
        }
    });
    callbacks
}
