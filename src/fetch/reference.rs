//! Repository reference parsing and URL rewriting.

use crate::domain::ForgeError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static HTTPS_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://github\.com/([\w.-]+)/([\w.-]+?)(?:\.git)?/?$").expect("valid regex")
});

static SSH_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^git@github\.com:([\w.-]+)/([\w.-]+?)(?:\.git)?/?$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Https,
    Ssh,
}

/// A validated GitHub repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    raw: String,
    owner: String,
    name: String,
    transport: Transport,
}

impl RepoRef {
    /// Accepts `https://github.com/<owner>/<repo>[.git][/]` and
    /// `git@github.com:<owner>/<repo>[.git]`.
    pub fn parse(input: &str) -> Result<Self, ForgeError> {
        let raw = input.trim();
        let (caps, transport) = if let Some(caps) = HTTPS_REF.captures(raw) {
            (caps, Transport::Https)
        } else if let Some(caps) = SSH_REF.captures(raw) {
            (caps, Transport::Ssh)
        } else {
            return Err(ForgeError::InvalidReference(input.to_string()));
        };

        let owner = caps[1].to_string();
        let name = caps[2].to_string();
        if [&owner, &name].iter().any(|part| part.chars().all(|c| c == '.')) {
            return Err(ForgeError::InvalidReference(input.to_string()));
        }

        Ok(Self { raw: raw.to_string(), owner, name, transport })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Canonical clone URL in the reference's own transport.
    pub fn primary_url(&self) -> String {
        match self.transport {
            Transport::Https => format!("https://github.com/{}/{}.git", self.owner, self.name),
            Transport::Ssh => format!("git@github.com:{}/{}.git", self.owner, self.name),
        }
    }

    /// The same repository routed through an HTTPS mirror host.
    pub fn mirror_url(&self, mirror_base: &str) -> String {
        format!("{}/{}/{}.git", mirror_base.trim_end_matches('/'), self.owner, self.name)
    }

    /// `<repo>-skill`, keeping only `[A-Za-z0-9_-]` from the repo name.
    pub fn default_skill_name(&self) -> String {
        let cleaned: String = self
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if cleaned.is_empty() {
            "unknown-skill".to_string()
        } else {
            format!("{cleaned}-skill")
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
