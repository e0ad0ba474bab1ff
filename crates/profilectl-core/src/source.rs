//! Source repository coordinates
//!
//! A profile lives at a path inside a git repository, pinned to a branch or
//! a tag. [`SourceRef`] carries those three coordinates and [`RepoKey`] is the
//! `(url, ref)` pair used to identify a repository checkout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Git reference a profile is pinned to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitRef {
    Branch(String),
    Tag(String),
}

impl GitRef {
    /// The bare ref name (`main`, `v0.1.0`)
    pub fn name(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Tag(name) => name,
        }
    }

    /// Pick a ref from optional branch/tag fields; a non-empty tag wins
    pub fn from_parts(branch: Option<&str>, tag: Option<&str>) -> Option<Self> {
        match (non_empty(tag), non_empty(branch)) {
            (Some(tag), _) => Some(Self::Tag(tag.to_string())),
            (None, Some(branch)) => Some(Self::Branch(branch.to_string())),
            (None, None) => None,
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "branch {}", name),
            Self::Tag(name) => write!(f, "tag {}", name),
        }
    }
}

/// Identity of a repository checkout: `(url, ref)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoKey {
    pub url: String,
    pub reference: GitRef,
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.url, self.reference)
    }
}

/// Location of a profile definition: repository, ref and in-repository path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub url: String,
    pub reference: GitRef,
    /// Directory of the profile inside the repository (empty for the root)
    pub path: String,
}

impl SourceRef {
    pub fn new(url: impl Into<String>, reference: GitRef, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reference,
            path: normalize_path(&path.into()),
        }
    }

    pub fn repo_key(&self) -> RepoKey {
        RepoKey {
            url: self.url.clone(),
            reference: self.reference.clone(),
        }
    }

    /// Last path segment of the repository URL
    pub fn repo_short_name(&self) -> &str {
        repo_short_name(&self.url)
    }

    /// Resolve a path declared inside this profile to a repository path
    pub fn join(&self, relative: &str) -> String {
        join_repo_path(&self.path, relative)
    }

    /// Repository path of the definition document
    pub fn definition_file(&self) -> String {
        self.join(DEFINITION_FILE)
    }
}

/// File name of a profile definition inside its directory
pub const DEFINITION_FILE: &str = "profile.yaml";

/// Last non-empty path segment of a repository URL, without a `.git` suffix
///
/// `https://github.com/org/repo-name.git` → `repo-name`
pub fn repo_short_name(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last)
}

/// Join two repository-relative paths, ignoring `.` and empty components
pub fn join_repo_path(base: &str, relative: &str) -> String {
    let parts: Vec<&str> = base
        .split('/')
        .chain(relative.split('/'))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    parts.join("/")
}

fn normalize_path(path: &str) -> String {
    join_repo_path("", path)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
