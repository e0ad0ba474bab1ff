//! Definition fetchers
//!
//! [`GitFetcher`] reads definitions from sparse clones of the real
//! repositories. [`LocalFetcher`] reads them from a directory mirror laid out
//! as `<root>/<repo short name>/<ref>/<path>`, for offline use and tests.

use std::path::{Path, PathBuf};

use profilectl_core::{GitRef, ProfileDefinition, SourceRef, repo_short_name};
use profilectl_engine::{DefinitionFetcher, FetchError};

use crate::error::{RepoError, Result};
use crate::git::{Checkout, RepositoryCheckout, sparse_clone};

/// Fetches definitions with the git CLI
#[derive(Debug, Clone)]
pub struct GitFetcher {
    git: String,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitFetcher {
    pub fn new(git: impl Into<String>) -> Self {
        Self { git: git.into() }
    }

    fn read(&self, source: &SourceRef) -> Result<ProfileDefinition> {
        let checkout = sparse_clone(&self.git, &source.url, &source.reference, &source.path)?;
        read_definition(&checkout, source)
    }
}

impl DefinitionFetcher for GitFetcher {
    fn fetch(&self, source: &SourceRef) -> std::result::Result<ProfileDefinition, FetchError> {
        Ok(self.read(source)?)
    }
}

impl RepositoryCheckout for GitFetcher {
    fn checkout(&self, url: &str, reference: &GitRef, sparse_path: &str) -> Result<Checkout> {
        sparse_clone(&self.git, url, reference, sparse_path)
    }
}

/// Fetches definitions from a local mirror directory
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mirror directory holding `url` at `reference`
    pub fn repository_dir(&self, url: &str, reference: &GitRef) -> PathBuf {
        self.root.join(repo_short_name(url)).join(reference.name())
    }

    fn read(&self, source: &SourceRef) -> Result<ProfileDefinition> {
        let checkout = self.checkout(&source.url, &source.reference, &source.path)?;
        read_definition(&checkout, source)
    }
}

impl DefinitionFetcher for LocalFetcher {
    fn fetch(&self, source: &SourceRef) -> std::result::Result<ProfileDefinition, FetchError> {
        Ok(self.read(source)?)
    }
}

impl RepositoryCheckout for LocalFetcher {
    fn checkout(&self, url: &str, reference: &GitRef, _sparse_path: &str) -> Result<Checkout> {
        let dir = self.repository_dir(url, reference);
        if !dir.is_dir() {
            return Err(RepoError::RefNotFound {
                url: url.to_string(),
                reference: reference.to_string(),
            });
        }
        Ok(Checkout::Local(dir))
    }
}

fn read_definition(checkout: &Checkout, source: &SourceRef) -> Result<ProfileDefinition> {
    let file = checkout.join(&source.definition_file());
    if !file.is_file() {
        return Err(RepoError::PathNotFound {
            url: source.url.clone(),
            path: source.definition_file(),
        });
    }
    tracing::trace!(file = %file.display(), "Reading profile definition");
    Ok(ProfileDefinition::from_file(&file)?)
}
