//! Per-call resolution state

use std::collections::HashMap;

use profilectl_core::RepoKey;

use crate::builder::ResolvedArtifact;
use crate::error::BuildFailure;

/// State threaded through one top-level resolution
///
/// Holds the stack of repositories currently being expanded, the canonical
/// source manifest name for every repository seen so far, and every artifact
/// emitted so far keyed by name. Created by the resolver for each call and dropped
/// when it returns.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    stack: Vec<RepoKey>,
    sources: HashMap<RepoKey, String>,
    emitted: HashMap<String, ResolvedArtifact>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a definition. Returns `false` if `key` is already being expanded.
    pub fn push(&mut self, key: RepoKey) -> bool {
        if self.is_expanding(&key) {
            return false;
        }
        self.stack.push(key);
        true
    }

    pub fn pop(&mut self) -> Option<RepoKey> {
        self.stack.pop()
    }

    pub fn is_expanding(&self, key: &RepoKey) -> bool {
        self.stack.contains(key)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Name of the source manifest already emitted for `key`
    pub fn source_name(&self, key: &RepoKey) -> Option<&str> {
        self.sources.get(key).map(String::as_str)
    }

    pub fn register_source(&mut self, key: RepoKey, name: String) {
        self.sources.insert(key, name);
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Record an artifact for output
    ///
    /// Returns `false` if an identical artifact was already recorded, which
    /// happens when sibling branches include the same profile. A different
    /// artifact under an already used name is an error.
    pub fn record(&mut self, artifact: &ResolvedArtifact) -> Result<bool, BuildFailure> {
        match self.emitted.get(&artifact.name) {
            Some(existing) if existing == artifact => Ok(false),
            Some(_) => Err(BuildFailure::DuplicateArtifact(artifact.name.clone())),
            None => {
                self.emitted.insert(artifact.name.clone(), artifact.clone());
                Ok(true)
            }
        }
    }

    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }
}
