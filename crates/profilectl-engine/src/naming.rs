//! Deterministic names for generated objects
//!
//! Every name is a pure function of the subscription name, the owning
//! definition and the artifact, so identical inputs always produce identical
//! names.

use profilectl_core::{RepoKey, SourceRef, repo_short_name};

/// `{subscription}-{scope}-{artifact}`
pub fn artifact_name(subscription: &str, scope: &str, artifact: &str) -> String {
    format!("{}-{}-{}", subscription, scope, artifact)
}

/// `{subscription}-{repoShortName}-{ref}` for a source repository manifest
pub fn source_name(subscription: &str, key: &RepoKey) -> String {
    format!(
        "{}-{}-{}",
        subscription,
        repo_short_name(&key.url),
        key.reference.name()
    )
}

/// `{subscription}-{repoShortName}-{chart}`, where the repository is the one
/// holding the owning definition
pub fn chart_repository_name(subscription: &str, definition_url: &str, chart: &str) -> String {
    format!("{}-{}-{}", subscription, repo_short_name(definition_url), chart)
}

/// Scope for artifacts of a nested definition: its repository's short name
pub fn nested_scope(source: &SourceRef) -> String {
    source.repo_short_name().to_string()
}
