//! profilectl Core - Core types for profile subscriptions
//!
//! This crate provides the foundational types used throughout profilectl:
//! - `ProfileSubscription`: a pinned reference to a profile plus values
//! - `ProfileDefinition`: the fetched `profile.yaml` and its artifacts
//! - `ManifestObject`: the Flux objects generated from a profile
//! - `SourceRef`: repository, ref and path of a profile

pub mod definition;
pub mod error;
pub mod manifest;
pub mod source;
pub mod subscription;

pub use definition::{ArtifactKind, ArtifactSpec, ChartRef, ProfileDefinition, ProfileRef};
pub use error::{CoreError, Result};
pub use manifest::{
    CrossNamespaceObjectReference, GitRepository, HelmChartTemplateSpec, HelmRelease,
    HelmRepository, Kustomization, KustomizationSpec, ManifestObject, ObjectMeta, ValuesReference,
};
pub use source::{GitRef, RepoKey, SourceRef, join_repo_path, repo_short_name};
pub use subscription::{CatalogDescription, ProfileSubscription, SubscriptionSpec};
