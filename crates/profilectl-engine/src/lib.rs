//! profilectl Engine - profile artifact resolution
//!
//! This crate turns a [`ProfileSubscription`](profilectl_core::ProfileSubscription)
//! into the ordered list of Flux objects that deploy it:
//! - Recursive expansion of nested profiles with cycle detection
//! - Per-artifact validation into a closed set of builders
//! - One GitRepository per distinct repository and ref
//! - Deterministic object names

pub mod builder;
pub mod context;
pub mod error;
pub mod fetch;
pub mod naming;
pub mod resolver;
pub mod validate;

pub use builder::{
    BuildScope, Builder, DefinitionMeta, OVERLAY_INTERVAL, ResolvedArtifact, SourceCopy,
    SubscriptionMeta,
};
pub use context::ResolutionContext;
pub use error::{BuildFailure, ErrorKind, FetchError, ResolveError, Result, ValidationFailure};
pub use fetch::DefinitionFetcher;
pub use resolver::ArtifactResolver;
