//! Resolution error types

use miette::Diagnostic;
use profilectl_core::{ArtifactKind, CoreError, RepoKey, SourceRef};
use thiserror::Error;

/// Error raised by a [`DefinitionFetcher`](crate::DefinitionFetcher)
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("failed to decode profile definition: {0}")]
    Decode(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Why a single artifact declaration was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("artifact name must not be empty")]
    EmptyName,

    #[error("expected exactly one, got both: {}", .0.join(", "))]
    MultipleSources(Vec<&'static str>),

    #[error("expected exactly one of chart, path, profile, got none")]
    NoSource,

    #[error("artifact kind {0:?} not recognized")]
    UnknownKind(String),

    #[error("{kind} artifact requires {field}")]
    MissingField {
        kind: ArtifactKind,
        field: &'static str,
    },

    #[error("{field} is not supported for {kind} artifacts")]
    UnsupportedField {
        kind: ArtifactKind,
        field: &'static str,
    },

    #[error("duplicate artifact name {0:?}")]
    DuplicateName(String),

    #[error("artifact name {0:?} must not contain a path separator")]
    InvalidName(String),

    #[error("{field} {path:?} must be a relative path inside the profile repository")]
    InvalidPath { field: &'static str, path: String },
}

/// Why a builder could not produce its objects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildFailure {
    #[error("no source repository manifest available for {0}")]
    MissingSource(RepoKey),

    #[error("name {0:?} is already used by another artifact")]
    DuplicateArtifact(String),
}

/// Category of a [`ResolveError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Validation,
    Recursion,
    Build,
}

/// Resolution error, fatal to the whole `resolve` call
///
/// `profile` is the chain of definition names from the root down to the
/// definition that failed, joined with `/`.
#[derive(Error, Debug, Diagnostic)]
pub enum ResolveError {
    #[error("invalid subscription {name}: {source}")]
    #[diagnostic(
        code(profilectl::resolve::subscription),
        help("a subscription needs a name, a namespace, a profileURL and one of branch, tag or version")
    )]
    InvalidSubscription {
        name: String,
        #[source]
        source: CoreError,
    },

    #[error("failed to get profile definition {} on {}: {source}", .location.url, .location.reference)]
    #[diagnostic(code(profilectl::resolve::fetch))]
    Fetch {
        profile: String,
        location: SourceRef,
        #[source]
        source: FetchError,
    },

    #[error("validation failed for artifact {artifact}: {reason} (profile {profile})")]
    #[diagnostic(code(profilectl::resolve::validation))]
    Validation {
        profile: String,
        artifact: String,
        reason: ValidationFailure,
    },

    #[error(
        "recursive artifact detected: profile {} on {} contains an artifact that points recursively back at itself (artifact {artifact} in profile {profile})",
        .target.url, .target.reference
    )]
    #[diagnostic(
        code(profilectl::resolve::recursion),
        help("a nested profile may not point at a repository and ref that is already being expanded")
    )]
    Recursion {
        profile: String,
        artifact: String,
        target: RepoKey,
    },

    #[error("failed to build artifact {artifact}: {reason} (profile {profile})")]
    #[diagnostic(code(profilectl::resolve::build))]
    Build {
        profile: String,
        artifact: String,
        reason: BuildFailure,
    },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSubscription { .. } | Self::Validation { .. } => ErrorKind::Validation,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Recursion { .. } => ErrorKind::Recursion,
            Self::Build { .. } => ErrorKind::Build,
        }
    }

    /// Name of the offending artifact, when one is known
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Self::Validation { artifact, .. }
            | Self::Recursion { artifact, .. }
            | Self::Build { artifact, .. } => Some(artifact),
            Self::InvalidSubscription { .. } | Self::Fetch { .. } => None,
        }
    }

    /// Profile chain in which the error occurred
    pub fn profile(&self) -> &str {
        match self {
            Self::InvalidSubscription { name, .. } => name,
            Self::Fetch { profile, .. }
            | Self::Validation { profile, .. }
            | Self::Recursion { profile, .. }
            | Self::Build { profile, .. } => profile,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
