//! Error types for profile source operations

use profilectl_core::CoreError;
use profilectl_engine::FetchError;
use thiserror::Error;

/// Profile source errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Configuration Errors ============
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid catalog URL: {url} - {reason}")]
    InvalidCatalogUrl { url: String, reason: String },

    #[error("Invalid catalog reference {reference:?}: expected <CATALOG>/<PROFILE>[/<VERSION>]")]
    InvalidCatalogReference { reference: String },

    // ============ Git Errors ============
    #[error("git {operation} failed: {stderr}")]
    GitCommand { operation: String, stderr: String },

    #[error("Failed to run {binary}: {message}")]
    GitUnavailable { binary: String, message: String },

    #[error("{url} has no {reference}")]
    RefNotFound { url: String, reference: String },

    #[error("{path} not found in {url}")]
    PathNotFound { url: String, path: String },

    // ============ Catalog Errors ============
    #[error(
        "unable to find profile {profile:?} in catalog {catalog:?} (with version if provided: {version})"
    )]
    ProfileNotFound {
        catalog: String,
        profile: String,
        version: String,
    },

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid profile definition: {0}")]
    Definition(#[from] CoreError),
}

/// Result type for profile source operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RefNotFound { .. } | Self::PathNotFound { .. } | Self::ProfileNotFound { .. }
        )
    }
}

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for RepoError {
    fn from(e: serde_yaml::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<walkdir::Error> for RepoError {
    fn from(e: walkdir::Error) -> Self {
        RepoError::Io(e.into())
    }
}

impl From<RepoError> for FetchError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Io(err) | RepoError::Definition(CoreError::Io(err)) => FetchError::Io(err),
            RepoError::Definition(err) => FetchError::Decode(err),
            err if err.is_not_found() => FetchError::not_found(err.to_string()),
            err => FetchError::transport(err.to_string()),
        }
    }
}
