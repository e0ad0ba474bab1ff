//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use profilectl_engine::{ErrorKind, ResolveError};
use profilectl_repo::RepoError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// An artifact or subscription failed validation
    #[error("Validation failed: {message}")]
    #[diagnostic(code(profilectl::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Resolution failed after every definition was fetched
    #[error("Resolve failed: {message}")]
    #[diagnostic(code(profilectl::cli::resolve))]
    Resolve {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A definition or repository could not be read
    #[error("Fetch failed: {message}")]
    #[diagnostic(code(profilectl::cli::fetch))]
    Fetch {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Catalog request failed
    #[error("Catalog error: {message}")]
    #[diagnostic(code(profilectl::cli::catalog))]
    Catalog {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(profilectl::cli::io))]
    Io { message: String },

    /// Invalid combination of arguments
    #[error("{message}")]
    #[diagnostic(code(profilectl::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(profilectl::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Resolve { .. } => exit_codes::RESOLVE_ERROR,
            CliError::Fetch { .. } | CliError::Catalog { .. } => exit_codes::FETCH_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create a usage error with help text
    pub fn usage(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            help: None,
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::io(err)
    }
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => CliError::Validation {
                message,
                help: err.artifact().map(|_| {
                    "each artifact must set exactly one of chart, path or profile".to_string()
                }),
            },
            ErrorKind::Fetch => CliError::Fetch {
                message,
                help: Some("check the repository URL, ref and profile path".to_string()),
            },
            ErrorKind::Recursion | ErrorKind::Build => CliError::Resolve {
                message,
                help: None,
            },
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match err {
            RepoError::Io(e) => CliError::io(e),
            RepoError::InvalidConfig { .. } => CliError::Validation {
                message,
                help: Some("check ~/.config/profilectl/config.yaml".to_string()),
            },
            RepoError::InvalidCatalogReference { .. } => CliError::usage(
                message,
                "use CATALOG/PROFILE or CATALOG/PROFILE/VERSION",
            ),
            RepoError::InvalidCatalogUrl { .. }
            | RepoError::HttpError { .. }
            | RepoError::NetworkError { .. }
            | RepoError::ProfileNotFound { .. } => CliError::Catalog {
                message,
                help: None,
            },
            RepoError::GitUnavailable { .. } => CliError::Fetch {
                message,
                help: Some("install git or set gitBinary in the config file".to_string()),
            },
            _ => CliError::fetch(message),
        }
    }
}

impl From<profilectl_core::CoreError> for CliError {
    fn from(err: profilectl_core::CoreError) -> Self {
        match err {
            profilectl_core::CoreError::Io(e) => CliError::io(e),
            other => CliError::validation(other.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
