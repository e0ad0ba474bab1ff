//! User configuration
//!
//! Stored in `~/.config/profilectl/config.yaml`. Every field is optional on
//! disk; command-line flags take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

/// Configuration file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Profile catalog base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,

    /// Namespace for generated objects
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Profile branch used when adding from a repository URL
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Git executable
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: None,
            namespace: default_namespace(),
            branch: default_branch(),
            git_binary: default_git_binary(),
        }
    }
}

impl Settings {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("profilectl").join("config.yaml"))
    }
}
