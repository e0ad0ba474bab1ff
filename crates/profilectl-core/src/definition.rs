//! Profile definition documents
//!
//! A definition is the `profile.yaml` found at a profile's path in its
//! repository. It names the profile and lists its artifacts in order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::manifest::ObjectMeta;
use crate::source::{GitRef, SourceRef};

pub const DEFINITION_KIND: &str = "ProfileDefinition";

/// A fetched profile definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDefinition {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: DefinitionSpec,
}

fn default_api_version() -> String {
    crate::subscription::PROFILES_API_VERSION.to_string()
}

fn default_kind() -> String {
    DEFINITION_KIND.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Artifacts in declared order
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

impl ProfileDefinition {
    pub fn new(name: impl Into<String>, artifacts: Vec<ArtifactSpec>) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::named(name),
            spec: DefinitionSpec {
                description: None,
                artifacts,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn description(&self) -> Option<&str> {
        self.spec.description.as_deref()
    }

    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.spec.artifacts
    }

    /// Decode a definition and check the fields every definition must carry
    pub fn from_yaml(content: &str) -> Result<Self> {
        let definition: Self = serde_yaml::from_str(content)?;
        if definition.kind != DEFINITION_KIND {
            return Err(CoreError::InvalidDocument {
                kind: DEFINITION_KIND.to_string(),
                message: format!("unexpected kind '{}'", definition.kind),
            });
        }
        if definition.metadata.name.is_empty() {
            return Err(CoreError::MissingField {
                field: "metadata.name".to_string(),
            });
        }
        Ok(definition)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// One artifact declared by a profile
///
/// The kind stays a plain string so that unknown kinds surface as validation
/// failures naming the artifact rather than as decode errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSpec {
    pub name: String,

    pub kind: String,

    /// Path inside the owning profile's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Packaged chart from a Helm repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartRef>,

    /// Another profile, or a repository for `GitRepository` artifacts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRef>,
}

impl ArtifactSpec {
    pub fn new(name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            name: name.into(),
            kind: kind.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_chart(mut self, chart: ChartRef) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn with_profile(mut self, profile: ProfileRef) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Declared path, treating an empty string as unset
    pub fn local_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }
}

/// Recognised artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A bare source repository reference
    GitRepository,
    /// A Helm chart, either at a local path or in a chart repository
    HelmChart,
    /// A kustomize overlay at a local path
    Kustomize,
    /// A nested profile
    Profile,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitRepository => "GitRepository",
            Self::HelmChart => "HelmChart",
            Self::Kustomize => "Kustomize",
            Self::Profile => "Profile",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GitRepository" => Ok(Self::GitRepository),
            "HelmChart" => Ok(Self::HelmChart),
            "Kustomize" => Ok(Self::Kustomize),
            "Profile" => Ok(Self::Profile),
            other => Err(other.to_string()),
        }
    }
}

/// Chart published in a Helm repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRef {
    /// Helm repository URL
    #[serde(default)]
    pub url: String,

    /// Chart name
    #[serde(default)]
    pub name: String,

    /// Exact chart version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ChartRef {
    pub fn new(url: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

/// Reference to a profile (or plain repository) by git coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ProfileRef {
    pub fn branch(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: Some(branch.into()),
            ..Default::default()
        }
    }

    pub fn tag(url: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn reference(&self) -> Option<GitRef> {
        GitRef::from_parts(self.branch.as_deref(), self.tag.as_deref())
    }

    /// Full source coordinates, if url and ref are both present
    pub fn source(&self) -> Option<SourceRef> {
        if self.url.is_empty() {
            return None;
        }
        let reference = self.reference()?;
        Some(SourceRef::new(
            self.url.clone(),
            reference,
            self.path.clone().unwrap_or_default(),
        ))
    }
}
