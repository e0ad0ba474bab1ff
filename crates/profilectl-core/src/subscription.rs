//! Profile subscriptions
//!
//! A subscription binds a profile (by repository URL plus branch/tag/path, or
//! by catalog version) to a name and namespace, with optional Helm values.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::manifest::{ObjectMeta, ValuesReference};
use crate::source::{GitRef, SourceRef};

pub const PROFILES_API_VERSION: &str = "weave.works/v1alpha1";
pub const SUBSCRIPTION_KIND: &str = "ProfileSubscription";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubscription {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    pub metadata: ObjectMeta,

    pub spec: SubscriptionSpec,
}

fn default_api_version() -> String {
    PROFILES_API_VERSION.to_string()
}

fn default_kind() -> String {
    SUBSCRIPTION_KIND.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSpec {
    #[serde(rename = "profileURL")]
    pub profile_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Catalog pin of the form `<profile>/<version>`, used as a tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Helm values, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values_from: Vec<ValuesReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_catalog_description: Option<CatalogDescription>,
}

/// Where a catalog-installed subscription came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescription {
    pub catalog: String,
    pub profile: String,
    pub version: String,
}

impl ProfileSubscription {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, spec: SubscriptionSpec) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::new(name, namespace),
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let subscription: Self = serde_yaml::from_str(content)?;
        if subscription.kind != SUBSCRIPTION_KIND {
            return Err(CoreError::InvalidDocument {
                kind: SUBSCRIPTION_KIND.to_string(),
                message: format!("unexpected kind '{}'", subscription.kind),
            });
        }
        Ok(subscription)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Where the root profile definition lives
    ///
    /// Precedence is tag, then catalog version, then branch. A catalog
    /// version `<profile>/<version>` also supplies the path when none is set.
    pub fn source(&self) -> Result<SourceRef> {
        for (field, value) in [
            ("metadata.name", self.metadata.name.as_str()),
            ("metadata.namespace", self.metadata.namespace.as_str()),
            ("spec.profileURL", self.spec.profile_url.as_str()),
        ] {
            if value.is_empty() {
                return Err(CoreError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        let spec = &self.spec;
        let mut path = spec.path.clone().unwrap_or_default();

        let reference = match GitRef::from_parts(spec.branch.as_deref(), spec.tag.as_deref()) {
            Some(GitRef::Tag(tag)) => GitRef::Tag(tag),
            branch => match spec.version.as_deref().filter(|v| !v.is_empty()) {
                Some(version) => {
                    if path.is_empty()
                        && let Some((profile, _)) = version.split_once('/')
                    {
                        path = profile.to_string();
                    }
                    GitRef::Tag(version.to_string())
                }
                None => branch.ok_or_else(|| CoreError::MissingField {
                    field: "spec.branch, spec.tag or spec.version".to_string(),
                })?,
            },
        };

        Ok(SourceRef::new(spec.profile_url.clone(), reference, path))
    }
}
