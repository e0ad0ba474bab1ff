//! Flux manifest objects
//!
//! The resolver only ever produces four kinds of objects. They are modelled
//! as plain serde structs carrying their own `apiVersion`/`kind` so that each
//! serializes to a complete Kubernetes document, and [`ManifestObject`] is the
//! closed union over them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::source::GitRef;

pub const SOURCE_API_VERSION: &str = "source.toolkit.fluxcd.io/v1beta1";
pub const HELM_API_VERSION: &str = "helm.toolkit.fluxcd.io/v2beta1";
pub const KUSTOMIZE_API_VERSION: &str = "kustomize.toolkit.fluxcd.io/v1beta1";

pub const GIT_REPOSITORY_KIND: &str = "GitRepository";
pub const HELM_RELEASE_KIND: &str = "HelmRelease";
pub const KUSTOMIZATION_KIND: &str = "Kustomization";
pub const HELM_REPOSITORY_KIND: &str = "HelmRepository";

/// Object name and namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

/// Reference to a source object, possibly in another namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossNamespaceObjectReference {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

impl CrossNamespaceObjectReference {
    pub fn new(kind: &str, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// Secret or ConfigMap holding Helm values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesReference {
    pub kind: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl ValuesReference {
    pub fn config_map(name: impl Into<String>, values_key: impl Into<String>) -> Self {
        Self {
            kind: "ConfigMap".to_string(),
            name: name.into(),
            values_key: Some(values_key.into()),
            target_path: None,
            optional: false,
        }
    }
}

// ============ GitRepository ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: GitRepositorySpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepositorySpec {
    pub url: String,

    #[serde(rename = "ref")]
    pub reference: GitRepositoryRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepositoryRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl From<&GitRef> for GitRepositoryRef {
    fn from(reference: &GitRef) -> Self {
        match reference {
            GitRef::Branch(branch) => Self {
                branch: Some(branch.clone()),
                tag: None,
            },
            GitRef::Tag(tag) => Self {
                branch: None,
                tag: Some(tag.clone()),
            },
        }
    }
}

impl GitRepository {
    pub fn new(meta: ObjectMeta, url: impl Into<String>, reference: &GitRef) -> Self {
        Self {
            api_version: SOURCE_API_VERSION.to_string(),
            kind: GIT_REPOSITORY_KIND.to_string(),
            metadata: meta,
            spec: GitRepositorySpec {
                url: url.into(),
                reference: reference.into(),
            },
        }
    }
}

// ============ HelmRelease ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmRelease {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: HelmReleaseSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseSpec {
    pub chart: HelmChartTemplate,

    /// Opaque values passed through from the subscription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values_from: Vec<ValuesReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmChartTemplate {
    pub spec: HelmChartTemplateSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartTemplateSpec {
    /// Chart name in a Helm repository, or chart path in a git repository
    pub chart: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub source_ref: CrossNamespaceObjectReference,
}

impl HelmRelease {
    pub fn new(
        meta: ObjectMeta,
        chart: HelmChartTemplateSpec,
        values: Option<serde_json::Value>,
        values_from: Vec<ValuesReference>,
    ) -> Self {
        Self {
            api_version: HELM_API_VERSION.to_string(),
            kind: HELM_RELEASE_KIND.to_string(),
            metadata: meta,
            spec: HelmReleaseSpec {
                chart: HelmChartTemplate { spec: chart },
                values,
                values_from,
            },
        }
    }

    pub fn chart(&self) -> &HelmChartTemplateSpec {
        &self.spec.chart.spec
    }
}

// ============ Kustomization ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kustomization {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: KustomizationSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustomizationSpec {
    pub path: String,

    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    pub prune: bool,

    pub target_namespace: String,

    pub source_ref: CrossNamespaceObjectReference,
}

impl Kustomization {
    pub fn new(meta: ObjectMeta, spec: KustomizationSpec) -> Self {
        Self {
            api_version: KUSTOMIZE_API_VERSION.to_string(),
            kind: KUSTOMIZATION_KIND.to_string(),
            metadata: meta,
            spec,
        }
    }
}

// ============ HelmRepository ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmRepository {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: HelmRepositorySpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmRepositorySpec {
    pub url: String,
}

impl HelmRepository {
    pub fn new(meta: ObjectMeta, url: impl Into<String>) -> Self {
        Self {
            api_version: SOURCE_API_VERSION.to_string(),
            kind: HELM_REPOSITORY_KIND.to_string(),
            metadata: meta,
            spec: HelmRepositorySpec { url: url.into() },
        }
    }
}

// ============ Union ============

/// Any object the resolver can emit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ManifestObject {
    GitRepository(GitRepository),
    HelmRelease(HelmRelease),
    Kustomization(Kustomization),
    HelmRepository(HelmRepository),
}

impl ManifestObject {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GitRepository(_) => GIT_REPOSITORY_KIND,
            Self::HelmRelease(_) => HELM_RELEASE_KIND,
            Self::Kustomization(_) => KUSTOMIZATION_KIND,
            Self::HelmRepository(_) => HELM_REPOSITORY_KIND,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::GitRepository(o) => &o.metadata,
            Self::HelmRelease(o) => &o.metadata,
            Self::Kustomization(o) => &o.metadata,
            Self::HelmRepository(o) => &o.metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata().namespace
    }

    pub fn as_git_repository(&self) -> Option<&GitRepository> {
        match self {
            Self::GitRepository(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_helm_release(&self) -> Option<&HelmRelease> {
        match self {
            Self::HelmRelease(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_kustomization(&self) -> Option<&Kustomization> {
        match self {
            Self::Kustomization(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_helm_repository(&self) -> Option<&HelmRepository> {
        match self {
            Self::HelmRepository(o) => Some(o),
            _ => None,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl From<GitRepository> for ManifestObject {
    fn from(o: GitRepository) -> Self {
        Self::GitRepository(o)
    }
}

impl From<HelmRelease> for ManifestObject {
    fn from(o: HelmRelease) -> Self {
        Self::HelmRelease(o)
    }
}

impl From<Kustomization> for ManifestObject {
    fn from(o: Kustomization) -> Self {
        Self::Kustomization(o)
    }
}

impl From<HelmRepository> for ManifestObject {
    fn from(o: HelmRepository) -> Self {
        Self::HelmRepository(o)
    }
}
