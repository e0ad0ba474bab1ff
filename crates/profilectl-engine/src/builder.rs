//! Per-kind artifact builders
//!
//! Each validated artifact becomes one [`Builder`] variant. Builders turn the
//! artifact into manifest objects using the subscription and definition it
//! belongs to, recording shared state in the [`ResolutionContext`].

use std::time::Duration;

use profilectl_core::{
    ChartRef, CrossNamespaceObjectReference, GitRef, GitRepository, HelmChartTemplateSpec,
    HelmRelease, HelmRepository, Kustomization, KustomizationSpec, ManifestObject, ObjectMeta,
    ProfileSubscription, RepoKey, SourceRef, ValuesReference, join_repo_path,
    manifest::{GIT_REPOSITORY_KIND, HELM_REPOSITORY_KIND},
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::context::ResolutionContext;
use crate::error::BuildFailure;
use crate::naming;

/// Reconciliation interval of generated Kustomizations
pub const OVERLAY_INTERVAL: Duration = Duration::from_secs(300);

/// One artifact of the resolved output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedArtifact {
    /// Name of the primary manifest object, unique within one resolution
    pub name: String,

    pub objects: Vec<ManifestObject>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_copy: Option<SourceCopy>,
}

impl ResolvedArtifact {
    fn single(name: String, object: impl Into<ManifestObject>) -> Self {
        Self {
            name,
            objects: vec![object.into()],
            source_copy: None,
        }
    }
}

/// Instruction to copy part of a repository into the output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCopy {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(rename = "ref")]
    pub reference: GitRef,

    /// Directory inside the repository
    pub sparse_path: String,

    /// Destination relative to the installation directory
    pub destination_path: String,
}

/// Subscription fields stamped onto generated objects
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionMeta<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    pub values: Option<&'a serde_json::Value>,
    pub values_from: &'a [ValuesReference],
}

impl<'a> From<&'a ProfileSubscription> for SubscriptionMeta<'a> {
    fn from(subscription: &'a ProfileSubscription) -> Self {
        Self {
            name: subscription.name(),
            namespace: subscription.namespace(),
            values: subscription.spec.values.as_ref(),
            values_from: &subscription.spec.values_from,
        }
    }
}

/// The definition an artifact was declared in
#[derive(Debug, Clone)]
pub struct DefinitionMeta {
    /// Middle segment of generated artifact names
    pub scope: String,
    pub source: SourceRef,
}

/// Everything a builder needs besides its artifact
#[derive(Debug, Clone, Copy)]
pub struct BuildScope<'a> {
    pub subscription: SubscriptionMeta<'a>,
    pub definition: &'a DefinitionMeta,
}

impl BuildScope<'_> {
    fn artifact_name(&self, artifact: &str) -> String {
        naming::artifact_name(self.subscription.name, &self.definition.scope, artifact)
    }

    fn source_ref(&self, kind: &str, name: &str) -> CrossNamespaceObjectReference {
        CrossNamespaceObjectReference::new(kind, name, self.subscription.namespace)
    }

    fn meta(&self, name: &str) -> ObjectMeta {
        ObjectMeta::new(name, self.subscription.namespace)
    }

    fn release(&self, name: &str, chart: HelmChartTemplateSpec) -> HelmRelease {
        HelmRelease::new(
            self.meta(name),
            chart,
            self.subscription.values.cloned(),
            self.subscription.values_from.to_vec(),
        )
    }

    /// Name of the GitRepository holding the owning definition
    fn owning_source(&self, ctx: &ResolutionContext) -> Result<String, BuildFailure> {
        let key = self.definition.source.repo_key();
        match ctx.source_name(&key) {
            Some(name) => Ok(name.to_string()),
            None => Err(BuildFailure::MissingSource(key)),
        }
    }
}

/// A validated artifact, ready to build
#[derive(Debug, Clone)]
pub enum Builder<'d> {
    SourceReference(SourceReferenceBuilder<'d>),
    LocalChart(LocalChartBuilder<'d>),
    RemoteChart(RemoteChartBuilder<'d>),
    Overlay(OverlayBuilder<'d>),
    NestedProfile(NestedProfileBuilder<'d>),
}

impl Builder<'_> {
    pub fn artifact_name(&self) -> &str {
        match self {
            Self::SourceReference(b) => b.artifact,
            Self::LocalChart(b) => b.artifact,
            Self::RemoteChart(b) => b.artifact,
            Self::Overlay(b) => b.artifact,
            Self::NestedProfile(b) => b.artifact,
        }
    }

    /// Whether this artifact points into its own definition's repository
    pub fn needs_owning_source(&self) -> bool {
        matches!(self, Self::LocalChart(_) | Self::Overlay(_))
    }
}

/// Emits one GitRepository per distinct repository and ref
#[derive(Debug, Clone)]
pub struct SourceReferenceBuilder<'d> {
    pub artifact: &'d str,
    pub source: RepoKey,
}

impl<'d> SourceReferenceBuilder<'d> {
    pub fn new(artifact: &'d str, source: RepoKey) -> Self {
        Self { artifact, source }
    }

    /// Build the GitRepository, or nothing if this repository was already emitted
    pub fn build(
        &self,
        scope: &BuildScope<'_>,
        ctx: &mut ResolutionContext,
    ) -> Result<Vec<ResolvedArtifact>, BuildFailure> {
        if let Some(existing) = ctx.source_name(&self.source) {
            trace!(source = %self.source, name = existing, "Reusing source repository");
            return Ok(Vec::new());
        }

        let name = naming::source_name(scope.subscription.name, &self.source);
        ctx.register_source(self.source.clone(), name.clone());
        debug!(source = %self.source, name = %name, "Built source repository");

        let repository =
            GitRepository::new(scope.meta(&name), self.source.url.clone(), &self.source.reference);
        Ok(vec![ResolvedArtifact::single(name, repository)])
    }
}

/// Helm chart stored in the owning definition's repository
#[derive(Debug, Clone)]
pub struct LocalChartBuilder<'d> {
    pub artifact: &'d str,
    pub path: &'d str,
}

impl LocalChartBuilder<'_> {
    pub fn build(
        &self,
        scope: &BuildScope<'_>,
        ctx: &mut ResolutionContext,
    ) -> Result<Vec<ResolvedArtifact>, BuildFailure> {
        let source_name = scope.owning_source(ctx)?;
        let name = scope.artifact_name(self.artifact);

        let source = &scope.definition.source;
        let chart_path = source.join(self.path);
        let release = scope.release(
            &name,
            HelmChartTemplateSpec {
                chart: chart_path.clone(),
                version: None,
                source_ref: scope.source_ref(GIT_REPOSITORY_KIND, &source_name),
            },
        );
        let copy = SourceCopy {
            repo_url: source.url.clone(),
            reference: source.reference.clone(),
            sparse_path: chart_path,
            destination_path: join_repo_path(&format!("artifacts/{}", name), self.path),
        };
        debug!(name = %name, chart = %release.chart().chart, "Built local chart release");

        Ok(vec![ResolvedArtifact {
            name,
            objects: vec![release.into()],
            source_copy: Some(copy),
        }])
    }
}

/// Helm chart published in a Helm repository
#[derive(Debug, Clone)]
pub struct RemoteChartBuilder<'d> {
    pub artifact: &'d str,
    pub chart: &'d ChartRef,
}

impl RemoteChartBuilder<'_> {
    pub fn build(
        &self,
        scope: &BuildScope<'_>,
        _ctx: &mut ResolutionContext,
    ) -> Result<Vec<ResolvedArtifact>, BuildFailure> {
        let name = scope.artifact_name(self.artifact);

        let repository_name = naming::chart_repository_name(
            scope.subscription.name,
            &scope.definition.source.url,
            &self.chart.name,
        );
        let release = scope.release(
            &name,
            HelmChartTemplateSpec {
                chart: self.chart.name.clone(),
                version: self.chart.version.clone(),
                source_ref: scope.source_ref(HELM_REPOSITORY_KIND, &repository_name),
            },
        );
        let repository = HelmRepository::new(scope.meta(&repository_name), self.chart.url.clone());
        debug!(name = %name, chart = %self.chart.name, repository = %repository_name, "Built remote chart release");

        Ok(vec![ResolvedArtifact {
            name,
            objects: vec![release.into(), repository.into()],
            source_copy: None,
        }])
    }
}

/// Kustomize overlay stored in the owning definition's repository
#[derive(Debug, Clone)]
pub struct OverlayBuilder<'d> {
    pub artifact: &'d str,
    pub path: &'d str,
}

impl OverlayBuilder<'_> {
    pub fn build(
        &self,
        scope: &BuildScope<'_>,
        ctx: &mut ResolutionContext,
    ) -> Result<Vec<ResolvedArtifact>, BuildFailure> {
        let source_name = scope.owning_source(ctx)?;
        let name = scope.artifact_name(self.artifact);

        let kustomization = Kustomization::new(
            scope.meta(&name),
            KustomizationSpec {
                path: scope.definition.source.join(self.path),
                interval: OVERLAY_INTERVAL,
                prune: true,
                target_namespace: scope.subscription.namespace.to_string(),
                source_ref: scope.source_ref(GIT_REPOSITORY_KIND, &source_name),
            },
        );
        debug!(name = %name, path = %kustomization.spec.path, "Built overlay");

        Ok(vec![ResolvedArtifact::single(name, kustomization)])
    }
}

/// Reference to another profile; expanded by the resolver
#[derive(Debug, Clone)]
pub struct NestedProfileBuilder<'d> {
    pub artifact: &'d str,
    pub target: SourceRef,
}
