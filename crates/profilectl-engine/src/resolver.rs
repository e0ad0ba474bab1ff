//! Recursive profile resolution

use profilectl_core::{ProfileDefinition, ProfileSubscription, SourceRef};
use tracing::{debug, info, trace};

use crate::builder::{
    BuildScope, Builder, DefinitionMeta, NestedProfileBuilder, ResolvedArtifact,
    SourceReferenceBuilder, SubscriptionMeta,
};
use crate::context::ResolutionContext;
use crate::error::{BuildFailure, ResolveError, Result};
use crate::fetch::DefinitionFetcher;
use crate::naming;
use crate::validate;

/// Expands a subscription into its ordered list of artifacts
///
/// Definitions are fetched depth-first in declared order. A nested profile's
/// artifacts are spliced in where the nested artifact was declared, and each
/// distinct repository and ref gets exactly one GitRepository.
pub struct ArtifactResolver<'a> {
    fetcher: Box<dyn DefinitionFetcher + Send + Sync + 'a>,
}

impl<'a> ArtifactResolver<'a> {
    pub fn new(fetcher: impl DefinitionFetcher + Send + Sync + 'a) -> Self {
        Self {
            fetcher: Box::new(fetcher),
        }
    }

    /// Resolve a subscription; any failure aborts the whole call
    pub fn resolve(&self, subscription: &ProfileSubscription) -> Result<Vec<ResolvedArtifact>> {
        let source = subscription
            .source()
            .map_err(|source| ResolveError::InvalidSubscription {
                name: subscription.name().to_string(),
                source,
            })?;
        let meta = SubscriptionMeta::from(subscription);
        info!(
            subscription = meta.name,
            url = %source.url,
            reference = %source.reference,
            "Resolving profile"
        );

        let mut ctx = ResolutionContext::new();
        let mut output = Vec::new();
        ctx.push(source.repo_key());

        let definition = self.fetch(&source, subscription.name())?;
        let trail = definition.name().to_string();
        let root = DefinitionMeta {
            scope: definition.name().to_string(),
            source,
        };
        self.resolve_definition(&definition, &root, meta, &trail, &mut ctx, &mut output)?;
        ctx.pop();

        info!(
            subscription = meta.name,
            artifacts = output.len(),
            sources = ctx.source_count(),
            "Resolved profile"
        );
        Ok(output)
    }

    fn fetch(&self, source: &SourceRef, profile: &str) -> Result<ProfileDefinition> {
        let definition = self
            .fetcher
            .fetch(source)
            .map_err(|err| ResolveError::Fetch {
                profile: profile.to_string(),
                location: source.clone(),
                source: err,
            })?;
        debug!(
            profile = definition.name(),
            url = %source.url,
            reference = %source.reference,
            path = %source.path,
            artifacts = definition.artifacts().len(),
            "Fetched profile definition"
        );
        Ok(definition)
    }

    fn resolve_definition(
        &self,
        definition: &ProfileDefinition,
        meta: &DefinitionMeta,
        subscription: SubscriptionMeta<'_>,
        trail: &str,
        ctx: &mut ResolutionContext,
        output: &mut Vec<ResolvedArtifact>,
    ) -> Result<()> {
        let builders = validate::plan(definition, trail)?;
        let scope = BuildScope {
            subscription,
            definition: meta,
        };
        if let Some(first) = builders.iter().find(|b| b.needs_owning_source()) {
            let owning = SourceReferenceBuilder::new(first.artifact_name(), meta.source.repo_key());
            owning
                .build(&scope, ctx)
                .and_then(|built| emit(built, ctx, output))
                .map_err(build_error(trail, first.artifact_name()))?;
        }

        for builder in &builders {
            let built = match builder {
                Builder::SourceReference(b) => b.build(&scope, ctx),
                Builder::LocalChart(b) => b.build(&scope, ctx),
                Builder::RemoteChart(b) => b.build(&scope, ctx),
                Builder::Overlay(b) => b.build(&scope, ctx),
                Builder::NestedProfile(b) => {
                    self.expand(b, subscription, trail, ctx, output)?;
                    continue;
                }
            };
            built
                .and_then(|built| emit(built, ctx, output))
                .map_err(build_error(trail, builder.artifact_name()))?;
        }
        Ok(())
    }

    fn expand(
        &self,
        nested: &NestedProfileBuilder<'_>,
        subscription: SubscriptionMeta<'_>,
        trail: &str,
        ctx: &mut ResolutionContext,
        output: &mut Vec<ResolvedArtifact>,
    ) -> Result<()> {
        let key = nested.target.repo_key();
        if !ctx.push(key.clone()) {
            return Err(ResolveError::Recursion {
                profile: trail.to_string(),
                artifact: nested.artifact.to_string(),
                target: key,
            });
        }

        let definition = self.fetch(&nested.target, trail)?;
        let trail = format!("{}/{}", trail, definition.name());
        let meta = DefinitionMeta {
            scope: naming::nested_scope(&nested.target),
            source: nested.target.clone(),
        };
        debug!(profile = %trail, depth = ctx.depth(), "Expanding nested profile");
        self.resolve_definition(&definition, &meta, subscription, &trail, ctx, output)?;
        ctx.pop();
        Ok(())
    }
}

fn build_error(profile: &str, artifact: &str) -> impl FnOnce(BuildFailure) -> ResolveError {
    let profile = profile.to_string();
    let artifact = artifact.to_string();
    move |reason| ResolveError::Build {
        profile,
        artifact,
        reason,
    }
}

/// Append built artifacts, skipping exact repeats of earlier ones
fn emit(
    built: Vec<ResolvedArtifact>,
    ctx: &mut ResolutionContext,
    output: &mut Vec<ResolvedArtifact>,
) -> std::result::Result<(), BuildFailure> {
    for artifact in built {
        if ctx.record(&artifact)? {
            output.push(artifact);
        } else {
            trace!(name = %artifact.name, "Skipping repeated artifact");
        }
    }
    Ok(())
}
