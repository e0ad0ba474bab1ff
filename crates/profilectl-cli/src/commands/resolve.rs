//! Resolve command - print the manifests for a subscription file

use std::path::Path;

use profilectl_core::ProfileSubscription;
use profilectl_engine::{ArtifactResolver, ResolvedArtifact};
use profilectl_repo::{GitFetcher, LocalFetcher, Settings};

use crate::commands::OutputFormat;
use crate::error::{CliError, Result};
use crate::writer;

pub fn run(file: &Path, output: OutputFormat, local_root: Option<&Path>) -> Result<()> {
    let subscription = ProfileSubscription::from_file(file).map_err(|e| match e {
        profilectl_core::CoreError::Io(io) => CliError::Io {
            message: format!("{}: {}", file.display(), io),
        },
        other => CliError::validation(format!("{}: {}", file.display(), other)),
    })?;

    let artifacts = match local_root {
        Some(root) => resolve(&subscription, LocalFetcher::new(root))?,
        None => {
            let settings = Settings::load()?;
            resolve(&subscription, GitFetcher::new(&settings.git_binary))?
        }
    };

    let rendered = match output {
        OutputFormat::Json => writer::to_json(&artifacts)?,
        OutputFormat::Yaml | OutputFormat::Table => writer::to_yaml_stream(&artifacts)?,
    };
    print!("{}", rendered);
    if output == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn resolve(
    subscription: &ProfileSubscription,
    fetcher: impl profilectl_engine::DefinitionFetcher + Send + Sync,
) -> Result<Vec<ResolvedArtifact>> {
    let artifacts = ArtifactResolver::new(fetcher).resolve(subscription)?;
    tracing::info!(
        subscription = subscription.name(),
        artifacts = artifacts.len(),
        "Resolved subscription"
    );
    Ok(artifacts)
}
