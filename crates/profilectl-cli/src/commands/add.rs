//! Add command - generate a profile installation

use std::path::Path;

use console::style;
use profilectl_core::{CatalogDescription, ProfileSubscription, SubscriptionSpec, ValuesReference};
use profilectl_engine::ArtifactResolver;
use profilectl_repo::{CatalogRef, GitFetcher, LocalFetcher, RepositoryCheckout, Settings};

use crate::commands;
use crate::error::{CliError, Result};
use crate::writer::{self, OutputWriter};

/// Flags of `profilectl add`
#[derive(Debug, Clone)]
pub struct AddOptions<'a> {
    pub name: &'a str,
    pub namespace: Option<&'a str>,
    pub profile_branch: Option<&'a str>,
    pub config_map: Option<&'a str>,
    pub out: &'a Path,
    pub profile_repo_url: Option<&'a str>,
    pub profile_path: &'a str,
    pub catalog_ref: Option<&'a str>,
    pub catalog_url: Option<&'a str>,
    pub local_root: Option<&'a Path>,
}

impl<'a> AddOptions<'a> {
    pub fn new(name: &'a str, out: &'a Path) -> Self {
        Self {
            name,
            namespace: None,
            profile_branch: None,
            config_map: None,
            out,
            profile_repo_url: None,
            profile_path: ".",
            catalog_ref: None,
            catalog_url: None,
            local_root: None,
        }
    }
}

pub fn run(opts: &AddOptions<'_>) -> Result<()> {
    let settings = Settings::load()?;
    let (subscription, install_name) = build_subscription(opts, &settings)?;
    tracing::info!(
        name = subscription.name(),
        namespace = subscription.namespace(),
        install = %install_name,
        "Adding profile"
    );

    match opts.local_root {
        Some(root) => install(&subscription, &install_name, opts.out, LocalFetcher::new(root)),
        None => install(
            &subscription,
            &install_name,
            opts.out,
            GitFetcher::new(&settings.git_binary),
        ),
    }
}

fn install<F>(subscription: &ProfileSubscription, install_name: &str, out: &Path, fetcher: F) -> Result<()>
where
    F: profilectl_engine::DefinitionFetcher + RepositoryCheckout + Clone + Send + Sync,
{
    let artifacts = ArtifactResolver::new(fetcher.clone()).resolve(subscription)?;
    let writer = OutputWriter::new(out, install_name, &fetcher);
    let summary = writer.write(subscription, &artifacts)?;

    println!(
        "{} generated {} artifact(s), {} manifest(s) in {}",
        style("✓").green().bold(),
        artifacts.len(),
        summary.manifests,
        writer.install_dir().display()
    );
    if summary.copied_files > 0 {
        println!("  copied {} chart source file(s)", summary.copied_files);
    }
    Ok(())
}

/// Subscription and installation directory name for the given flags
pub fn build_subscription(
    opts: &AddOptions<'_>,
    settings: &Settings,
) -> Result<(ProfileSubscription, String)> {
    let namespace = opts.namespace.unwrap_or(&settings.namespace);

    let (mut spec, install_name) = match (opts.profile_repo_url, opts.catalog_ref) {
        (Some(_), Some(_)) => {
            return Err(CliError::usage(
                "it looks like you provided a url with a catalog entry",
                "choose either --profile-repo-url with --profile-path, or <CATALOG>/<PROFILE>[/<VERSION>]",
            ));
        }
        (None, None) => {
            return Err(CliError::usage(
                "no profile to add",
                "pass --profile-repo-url or a <CATALOG>/<PROFILE>[/<VERSION>] argument",
            ));
        }
        (Some(url), None) => {
            let branch = opts.profile_branch.unwrap_or(&settings.branch);
            let spec = SubscriptionSpec {
                profile_url: url.to_string(),
                branch: Some(branch.to_string()),
                path: Some(opts.profile_path.to_string()),
                ..Default::default()
            };
            (spec, writer::install_name(url, opts.profile_path))
        }
        (None, Some(reference)) => {
            let reference: CatalogRef = reference.parse()?;
            let client = commands::catalog_client(opts.catalog_url, settings)?;
            let description = commands::runtime()?.block_on(client.show_ref(&reference))?;
            let spec = SubscriptionSpec {
                profile_url: description.url.clone(),
                version: Some(description.release_tag()),
                profile_catalog_description: Some(CatalogDescription {
                    catalog: reference.catalog.clone(),
                    profile: description.name.clone(),
                    version: description.version.clone(),
                }),
                ..Default::default()
            };
            (spec, reference.profile)
        }
    };

    if let Some(key) = opts.config_map {
        spec.values_from = vec![ValuesReference::config_map(
            format!("{}-values", opts.name),
            key,
        )];
    }

    Ok((
        ProfileSubscription::new(opts.name, namespace, spec),
        install_name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const URL: &str = "https://github.com/weaveworks/profiles-examples";

    fn url_opts(out: &Path) -> AddOptions<'_> {
        AddOptions {
            profile_repo_url: Some(URL),
            profile_path: "bitnami-nginx",
            ..AddOptions::new("pctl-profile", out)
        }
    }

    #[test]
    fn test_url_mode_defaults_from_settings() {
        let out = PathBuf::from(".");
        let settings = Settings {
            namespace: "flux-system".to_string(),
            branch: "development".to_string(),
            ..Default::default()
        };
        let (sub, install) = build_subscription(&url_opts(&out), &settings).unwrap();

        assert_eq!(install, "bitnami-nginx");
        assert_eq!(sub.namespace(), "flux-system");
        assert_eq!(sub.spec.branch.as_deref(), Some("development"));
        assert_eq!(sub.spec.path.as_deref(), Some("bitnami-nginx"));
        assert!(sub.spec.values_from.is_empty());
    }

    #[test]
    fn test_flags_override_settings() {
        let out = PathBuf::from(".");
        let opts = AddOptions {
            namespace: Some("default"),
            profile_branch: Some("main"),
            config_map: Some("values.yaml"),
            ..url_opts(&out)
        };
        let (sub, _) = build_subscription(&opts, &Settings::default()).unwrap();

        assert_eq!(sub.namespace(), "default");
        assert_eq!(sub.spec.branch.as_deref(), Some("main"));
        let values = &sub.spec.values_from[0];
        assert_eq!(values.kind, "ConfigMap");
        assert_eq!(values.name, "pctl-profile-values");
        assert_eq!(values.values_key.as_deref(), Some("values.yaml"));
    }

    #[test]
    fn test_url_and_catalog_conflict() {
        let out = PathBuf::from(".");
        let opts = AddOptions {
            catalog_ref: Some("nginx-catalog/weaveworks-nginx"),
            ..url_opts(&out)
        };
        let err = build_subscription(&opts, &Settings::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::USAGE_ERROR);
    }

    #[test]
    fn test_nothing_to_add() {
        let out = PathBuf::from(".");
        let opts = AddOptions::new("pctl-profile", &out);
        assert!(matches!(
            build_subscription(&opts, &Settings::default()),
            Err(CliError::Usage { .. })
        ));
    }

    #[test]
    fn test_bad_catalog_reference() {
        let out = PathBuf::from(".");
        let opts = AddOptions {
            catalog_ref: Some("just-a-name"),
            ..AddOptions::new("pctl-profile", &out)
        };
        let err = build_subscription(&opts, &Settings::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::USAGE_ERROR);
    }
}
