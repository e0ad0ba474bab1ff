//! Output writer
//!
//! Lays a resolved subscription out on disk:
//!
//! ```text
//! <out>/<install>/profile.yaml
//! <out>/<install>/artifacts/<artifact>/<Kind>.yaml
//! <out>/<install>/<destinationPath>/...   (copied chart sources)
//! ```

use std::path::{Component, Path, PathBuf};

use profilectl_core::ProfileSubscription;
use profilectl_engine::ResolvedArtifact;
use profilectl_repo::RepositoryCheckout;

use crate::error::{CliError, Result};

/// Subscription document file name inside the installation directory
pub const SUBSCRIPTION_FILE: &str = "profile.yaml";

/// What a write produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub manifests: usize,
    pub copied_files: usize,
}

pub struct OutputWriter<'a, C> {
    install_dir: PathBuf,
    checkout: &'a C,
}

impl<'a, C: RepositoryCheckout> OutputWriter<'a, C> {
    pub fn new(out: &Path, install_name: &str, checkout: &'a C) -> Self {
        Self {
            install_dir: out.join(install_name),
            checkout,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Write the installation
    ///
    /// Everything is staged in a temporary directory next to the installation
    /// and moved into place only once every file is written, replacing any
    /// previous installation of the same name.
    pub fn write(
        &self,
        subscription: &ProfileSubscription,
        artifacts: &[ResolvedArtifact],
    ) -> Result<WriteSummary> {
        let out = self.install_dir.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(out)?;
        let staging = tempfile::Builder::new()
            .prefix(".profilectl-")
            .tempdir_in(out)?;

        let summary = self.write_into(staging.path(), subscription, artifacts)?;

        if self.install_dir.exists() {
            tracing::info!(dir = %self.install_dir.display(), "Replacing previous installation");
            std::fs::remove_dir_all(&self.install_dir)?;
        }
        std::fs::rename(staging.path(), &self.install_dir)?;
        Ok(summary)
    }

    fn write_into(
        &self,
        root: &Path,
        subscription: &ProfileSubscription,
        artifacts: &[ResolvedArtifact],
    ) -> Result<WriteSummary> {
        std::fs::write(root.join(SUBSCRIPTION_FILE), subscription.to_yaml()?)?;

        let mut summary = WriteSummary::default();
        for artifact in artifacts {
            let dir = root
                .join("artifacts")
                .join(contained("artifact name", &artifact.name)?);
            std::fs::create_dir_all(&dir)?;
            for object in &artifact.objects {
                let file = dir.join(format!("{}.yaml", object.kind()));
                std::fs::write(&file, object.to_yaml()?)?;
                tracing::debug!(file = %file.display(), "Wrote manifest");
                summary.manifests += 1;
            }

            if let Some(copy) = &artifact.source_copy {
                contained("sparse path", &copy.sparse_path)?;
                let dest = root.join(contained("destination path", &copy.destination_path)?);
                let checkout =
                    self.checkout
                        .checkout(&copy.repo_url, &copy.reference, &copy.sparse_path)?;
                let copied = checkout.copy_out(&copy.sparse_path, &dest)?;
                tracing::debug!(
                    repo = %copy.repo_url,
                    path = %copy.sparse_path,
                    dest = %dest.display(),
                    files = copied,
                    "Copied artifact source"
                );
                summary.copied_files += copied;
            }
        }
        Ok(summary)
    }
}

/// `relative` as a path that cannot leave the directory it is joined to
fn contained<'p>(what: &str, relative: &'p str) -> Result<&'p Path> {
    let path = Path::new(relative);
    let inside = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if inside {
        Ok(path)
    } else {
        Err(CliError::validation(format!(
            "{} {:?} leaves the installation directory",
            what, relative
        )))
    }
}

/// Directory name for an installation
///
/// The last segment of the profile path, or the repository name when the
/// profile sits at the repository root.
pub fn install_name(profile_url: &str, profile_path: &str) -> String {
    profile_path
        .trim_matches('/')
        .rsplit('/')
        .find(|segment| !matches!(*segment, "" | "." | ".."))
        .map(str::to_string)
        .unwrap_or_else(|| profilectl_core::repo_short_name(profile_url).to_string())
}

/// Render artifacts as a multi-document YAML stream
pub fn to_yaml_stream(artifacts: &[ResolvedArtifact]) -> Result<String> {
    let mut out = String::new();
    for object in artifacts.iter().flat_map(|a| &a.objects) {
        out.push_str("---\n");
        out.push_str(&object.to_yaml()?);
    }
    Ok(out)
}

pub fn to_json(artifacts: &[ResolvedArtifact]) -> Result<String> {
    serde_json::to_string_pretty(artifacts).map_err(|e| CliError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use profilectl_core::{
        CrossNamespaceObjectReference, GitRef, HelmChartTemplateSpec, HelmRelease, ObjectMeta,
        SubscriptionSpec,
    };
    use profilectl_engine::SourceCopy;
    use profilectl_repo::LocalFetcher;
    use tempfile::TempDir;

    const URL: &str = "https://github.com/weaveworks/profiles-examples";

    fn subscription() -> ProfileSubscription {
        ProfileSubscription::new(
            "mySub",
            "default",
            SubscriptionSpec {
                profile_url: URL.to_string(),
                branch: Some("main".to_string()),
                path: Some("weaveworks-nginx".to_string()),
                ..Default::default()
            },
        )
    }

    fn local_chart() -> ResolvedArtifact {
        let release = HelmRelease::new(
            ObjectMeta::new("mySub-weaveworks-nginx-nginx-server", "default"),
            HelmChartTemplateSpec {
                chart: "weaveworks-nginx/nginx/chart".to_string(),
                version: None,
                source_ref: CrossNamespaceObjectReference::new(
                    "GitRepository",
                    "mySub-profiles-examples-main",
                    "default",
                ),
            },
            None,
            Vec::new(),
        );
        ResolvedArtifact {
            name: "mySub-weaveworks-nginx-nginx-server".to_string(),
            objects: vec![release.into()],
            source_copy: Some(SourceCopy {
                repo_url: URL.to_string(),
                reference: GitRef::Branch("main".to_string()),
                sparse_path: "weaveworks-nginx/nginx/chart".to_string(),
                destination_path: "artifacts/mySub-weaveworks-nginx-nginx-server/nginx/chart"
                    .to_string(),
            }),
        }
    }

    #[test]
    fn test_install_name() {
        assert_eq!(install_name(URL, "weaveworks-nginx"), "weaveworks-nginx");
        assert_eq!(install_name(URL, "profiles/nginx/"), "nginx");
        assert_eq!(install_name(URL, "."), "profiles-examples");
        assert_eq!(install_name(URL, "nginx/.."), "nginx");
        assert_eq!(install_name(URL, ".."), "profiles-examples");
        assert_eq!(install_name(&format!("{}.git", URL), ""), "profiles-examples");
    }

    #[test]
    fn test_write_layout_and_source_copy() {
        let mirror = TempDir::new().unwrap();
        let chart = mirror
            .path()
            .join("profiles-examples/main/weaveworks-nginx/nginx/chart");
        std::fs::create_dir_all(chart.join("templates")).unwrap();
        std::fs::write(chart.join("Chart.yaml"), "name: nginx\n").unwrap();
        std::fs::write(chart.join("templates/deploy.yaml"), "kind: Deployment\n").unwrap();

        let out = TempDir::new().unwrap();
        let fetcher = LocalFetcher::new(mirror.path());
        let writer = OutputWriter::new(out.path(), "weaveworks-nginx", &fetcher);
        let summary = writer.write(&subscription(), &[local_chart()]).unwrap();

        assert_eq!(
            summary,
            WriteSummary {
                manifests: 1,
                copied_files: 2
            }
        );
        let install = out.path().join("weaveworks-nginx");
        let subscription = std::fs::read_to_string(install.join("profile.yaml")).unwrap();
        assert!(subscription.contains("kind: ProfileSubscription"));

        let artifact = install.join("artifacts/mySub-weaveworks-nginx-nginx-server");
        let release = std::fs::read_to_string(artifact.join("HelmRelease.yaml")).unwrap();
        assert!(release.contains("chart: weaveworks-nginx/nginx/chart"));
        assert!(artifact.join("nginx/chart/Chart.yaml").is_file());
        assert!(artifact.join("nginx/chart/templates/deploy.yaml").is_file());
    }

    #[test]
    fn test_missing_source_copy_fails() {
        let mirror = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let fetcher = LocalFetcher::new(mirror.path());
        let writer = OutputWriter::new(out.path(), "weaveworks-nginx", &fetcher);
        let err = writer.write(&subscription(), &[local_chart()]).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::FETCH_ERROR);
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_installation() {
        let mirror = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let previous = out.path().join("weaveworks-nginx");
        std::fs::create_dir_all(&previous).unwrap();
        std::fs::write(previous.join("profile.yaml"), "previous\n").unwrap();

        let fetcher = LocalFetcher::new(mirror.path());
        let writer = OutputWriter::new(out.path(), "weaveworks-nginx", &fetcher);
        assert!(writer.write(&subscription(), &[local_chart()]).is_err());

        let content = std::fs::read_to_string(previous.join("profile.yaml")).unwrap();
        assert_eq!(content, "previous\n");
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_destination_outside_installation_is_refused() {
        let mirror = TempDir::new().unwrap();
        let chart = mirror.path().join("profiles-examples/main/weaveworks-nginx/nginx/chart");
        std::fs::create_dir_all(&chart).unwrap();
        std::fs::write(chart.join("Chart.yaml"), "name: nginx\n").unwrap();

        let out = TempDir::new().unwrap();
        let mut artifact = local_chart();
        if let Some(copy) = artifact.source_copy.as_mut() {
            copy.destination_path = "artifacts/x/../../../../escaped".to_string();
        }

        let fetcher = LocalFetcher::new(mirror.path());
        let writer = OutputWriter::new(&out.path().join("out"), "weaveworks-nginx", &fetcher);
        let err = writer.write(&subscription(), &[artifact]).unwrap_err();
        assert_eq!(err.exit_code(), crate::exit_codes::VALIDATION_ERROR);
        assert!(err.to_string().contains("leaves the installation directory"));
        assert!(!out.path().join("escaped").exists());
        assert!(!out.path().join("out/weaveworks-nginx").exists());

        let mut named = local_chart();
        named.name = "../escaped".to_string();
        named.source_copy = None;
        assert!(writer.write(&subscription(), &[named]).is_err());
    }

    #[test]
    fn test_yaml_stream() {
        let stream = to_yaml_stream(&[local_chart()]).unwrap();
        assert!(stream.starts_with("---\n"));
        assert!(stream.contains("kind: HelmRelease"));
        assert_eq!(stream.matches("---\n").count(), 1);
    }
}
