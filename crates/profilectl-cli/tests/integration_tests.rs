//! Integration tests for the profilectl CLI
//!
//! Repositories are served from a local mirror laid out as
//! `<root>/<repo short name>/<ref>/...`.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const REPO_URL: &str = "https://github.com/org/repo-name";
const NESTED_URL: &str = "https://github.com/org/nested-profile";

const NGINX_DEFINITION: &str = r#"apiVersion: weave.works/v1alpha1
kind: ProfileDefinition
metadata:
  name: nginx
spec:
  description: nginx with an overlay
  artifacts:
    - name: nginx-server
      kind: HelmChart
      path: nginx/chart
    - name: overlay
      kind: Kustomize
      path: nginx/overlay
"#;

struct Fixture {
    mirror: TempDir,
    home: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            mirror: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        };
        fixture.write("repo-name/main/profile/profile.yaml", NGINX_DEFINITION);
        fixture.write("repo-name/main/profile/nginx/chart/Chart.yaml", "name: nginx\n");
        fixture.write(
            "repo-name/main/profile/nginx/chart/templates/deployment.yaml",
            "kind: Deployment\n",
        );
        fixture.write(
            "repo-name/main/profile/nginx/overlay/kustomization.yaml",
            "resources: []\n",
        );
        fixture
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.mirror.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn root(&self) -> &Path {
        self.mirror.path()
    }

    fn subscription(&self, name: &str, url: &str, path: &str) -> PathBuf {
        let file = self.mirror.path().join(format!("{}.yaml", name));
        std::fs::write(
            &file,
            format!(
                r#"apiVersion: weave.works/v1alpha1
kind: ProfileSubscription
metadata:
  name: {name}
  namespace: default
spec:
  profileURL: {url}
  branch: main
  path: {path}
"#
            ),
        )
        .unwrap();
        file
    }

    /// Run the binary with an empty config directory and no catalog in the environment
    fn profilectl(&self, args: &[&str]) -> std::process::Output {
        Command::new(env!("CARGO_BIN_EXE_profilectl"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env_remove("PROFILECTL_CATALOG_URL")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute profilectl")
    }
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod resolve_command {
    use super::*;

    #[test]
    fn test_resolve_local_chart_and_overlay() {
        let fixture = Fixture::new();
        let sub = fixture.subscription("mySub", REPO_URL, "profile");
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&["resolve", sub.to_str().unwrap(), "--local-root", root]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let out = stdout(&output);
        let git = out.find("kind: GitRepository").unwrap();
        let release = out.find("kind: HelmRelease").unwrap();
        let overlay = out.find("kind: Kustomization").unwrap();
        assert!(git < release && release < overlay);

        assert!(out.contains("name: mySub-repo-name-main"));
        assert!(out.contains("name: mySub-nginx-nginx-server"));
        assert!(out.contains("name: mySub-nginx-overlay"));
        assert!(out.contains("chart: profile/nginx/chart"));
        assert!(out.contains("interval: 5m"));
        assert!(out.contains("targetNamespace: default"));
    }

    #[test]
    fn test_resolve_json_output() {
        let fixture = Fixture::new();
        let sub = fixture.subscription("mySub", REPO_URL, "profile");
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&[
            "resolve",
            sub.to_str().unwrap(),
            "-o",
            "json",
            "--local-root",
            root,
        ]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let artifacts: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let names: Vec<&str> = artifacts
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "mySub-repo-name-main",
                "mySub-nginx-nginx-server",
                "mySub-nginx-overlay"
            ]
        );
        assert_eq!(
            artifacts[1]["sourceCopy"]["destinationPath"],
            "artifacts/mySub-nginx-nginx-server/nginx/chart"
        );
        assert_eq!(artifacts[1]["sourceCopy"]["ref"]["branch"], "main");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let fixture = Fixture::new();
        let sub = fixture.subscription("mySub", REPO_URL, "profile");
        let root = fixture.root().to_str().unwrap();
        let args = ["resolve", sub.to_str().unwrap(), "--local-root", root];

        let first = fixture.profilectl(&args);
        let second = fixture.profilectl(&args);
        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn test_resolve_validation_error() {
        let fixture = Fixture::new();
        fixture.write(
            "repo-name/main/broken/profile.yaml",
            r#"apiVersion: weave.works/v1alpha1
kind: ProfileDefinition
metadata:
  name: broken
spec:
  artifacts:
    - name: both
      kind: HelmChart
      path: nginx/chart
      chart:
        url: https://charts.example.com
        name: nginx
"#,
        );
        let sub = fixture.subscription("mySub", REPO_URL, "broken");
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&["resolve", sub.to_str().unwrap(), "--local-root", root]);
        assert_eq!(output.status.code(), Some(2));
        let err = stderr(&output);
        assert!(err.contains("validation failed for artifact both"), "stderr: {}", err);
    }

    #[test]
    fn test_resolve_rejects_escaping_path() {
        let fixture = Fixture::new();
        fixture.write(
            "repo-name/main/escape/profile.yaml",
            r#"apiVersion: weave.works/v1alpha1
kind: ProfileDefinition
metadata:
  name: escape
spec:
  artifacts:
    - name: evil
      kind: HelmChart
      path: ../../../../etc/evil
"#,
        );
        let sub = fixture.subscription("mySub", REPO_URL, "escape");
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&["resolve", sub.to_str().unwrap(), "--local-root", root]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("validation failed for artifact evil"));
    }

    #[test]
    fn test_resolve_recursion_error() {
        let fixture = Fixture::new();
        fixture.write(
            "repo-name/main/loop/profile.yaml",
            &format!(
                r#"apiVersion: weave.works/v1alpha1
kind: ProfileDefinition
metadata:
  name: loop
spec:
  artifacts:
    - name: nested
      kind: Profile
      profile:
        url: {NESTED_URL}
        branch: main
        path: a
"#
            ),
        );
        fixture.write(
            "nested-profile/main/a/profile.yaml",
            &format!(
                r#"apiVersion: weave.works/v1alpha1
kind: ProfileDefinition
metadata:
  name: a
spec:
  artifacts:
    - name: back
      kind: Profile
      profile:
        url: {REPO_URL}
        branch: main
        path: loop
"#
            ),
        );
        let sub = fixture.subscription("mySub", REPO_URL, "loop");
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&["resolve", sub.to_str().unwrap(), "--local-root", root]);
        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("recursive artifact detected"));
    }

    #[test]
    fn test_resolve_missing_definition() {
        let fixture = Fixture::new();
        let sub = fixture.subscription("mySub", REPO_URL, "does-not-exist");
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&["resolve", sub.to_str().unwrap(), "--local-root", root]);
        assert_eq!(output.status.code(), Some(4));
        assert!(stderr(&output).contains("failed to get profile definition"));
    }

    #[test]
    fn test_resolve_missing_file() {
        let fixture = Fixture::new();
        let output = fixture.profilectl(&["resolve", "/nonexistent/subscription.yaml"]);
        assert_eq!(output.status.code(), Some(5));
    }
}

mod add_command {
    use super::*;

    #[test]
    fn test_add_writes_installation() {
        let fixture = Fixture::new();
        let out = TempDir::new().unwrap();
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&[
            "add",
            "--name",
            "mySub",
            "--profile-repo-url",
            REPO_URL,
            "--profile-path",
            "profile",
            "--config-map",
            "values.yaml",
            "--out",
            out.path().to_str().unwrap(),
            "--local-root",
            root,
        ]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let install = out.path().join("profile");
        let subscription = std::fs::read_to_string(install.join("profile.yaml")).unwrap();
        assert!(subscription.contains("profileURL: https://github.com/org/repo-name"));
        assert!(subscription.contains("name: mySub-values"));
        assert!(subscription.contains("valuesKey: values.yaml"));

        let artifacts = install.join("artifacts");
        assert!(artifacts.join("mySub-repo-name-main/GitRepository.yaml").is_file());
        assert!(artifacts.join("mySub-nginx-overlay/Kustomization.yaml").is_file());

        let release = artifacts.join("mySub-nginx-nginx-server");
        assert!(release.join("HelmRelease.yaml").is_file());
        assert!(release.join("nginx/chart/Chart.yaml").is_file());
        assert!(release.join("nginx/chart/templates/deployment.yaml").is_file());
    }

    #[test]
    fn test_install_alias() {
        let fixture = Fixture::new();
        let out = TempDir::new().unwrap();
        let root = fixture.root().to_str().unwrap();

        let output = fixture.profilectl(&[
            "install",
            "--name",
            "mySub",
            "--profile-repo-url",
            REPO_URL,
            "--profile-path",
            "profile",
            "--out",
            out.path().to_str().unwrap(),
            "--local-root",
            root,
        ]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(out.path().join("profile/profile.yaml").is_file());
    }

    #[test]
    fn test_add_url_and_catalog_conflict() {
        let fixture = Fixture::new();
        let output = fixture.profilectl(&[
            "add",
            "--name",
            "mySub",
            "--profile-repo-url",
            REPO_URL,
            "nginx-catalog/weaveworks-nginx",
        ]);
        assert_eq!(output.status.code(), Some(64));
        assert!(stderr(&output).contains("url with a catalog entry"));
    }

    #[test]
    fn test_add_requires_name() {
        let fixture = Fixture::new();
        let output = fixture.profilectl(&["add", "--profile-repo-url", REPO_URL]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("--name"));
    }
}

mod catalog_commands {
    use super::*;

    #[test]
    fn test_show_without_catalog_url() {
        let fixture = Fixture::new();
        let output = fixture.profilectl(&["show", "nginx-catalog/weaveworks-nginx"]);
        assert_eq!(output.status.code(), Some(64));
        assert!(stderr(&output).contains("no catalog URL configured"));
    }

    #[test]
    fn test_show_rejects_bad_reference() {
        let fixture = Fixture::new();
        let output = fixture.profilectl(&[
            "--catalog-url",
            "http://localhost:1",
            "show",
            "weaveworks-nginx",
        ]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_search_unreachable_catalog() {
        let fixture = Fixture::new();
        let output = fixture.profilectl(&["--catalog-url", "http://127.0.0.1:1", "search", "nginx"]);
        assert_eq!(output.status.code(), Some(4));
    }
}
