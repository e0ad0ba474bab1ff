//! Artifact validation
//!
//! Turns each declared artifact into a [`Builder`], rejecting declarations
//! that do not set exactly one of `chart`, `path` or `profile`, that use an
//! unknown kind, or that lack a field their kind requires.

use std::collections::HashSet;

use profilectl_core::{ArtifactKind, ArtifactSpec, ProfileDefinition, ProfileRef, SourceRef};

use crate::builder::{
    Builder, LocalChartBuilder, NestedProfileBuilder, OverlayBuilder, RemoteChartBuilder,
    SourceReferenceBuilder,
};
use crate::error::{ResolveError, ValidationFailure};

/// Validate one artifact declaration
pub fn validate_artifact(spec: &ArtifactSpec) -> Result<Builder<'_>, ValidationFailure> {
    if spec.name.trim().is_empty() {
        return Err(ValidationFailure::EmptyName);
    }
    if spec.name.contains(['/', '\\']) || spec.name == ".." {
        return Err(ValidationFailure::InvalidName(spec.name.clone()));
    }

    let present: Vec<&'static str> = [
        ("chart", spec.chart.is_some()),
        ("path", spec.local_path().is_some()),
        ("profile", spec.profile.is_some()),
    ]
    .into_iter()
    .filter_map(|(field, set)| set.then_some(field))
    .collect();
    match present.len() {
        0 => return Err(ValidationFailure::NoSource),
        1 => {}
        _ => return Err(ValidationFailure::MultipleSources(present)),
    }

    let kind: ArtifactKind = spec.kind.parse().map_err(ValidationFailure::UnknownKind)?;
    let artifact = spec.name.as_str();

    let builder = match kind {
        ArtifactKind::GitRepository => {
            let reference = spec.profile.as_ref().ok_or(ValidationFailure::UnsupportedField {
                kind,
                field: present[0],
            })?;
            let source = require_source(kind, reference)?;
            Builder::SourceReference(SourceReferenceBuilder::new(artifact, source.repo_key()))
        }
        ArtifactKind::HelmChart => match (spec.local_path(), spec.chart.as_ref()) {
            (Some(path), _) => {
                check_path("path", path)?;
                Builder::LocalChart(LocalChartBuilder { artifact, path })
            }
            (None, Some(chart)) => {
                if chart.url.is_empty() {
                    return Err(ValidationFailure::MissingField {
                        kind,
                        field: "chart.url",
                    });
                }
                if chart.name.is_empty() {
                    return Err(ValidationFailure::MissingField {
                        kind,
                        field: "chart.name",
                    });
                }
                Builder::RemoteChart(RemoteChartBuilder { artifact, chart })
            }
            (None, None) => {
                return Err(ValidationFailure::UnsupportedField {
                    kind,
                    field: "profile",
                });
            }
        },
        ArtifactKind::Kustomize => match spec.local_path() {
            Some(path) => {
                check_path("path", path)?;
                Builder::Overlay(OverlayBuilder { artifact, path })
            }
            None => {
                return Err(ValidationFailure::UnsupportedField {
                    kind,
                    field: present[0],
                });
            }
        },
        ArtifactKind::Profile => {
            let reference = spec.profile.as_ref().ok_or(ValidationFailure::UnsupportedField {
                kind,
                field: present[0],
            })?;
            let target = require_source(kind, reference)?;
            Builder::NestedProfile(NestedProfileBuilder { artifact, target })
        }
    };
    Ok(builder)
}

/// Reject absolute paths and `..` segments
fn check_path(field: &'static str, path: &str) -> Result<(), ValidationFailure> {
    let escapes = path.starts_with('/')
        || path.starts_with('\\')
        || path.split(['/', '\\']).any(|segment| segment == "..");
    if escapes {
        return Err(ValidationFailure::InvalidPath {
            field,
            path: path.to_string(),
        });
    }
    Ok(())
}

fn require_source(kind: ArtifactKind, reference: &ProfileRef) -> Result<SourceRef, ValidationFailure> {
    if let Some(path) = reference.path.as_deref() {
        check_path("profile.path", path)?;
    }
    if reference.url.is_empty() {
        return Err(ValidationFailure::MissingField {
            kind,
            field: "profile.url",
        });
    }
    reference.source().ok_or(ValidationFailure::MissingField {
        kind,
        field: "profile.branch or profile.tag",
    })
}

/// Validate every artifact of a definition, in declared order
///
/// `profile` is the chain used to identify the definition in errors.
pub fn plan<'d>(definition: &'d ProfileDefinition, profile: &str) -> Result<Vec<Builder<'d>>, ResolveError> {
    let mut seen = HashSet::new();
    let mut builders = Vec::with_capacity(definition.artifacts().len());

    for spec in definition.artifacts() {
        let invalid = |reason| ResolveError::Validation {
            profile: profile.to_string(),
            artifact: spec.name.clone(),
            reason,
        };
        let builder = validate_artifact(spec).map_err(invalid)?;
        if !seen.insert(spec.name.as_str()) {
            return Err(invalid(ValidationFailure::DuplicateName(spec.name.clone())));
        }
        builders.push(builder);
    }
    Ok(builders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use profilectl_core::ChartRef;

    fn chart() -> ChartRef {
        ChartRef::new("https://charts.example.com", "nginx", "1.0.0")
    }

    fn nested() -> ProfileRef {
        ProfileRef::branch("https://github.com/org/nested", "main")
    }

    #[test]
    fn test_exactly_one_source_is_accepted() {
        let path = ArtifactSpec::new("a", ArtifactKind::HelmChart).with_path("chart");
        assert!(matches!(validate_artifact(&path), Ok(Builder::LocalChart(_))));

        let remote = ArtifactSpec::new("a", ArtifactKind::HelmChart).with_chart(chart());
        assert!(matches!(validate_artifact(&remote), Ok(Builder::RemoteChart(_))));

        let overlay = ArtifactSpec::new("a", ArtifactKind::Kustomize).with_path("deploy");
        assert!(matches!(validate_artifact(&overlay), Ok(Builder::Overlay(_))));

        let profile = ArtifactSpec::new("a", ArtifactKind::Profile).with_profile(nested());
        assert!(matches!(validate_artifact(&profile), Ok(Builder::NestedProfile(_))));

        let repo = ArtifactSpec::new("a", ArtifactKind::GitRepository).with_profile(nested());
        assert!(matches!(validate_artifact(&repo), Ok(Builder::SourceReference(_))));
    }

    #[test]
    fn test_multiple_sources_are_rejected() {
        let cases = [
            (
                ArtifactSpec::new("a", ArtifactKind::HelmChart)
                    .with_path("chart")
                    .with_chart(chart()),
                "expected exactly one, got both: chart, path",
            ),
            (
                ArtifactSpec::new("a", ArtifactKind::HelmChart)
                    .with_path("chart")
                    .with_profile(nested()),
                "expected exactly one, got both: path, profile",
            ),
            (
                ArtifactSpec::new("a", ArtifactKind::HelmChart)
                    .with_chart(chart())
                    .with_profile(nested()),
                "expected exactly one, got both: chart, profile",
            ),
        ];
        for (spec, message) in cases {
            assert_eq!(validate_artifact(&spec).unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn test_paths_must_stay_inside_the_repository() {
        let cases = [
            ArtifactSpec::new("a", ArtifactKind::HelmChart).with_path("../../../../etc/evil"),
            ArtifactSpec::new("a", ArtifactKind::HelmChart).with_path("chart/../../x"),
            ArtifactSpec::new("a", ArtifactKind::Kustomize).with_path("/etc"),
            ArtifactSpec::new("a", ArtifactKind::Profile).with_profile(nested().with_path("../up")),
        ];
        for spec in cases {
            assert!(matches!(
                validate_artifact(&spec),
                Err(ValidationFailure::InvalidPath { .. })
            ));
        }

        let dotted = ArtifactSpec::new("a", ArtifactKind::HelmChart).with_path("./chart..v2/x");
        assert!(matches!(validate_artifact(&dotted), Ok(Builder::LocalChart(_))));
    }

    #[test]
    fn test_name_must_not_contain_separator() {
        let spec = ArtifactSpec::new("../../escape", ArtifactKind::HelmChart).with_path("chart");
        assert_eq!(
            validate_artifact(&spec).unwrap_err(),
            ValidationFailure::InvalidName("../../escape".to_string())
        );
    }

    #[test]
    fn test_no_source_is_rejected() {
        let spec = ArtifactSpec::new("a", ArtifactKind::HelmChart).with_path("");
        assert_eq!(validate_artifact(&spec).unwrap_err(), ValidationFailure::NoSource);
    }

    #[test]
    fn test_unknown_kind() {
        let mut spec = ArtifactSpec::new("a", ArtifactKind::Profile).with_profile(nested());
        spec.kind = "SomeUnknownKind".to_string();
        assert_eq!(
            validate_artifact(&spec).unwrap_err().to_string(),
            "artifact kind \"SomeUnknownKind\" not recognized"
        );
    }

    #[test]
    fn test_field_not_allowed_for_kind() {
        let spec = ArtifactSpec::new("a", ArtifactKind::Kustomize).with_chart(chart());
        assert_eq!(
            validate_artifact(&spec).unwrap_err(),
            ValidationFailure::UnsupportedField {
                kind: ArtifactKind::Kustomize,
                field: "chart",
            }
        );

        let spec = ArtifactSpec::new("a", ArtifactKind::Profile).with_path("x");
        assert!(matches!(
            validate_artifact(&spec),
            Err(ValidationFailure::UnsupportedField { .. })
        ));

        let spec = ArtifactSpec::new("a", ArtifactKind::HelmChart).with_profile(nested());
        assert!(matches!(
            validate_artifact(&spec),
            Err(ValidationFailure::UnsupportedField { field: "profile", .. })
        ));
    }

    #[test]
    fn test_incomplete_references() {
        let spec = ArtifactSpec::new("a", ArtifactKind::Profile)
            .with_profile(ProfileRef {
                url: "https://github.com/org/nested".to_string(),
                ..Default::default()
            });
        assert_eq!(
            validate_artifact(&spec).unwrap_err().to_string(),
            "Profile artifact requires profile.branch or profile.tag"
        );

        let spec = ArtifactSpec::new("a", ArtifactKind::HelmChart).with_chart(ChartRef {
            name: "nginx".to_string(),
            ..Default::default()
        });
        assert_eq!(
            validate_artifact(&spec).unwrap_err(),
            ValidationFailure::MissingField {
                kind: ArtifactKind::HelmChart,
                field: "chart.url",
            }
        );
    }

    #[test]
    fn test_plan_rejects_duplicate_names() {
        let definition = ProfileDefinition::new(
            "profileName",
            vec![
                ArtifactSpec::new("dup", ArtifactKind::HelmChart).with_path("a"),
                ArtifactSpec::new("dup", ArtifactKind::Kustomize).with_path("b"),
            ],
        );
        let err = plan(&definition, "profileName").unwrap_err();
        assert_eq!(err.artifact(), Some("dup"));
        assert!(matches!(
            err,
            ResolveError::Validation {
                reason: ValidationFailure::DuplicateName(_),
                ..
            }
        ));
    }

    #[test]
    fn test_plan_names_offending_artifact() {
        let definition = ProfileDefinition::new(
            "profileName",
            vec![
                ArtifactSpec::new("ok", ArtifactKind::HelmChart).with_path("a"),
                ArtifactSpec::new("bad", ArtifactKind::HelmChart),
            ],
        );
        let err = plan(&definition, "root/profileName").unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed for artifact bad: expected exactly one of chart, path, profile, got none (profile root/profileName)"
        );
    }
}
