//! Profile catalog client
//!
//! A catalog is an HTTP service indexing published profiles:
//! - `GET /profiles?name=<query>` lists matching profiles
//! - `GET /profiles/<catalog>/<profile>[/<version>]` describes one profile

use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RepoError, Result};

/// A profile as published in a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDescription {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub catalog: String,

    /// Repository holding the profile
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub maintainer: String,

    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl ProfileDescription {
    /// Tag the profile is published under: `<name>/<version>`
    pub fn release_tag(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// `<CATALOG>/<PROFILE>[/<VERSION>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRef {
    pub catalog: String,
    pub profile: String,
    pub version: Option<String>,
}

impl FromStr for CatalogRef {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RepoError::InvalidCatalogReference {
            reference: s.to_string(),
        };
        let parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [catalog, profile] => Ok(Self {
                catalog: catalog.to_string(),
                profile: profile.to_string(),
                version: None,
            }),
            [catalog, profile, version] => Ok(Self {
                catalog: catalog.to_string(),
                profile: profile.to_string(),
                version: Some(version.to_string()),
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for CatalogRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.catalog, self.profile)?;
        if let Some(version) = &self.version {
            write!(f, "/{}", version)?;
        }
        Ok(())
    }
}

/// HTTP client for a profile catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base: Url,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| RepoError::InvalidCatalogUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(RepoError::InvalidCatalogUrl {
                url: base_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("profilectl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RepoError::InvalidCatalogUrl {
                url: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Profiles whose name matches `name`
    pub async fn search(&self, name: &str) -> Result<Vec<ProfileDescription>> {
        let mut url = self.endpoint(&["profiles"])?;
        url.query_pairs_mut().append_pair("name", name);
        tracing::debug!(url = %url, "Searching catalog");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: "failed to fetch profiles from catalog".to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Describe one profile, at `version` or the latest one
    pub async fn show(
        &self,
        catalog: &str,
        profile: &str,
        version: Option<&str>,
    ) -> Result<ProfileDescription> {
        let mut segments = vec!["profiles", catalog, profile];
        if let Some(version) = version {
            segments.push(version);
        }
        let url = self.endpoint(&segments)?;
        tracing::debug!(url = %url, "Fetching catalog profile");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(RepoError::ProfileNotFound {
                catalog: catalog.to_string(),
                profile: profile.to_string(),
                version: version.unwrap_or_default().to_string(),
            }),
            status => Err(RepoError::HttpError {
                status: status.as_u16(),
                message: format!("failed to fetch profile {:?} from catalog", profile),
            }),
        }
    }

    pub async fn show_ref(&self, reference: &CatalogRef) -> Result<ProfileDescription> {
        self.show(
            &reference.catalog,
            &reference.profile,
            reference.version.as_deref(),
        )
        .await
    }
}
