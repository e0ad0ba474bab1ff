//! CLI commands

pub mod add;
pub mod resolve;
pub mod search;
pub mod show;

use profilectl_repo::{CatalogClient, Settings};

use crate::error::{CliError, Result};

/// Output format for commands that print data
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

/// Catalog client for `--catalog-url`, falling back to the config file
pub fn catalog_client(flag: Option<&str>, settings: &Settings) -> Result<CatalogClient> {
    let url = flag
        .or(settings.catalog_url.as_deref())
        .ok_or_else(|| {
            CliError::usage(
                "no catalog URL configured",
                "pass --catalog-url, set PROFILECTL_CATALOG_URL or add catalogUrl to the config file",
            )
        })?;
    Ok(CatalogClient::new(url)?)
}

/// Runtime for the async catalog calls of one command
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| CliError::internal(e.to_string()))
}
