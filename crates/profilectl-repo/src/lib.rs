//! profilectl Profile Sources
//!
//! This crate provides the outside world the resolver depends on:
//!
//! - **Git fetcher**: reads profile definitions from shallow sparse clones
//! - **Local fetcher**: reads them from a directory mirror, for offline use
//! - **Checkouts**: working trees used to copy local charts into an installation
//! - **Catalog client**: searches and describes profiles published in a catalog
//! - **Settings**: the user configuration file
//!
//! ## Example
//!
//! ```rust,no_run
//! use profilectl_core::ProfileSubscription;
//! use profilectl_engine::ArtifactResolver;
//! use profilectl_repo::GitFetcher;
//!
//! # fn example(subscription: &ProfileSubscription) -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ArtifactResolver::new(GitFetcher::default());
//! let artifacts = resolver.resolve(subscription)?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod git;

// Re-exports for convenience
pub use catalog::{CatalogClient, CatalogRef, ProfileDescription};
pub use config::Settings;
pub use error::{RepoError, Result};
pub use fetch::{GitFetcher, LocalFetcher};
pub use git::{Checkout, GitCommand, RepositoryCheckout, sparse_clone};
