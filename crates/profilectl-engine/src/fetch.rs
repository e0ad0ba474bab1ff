//! Definition fetching seam

use profilectl_core::{ProfileDefinition, SourceRef};

use crate::error::FetchError;

/// Retrieves the profile definition at a repository, ref and path
///
/// Any `Fn(&SourceRef) -> Result<ProfileDefinition, FetchError>` closure is a
/// fetcher, which is how tests supply definition trees.
pub trait DefinitionFetcher {
    fn fetch(&self, source: &SourceRef) -> Result<ProfileDefinition, FetchError>;
}

impl<F> DefinitionFetcher for F
where
    F: Fn(&SourceRef) -> Result<ProfileDefinition, FetchError>,
{
    fn fetch(&self, source: &SourceRef) -> Result<ProfileDefinition, FetchError> {
        self(source)
    }
}
