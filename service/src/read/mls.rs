//! [`MlsListing`]-related read definitions.

use crate::domain::mls;
#[cfg(doc)]
use crate::domain::MlsListing;

/// Selector of an [`MlsListing`] list.
#[derive(Clone, Debug)]
pub struct Selector {
    /// [`mls::SourceType`] to filter by.
    pub source: mls::SourceType,

    /// Search term to fuzzy match against address, city and ZIP code.
    pub term: Option<String>,

    /// Maximum number of rows to return.
    pub limit: u8,
}

/// Key of a single [`MlsListing`] lookup.
#[derive(Clone, Debug)]
pub struct ExternalRef {
    /// [`mls::SourceType`] the listing belongs to.
    pub source: mls::SourceType,

    /// [`mls::ExternalId`] of the listing.
    pub external_id: mls::ExternalId,
}
