//! [`Query`] collection related to [`MlsListing`]s.

use common::operations::By;

use crate::{domain::MlsListing, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`MlsListing`]s by the provided [`read::mls::Selector`],
/// newest first.
pub type Search = DatabaseQuery<By<Vec<MlsListing>, read::mls::Selector>>;

/// Queries a single [`MlsListing`] by its [`read::mls::ExternalRef`].
pub type ByExternalRef =
    DatabaseQuery<By<Option<MlsListing>, read::mls::ExternalRef>>;
