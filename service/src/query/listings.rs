//! [`Query`] collection related to [`Listing`]s.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{domain::Listing, Query};

use super::DatabaseQuery;

/// Queries [`read::listing::Owned`] list of a lister [`User`], newest
/// first.
///
/// [`User`]: crate::domain::User
pub type OwnedBy = DatabaseQuery<By<Vec<read::listing::Owned>, user::Id>>;
