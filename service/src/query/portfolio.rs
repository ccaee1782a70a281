//! [`Query`] collection related to [`Holding`] portfolios.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{domain::Holding, Query};

use super::DatabaseQuery;

/// Queries [`read::portfolio::Position`]s of a [`User`].
///
/// [`User`]: crate::domain::User
pub type OfUser = DatabaseQuery<By<Vec<read::portfolio::Position>, user::Id>>;
