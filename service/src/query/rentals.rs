//! [`Query`] collection related to [`RentalApplication`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::RentalApplication, Query};

use super::DatabaseQuery;

/// Queries all pending [`read::rental::PendingApplication`]s, oldest
/// first.
pub type PendingApplications =
    DatabaseQuery<By<Vec<read::rental::PendingApplication>, ()>>;
