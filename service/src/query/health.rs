//! Health-probe [`Query`].

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Probes the database connectivity.
pub type Probe = DatabaseQuery<By<read::Health, ()>>;
