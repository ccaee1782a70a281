//! [`Query`] collection related to [`Property`] lists.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries [`read::property::Summary`] list by the provided
/// [`read::property::Selector`], newest first.
pub type List = DatabaseQuery<
    By<Vec<read::property::Summary>, read::property::Selector>,
>;
