//! [`Query`] collection related to a single [`Property`].

use common::operations::By;

use crate::{domain::property, read};
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries a [`read::property::Summary`] by its [`property::Id`].
pub type ById =
    DatabaseQuery<By<Option<read::property::Summary>, property::Id>>;
