//! [`Query`] collection related to [`SellOrder`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::SellOrder, Query};

use super::DatabaseQuery;

/// Queries all open [`read::market::OpenOrder`]s, newest first.
pub type OpenOrders = DatabaseQuery<By<Vec<read::market::OpenOrder>, ()>>;
