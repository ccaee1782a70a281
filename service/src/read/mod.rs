//! Read entities definitions.

pub mod kyc;
pub mod listing;
pub mod market;
pub mod mls;
pub mod portfolio;
pub mod property;
pub mod rental;
pub mod user;

use derive_more::Deref;

#[cfg(doc)]
use crate::infra::Database;

/// Indicator whether the [`Database`] answers probes.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Health(pub bool);
