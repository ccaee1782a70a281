//! [`RentalApplication`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Application of a tenant [`User`] to rent a [`Property`].
#[derive(Clone, Debug)]
pub struct RentalApplication {
    /// ID of this [`RentalApplication`].
    pub id: Id,

    /// ID of the [`Property`] applied for.
    pub property_id: property::Id,

    /// ID of the applying tenant [`User`].
    pub tenant_id: user::Id,

    /// Current [`Status`] of this [`RentalApplication`].
    pub status: Status,

    /// Monthly rent approved by an administrator, if any.
    pub rent_amount: Option<Money>,

    /// [`DateTime`] when this [`RentalApplication`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`RentalApplication`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`RentalApplication`]."]
    enum Status {
        #[doc = "Awaiting an administrator decision."]
        Pending = 1,

        #[doc = "Approved by an administrator."]
        Approved = 2,

        #[doc = "Rejected by an administrator."]
        Rejected = 3,
    }
}

/// Key of a duplicate-[`RentalApplication`] lookup: an active
/// (pending or approved) application of the same tenant for the same
/// [`Property`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Duplicate {
    /// ID of the [`Property`] applied for.
    pub property_id: property::Id,

    /// ID of the applying tenant [`User`].
    pub tenant_id: user::Id,
}

/// [`DateTime`] when a [`RentalApplication`] was created.
pub type CreationDateTime = DateTimeOf<(RentalApplication, unit::Creation)>;
