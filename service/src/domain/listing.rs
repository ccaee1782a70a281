//! [`Listing`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Percent};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Fractional-sale listing of a [`Property`].
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// ID of the [`Property`] this [`Listing`] offers.
    pub property_id: property::Id,

    /// ID of the [`User`] who posted this [`Listing`].
    pub lister_id: user::Id,

    /// Asking price of this [`Listing`].
    pub asking_price: Money,

    /// Bonus [`Percent`] offered to early investors.
    pub bonus_percent: Percent,

    /// Current [`Status`] of this [`Listing`].
    pub status: Status,

    /// [`DateTime`] when this [`Listing`] was posted.
    pub posted_at: PostingDateTime,
}

/// ID of a [`Listing`].
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
    #[doc = "Status of a [`Listing`]."]
    enum Status {
        #[doc = "Open for investment."]
        Listed = 1,

        #[doc = "No longer open for investment."]
        Closed = 2,
    }
}

/// [`DateTime`] when a [`Listing`] was posted.
pub type PostingDateTime = DateTimeOf<(Listing, unit::Posting)>;
