//! [`ShareClass`] and [`Holding`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Fractional-ownership share structure of a single [`Property`].
///
/// `total_shares` is fixed at creation and conserved forever after:
/// every share is either in the unissued pool (`shares_available`) or
/// owned through a [`Holding`].
#[derive(Clone, Debug)]
pub struct ShareClass {
    /// ID of this [`ShareClass`].
    pub id: Id,

    /// ID of the [`Property`] this [`ShareClass`] belongs to.
    pub property_id: property::Id,

    /// Total number of shares issued for the [`Property`].
    pub total_shares: Count,

    /// Number of shares remaining in the unissued pool.
    pub shares_available: Count,

    /// Reference price per share.
    pub reference_price_per_share: Money,
}

/// ID of a [`ShareClass`].
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

/// Number of shares.
pub type Count = u32;

/// Share balance of a [`User`] within a [`ShareClass`].
///
/// At most one [`Holding`] exists per ([`User`], [`ShareClass`]) pair.
#[derive(Clone, Debug)]
pub struct Holding {
    /// ID of this [`Holding`].
    pub id: HoldingId,

    /// ID of the [`User`] owning this [`Holding`].
    pub user_id: user::Id,

    /// ID of the [`ShareClass`] this [`Holding`] belongs to.
    pub share_class_id: Id,

    /// Number of shares currently owned.
    pub shares_owned: Count,

    /// [`DateTime`] when this [`Holding`] was last modified.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Holding`].
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
pub struct HoldingId(Uuid);

impl HoldingId {
    /// Creates a new random [`HoldingId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Owner key of a [`Holding`]: the ([`User`], [`ShareClass`]) pair.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Owner {
    /// ID of the [`User`] owning the [`Holding`].
    pub user_id: user::Id,

    /// ID of the [`ShareClass`] the [`Holding`] belongs to.
    pub share_class_id: Id,
}

/// Conditional withdrawal of shares from the unissued pool of a
/// [`ShareClass`].
///
/// Applies only if `shares_available >= shares` still holds at execution
/// time; whether any row was affected is the sole success signal.
#[derive(Clone, Copy, Debug)]
pub struct PoolWithdrawal {
    /// ID of the [`ShareClass`] to withdraw from.
    pub share_class_id: Id,

    /// Number of shares to withdraw.
    pub shares: Count,
}

/// Conditional withdrawal of shares from a [`Holding`].
///
/// Applies only if `shares_owned >= shares` still holds at execution
/// time; whether any row was affected is the sole success signal.
#[derive(Clone, Copy, Debug)]
pub struct HoldingWithdrawal {
    /// [`Owner`] of the [`Holding`] to withdraw from.
    pub owner: Owner,

    /// Number of shares to withdraw.
    pub shares: Count,
}

/// Deposit of shares into a [`Holding`], creating it if absent.
#[derive(Clone, Copy, Debug)]
pub struct HoldingDeposit {
    /// [`Owner`] of the [`Holding`] to deposit into.
    pub owner: Owner,

    /// Number of shares to deposit.
    pub shares: Count,
}

/// [`DateTime`] when a [`Holding`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Holding, unit::Modification)>;
