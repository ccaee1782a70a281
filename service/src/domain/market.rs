//! [`SellOrder`] and [`Trade`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, share, user};
#[cfg(doc)]
use crate::domain::{Holding, Property, User};

/// Standing offer of a [`User`] to sell a quantity of shares of a
/// [`Property`] at a fixed price.
///
/// Shares are not reserved when the order is created: the seller's
/// [`Holding`] is re-checked at fill time instead.
#[derive(Clone, Debug)]
pub struct SellOrder {
    /// ID of this [`SellOrder`].
    pub id: Id,

    /// ID of the [`User`] selling the shares.
    pub user_id: user::Id,

    /// ID of the [`Property`] whose shares are sold.
    pub property_id: property::Id,

    /// Number of shares remaining for sale.
    pub shares_for_sale: share::Count,

    /// Asking price per share.
    pub ask_price_per_share: Money,

    /// Current [`Status`] of this [`SellOrder`].
    pub status: Status,

    /// [`DateTime`] when this [`SellOrder`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`SellOrder`].
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
    #[doc = "Status of a [`SellOrder`]."]
    enum Status {
        #[doc = "Open, fully or partially unfilled."]
        Open = 1,

        #[doc = "Completely filled."]
        Filled = 2,
    }
}

/// Conditional fill of a [`SellOrder`].
///
/// Decrements the remaining `shares_for_sale` only if the order is still
/// [`Status::Open`] and has at least `shares` remaining, transitioning it
/// to [`Status::Filled`] in the same step once the remainder hits zero.
/// The updated order is returned, or nothing if the condition failed.
#[derive(Clone, Copy, Debug)]
pub struct OrderFill {
    /// ID of the [`SellOrder`] to fill.
    pub order_id: Id,

    /// Number of shares to fill.
    pub shares: share::Count,
}

/// Immutable record of one executed transfer of shares between a seller
/// and a buyer via a [`SellOrder`].
///
/// Never modified after creation.
#[derive(Clone, Debug)]
pub struct Trade {
    /// ID of this [`Trade`].
    pub id: TradeId,

    /// ID of the [`SellOrder`] this [`Trade`] was executed against.
    pub sell_order_id: Id,

    /// ID of the [`Property`] whose shares were traded.
    pub property_id: property::Id,

    /// ID of the buying [`User`].
    pub buyer_id: user::Id,

    /// ID of the selling [`User`].
    pub seller_id: user::Id,

    /// Number of shares traded.
    pub shares_traded: share::Count,

    /// Price per share the [`Trade`] was executed at.
    pub price_per_share: Money,

    /// [`DateTime`] when this [`Trade`] was executed.
    pub executed_at: ExecutionDateTime,
}

/// ID of a [`Trade`].
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
pub struct TradeId(Uuid);

impl TradeId {
    /// Creates a new random [`TradeId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when a [`SellOrder`] was created.
pub type CreationDateTime = DateTimeOf<(SellOrder, unit::Creation)>;

/// [`DateTime`] when a [`Trade`] was executed.
pub type ExecutionDateTime = DateTimeOf<(Trade, unit::Execution)>;
