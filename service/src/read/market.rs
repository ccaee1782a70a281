//! Marketplace read definitions.

use crate::{
    domain::{self, SellOrder},
    read,
};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Open [`SellOrder`] together with its [`Property`] and the seller's
/// contact, as exposed by the public marketplace.
#[derive(Clone, Debug)]
pub struct OpenOrder {
    /// The [`SellOrder`] itself.
    pub order: SellOrder,

    /// [`domain::Property`] whose shares are sold.
    pub property: domain::Property,

    /// Contact of the selling [`User`].
    pub seller: read::user::Contact,
}
