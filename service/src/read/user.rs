//! [`User`]-related read definitions.

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Public contact card of a [`User`], embedded into listings, orders and
/// administrator views.
#[derive(Clone, Debug)]
pub struct Contact {
    /// ID of the [`User`].
    pub id: user::Id,

    /// [`user::Email`] of the [`User`].
    pub email: user::Email,

    /// [`user::Phone`] of the [`User`].
    pub phone: Option<user::Phone>,

    /// [`user::Role`] of the [`User`].
    pub role: user::Role,
}
