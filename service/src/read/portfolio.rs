//! Portfolio read definitions.

use crate::domain::{self, Holding, ShareClass};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Position of a [`User`] in one [`ShareClass`]: the [`Holding`]
/// together with its [`Property`] and share structure.
#[derive(Clone, Debug)]
pub struct Position {
    /// The [`Holding`] itself.
    pub holding: Holding,

    /// [`domain::Property`] the shares belong to.
    pub property: domain::Property,

    /// [`ShareClass`] the [`Holding`] belongs to.
    pub share_class: ShareClass,
}
