//! [`Property`]-related read definitions.

use crate::{
    domain::{self, property, PropertyImage, ShareClass},
    read,
};
#[cfg(doc)]
use crate::domain::{Listing, Property};

/// [`Property`] together with its [`Listing`]s, images and
/// [`ShareClass`], as exposed by the public catalogue.
#[derive(Clone, Debug)]
pub struct Summary {
    /// The [`domain::Property`] itself.
    pub property: domain::Property,

    /// [`Listing`]s of the [`Property`] with their listers.
    pub listings: Vec<read::listing::WithLister>,

    /// Images of the [`Property`].
    pub images: Vec<PropertyImage>,

    /// [`ShareClass`] of the [`Property`].
    pub share_class: Option<ShareClass>,
}

/// Selector of a [`Summary`] list.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selector {
    /// [`property::Status`] to filter by, if any.
    pub status: Option<property::Status>,
}
