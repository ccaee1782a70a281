//! [`Listing`]-related read definitions.

use crate::{
    domain::{self, PropertyImage, ShareClass},
    read,
};
#[cfg(doc)]
use crate::domain::{Listing, User};

/// [`Listing`] together with the [`read::user::Contact`] of its lister.
#[derive(Clone, Debug)]
pub struct WithLister {
    /// The [`Listing`] itself.
    pub listing: domain::Listing,

    /// Contact of the [`User`] who posted the [`Listing`].
    pub lister: read::user::Contact,
}

/// [`Listing`] of a lister [`User`] together with its property details.
#[derive(Clone, Debug)]
pub struct Owned {
    /// The [`Listing`] itself.
    pub listing: domain::Listing,

    /// [`domain::Property`] the [`Listing`] offers.
    pub property: domain::Property,

    /// Images of the [`domain::Property`].
    pub images: Vec<PropertyImage>,

    /// [`ShareClass`] of the [`domain::Property`].
    pub share_class: Option<ShareClass>,
}
