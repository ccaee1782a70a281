//! Rental read definitions.

use crate::{
    domain::{self, RentalApplication},
    read,
};
#[cfg(doc)]
use crate::domain::{Property, User};

/// Pending [`RentalApplication`] together with its [`Property`] and the
/// applying tenant's contact, as exposed to administrators.
#[derive(Clone, Debug)]
pub struct PendingApplication {
    /// The [`RentalApplication`] itself.
    pub application: RentalApplication,

    /// [`domain::Property`] applied for.
    pub property: domain::Property,

    /// Contact of the applying tenant [`User`].
    pub tenant: read::user::Contact,
}
