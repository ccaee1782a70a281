//! KYC read definitions.

use crate::{domain::user::KycProfile, read};
#[cfg(doc)]
use crate::domain::User;

/// Pending [`KycProfile`] together with the submitting [`User`]'s
/// contact, as exposed to administrators.
#[derive(Clone, Debug)]
pub struct Submission {
    /// The [`KycProfile`] itself.
    pub profile: KycProfile,

    /// Contact of the submitting [`User`].
    pub user: read::user::Contact,
}
