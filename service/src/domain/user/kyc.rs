//! [`KycProfile`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// KYC ("know your customer") profile of a [`User`].
///
/// Investment and listing actions are gated on the profile being
/// [`Status::Approved`].
#[derive(Clone, Debug)]
pub struct KycProfile {
    /// ID of the [`User`] this [`KycProfile`] belongs to.
    pub user_id: user::Id,

    /// Current [`Status`] of this [`KycProfile`].
    pub status: Status,

    /// Free-form data submitted for verification.
    pub data: serde_json::Value,

    /// [`DateTime`] when this [`KycProfile`] was last submitted.
    pub submitted_at: SubmissionDateTime,
}

define_kind! {
    #[doc = "Status of a [`KycProfile`]."]
    enum Status {
        #[doc = "Submitted and awaiting an administrator decision."]
        Pending = 1,

        #[doc = "Approved by an administrator."]
        Approved = 2,

        #[doc = "Rejected by an administrator."]
        Rejected = 3,
    }
}

/// [`DateTime`] when a [`KycProfile`] was submitted.
pub type SubmissionDateTime = DateTimeOf<(KycProfile, unit::Submission)>;
