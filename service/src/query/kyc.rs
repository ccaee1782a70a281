//! [`Query`] collection related to KYC.

use common::operations::By;

use crate::{
    domain::user::{self, KycProfile},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`KycProfile`] by its owning [`user::Id`].
pub type ProfileById = DatabaseQuery<By<Option<KycProfile>, user::Id>>;

/// Queries all pending [`read::kyc::Submission`]s, oldest first.
pub type PendingSubmissions =
    DatabaseQuery<By<Vec<read::kyc::Submission>, ()>>;
