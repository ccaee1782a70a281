//! [`Command`] for submitting a [`KycProfile`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::user::{self, kyc, KycProfile},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for submitting KYC data.
///
/// Upserts the [`User`]'s [`KycProfile`] back into pending state with the
/// submitted data, so a rejected [`User`] may re-apply.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct SubmitKyc {
    /// ID of the submitting [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// Free-form data submitted for verification.
    pub data: serde_json::Value,
}

impl<Db> Command<SubmitKyc> for Service<Db>
where
    Db: Database<
        Insert<KycProfile>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = KycProfile;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SubmitKyc) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitKyc { user_id, data } = cmd;

        let profile = KycProfile {
            user_id,
            status: kyc::Status::Pending,
            data,
            submitted_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(profile.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(profile)
    }
}

/// Error of [`SubmitKyc`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
