//! [`Command`] for deciding on a [`KycProfile`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::user::{self, kyc, KycProfile},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for an administrator decision on a [`KycProfile`].
#[derive(Clone, Copy, Debug)]
pub struct DecideKyc {
    /// ID of the [`User`] whose [`KycProfile`] is decided.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// [`Decision`] to apply.
    pub decision: Decision,
}

/// Administrator decision on a [`KycProfile`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Approve the [`KycProfile`].
    Approve,

    /// Reject the [`KycProfile`].
    Reject,
}

impl<Db> Command<DecideKyc> for Service<Db>
where
    Db: Database<
            Select<By<Option<KycProfile>, user::Id>>,
            Ok = Option<KycProfile>,
            Err = Traced<database::Error>,
        > + Database<Update<KycProfile>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = KycProfile;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DecideKyc) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DecideKyc { user_id, decision } = cmd;

        let mut profile = self
            .database()
            .execute(Select(By::<Option<KycProfile>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileNotExists(user_id))
            .map_err(tracerr::wrap!())?;

        profile.status = match decision {
            Decision::Approve => kyc::Status::Approved,
            Decision::Reject => kyc::Status::Rejected,
        };
        self.database()
            .execute(Update(profile.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(profile)
    }
}

/// Error of [`DecideKyc`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`KycProfile`] of the [`User`] with the provided ID does not
    /// exist.
    ///
    /// [`User`]: crate::domain::User
    #[display("`KycProfile` of `User(id: {_0})` does not exist")]
    ProfileNotExists(#[error(not(source))] user::Id),
}
