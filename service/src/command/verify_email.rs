//! [`Command`] for verifying a [`User`]'s email.

use common::{
    operations::{By, Commit, Delete, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, verification, Verification},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for verifying a [`User`]'s email by a one-time
/// [`Verification`] token.
///
/// Marks the [`User`] as email-verified and consumes the token in one
/// transaction; an expired token is treated the same as a missing one.
#[derive(Clone, Debug, From)]
pub struct VerifyEmail {
    /// Presented [`verification::Token`].
    pub token: verification::Token,
}

impl<Db> Command<VerifyEmail> for Service<Db>
where
    Db: for<'t> Database<
            Select<By<Option<Verification>, &'t verification::Token>>,
            Ok = Option<Verification>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<User>, Ok = (), Err = Traced<database::Error>>
        + for<'t> Database<
            Delete<By<Verification, &'t verification::Token>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: VerifyEmail) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let VerifyEmail { token } = cmd;

        let verification = self
            .database()
            .execute(Select(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvalidToken)
            .map_err(tracerr::wrap!())?;
        if verification.expires_at < DateTime::now().coerce() {
            return Err(tracerr::new!(E::InvalidToken));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut user = tx
            .execute(Select(By::<Option<User>, _>::new(verification.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(verification.user_id))
            .map_err(tracerr::wrap!())?;
        user.email_verified = true;

        tx.execute(Update(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Delete(By::<Verification, _>::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`VerifyEmail`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Presented [`verification::Token`] is unknown or expired.
    #[display("Invalid or expired verification token")]
    InvalidToken,

    /// [`User`] the [`Verification`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
