//! [`Command`] for registering a new [`User`].

use std::time::Duration;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Password, Phone};
use crate::{
    domain::{
        user::{self, kyc, verification, KycProfile, Verification},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`User`].
///
/// Creates the [`User`], its [`KycProfile`] in pending state, and a
/// [`Verification`] the [`User`] must follow to activate the account,
/// all in one transaction.
#[derive(Clone, Debug)]
pub struct RegisterUser {
    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Phone`] of a new [`User`].
    pub phone: Option<user::Phone>,

    /// [`user::Role`] of a new [`User`].
    pub role: user::Role,
}

impl RegisterUser {
    /// [`Duration`] of the created [`Verification`] expiration.
    const VERIFICATION_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
}

/// Output of [`RegisterUser`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Registered [`User`].
    pub user: User,

    /// [`Verification`] the [`User`] must pass to activate the account.
    pub verification: Verification,
}

impl<Db> Command<RegisterUser> for Service<Db>
where
    Db: for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Insert<KycProfile>, Err = Traced<database::Error>>
        + Database<Insert<Verification>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RegisterUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterUser {
            email,
            password,
            phone,
            role,
        } = cmd;

        let u = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let user = User {
            id: user::Id::new(),
            email,
            phone,
            password_hash: user::PasswordHash::new(password.expose_secret()),
            role,
            email_verified: false,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Err(e) = tx.execute(Insert(user.clone())).await {
            // The pre-check above races with concurrent registrations;
            // the unique index is the authoritative check.
            return Err(
                if e.as_ref().is_unique_violation(Some("users_email_key")) {
                    tracerr::new!(E::EmailOccupied(user.email))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                },
            );
        }
        tx.execute(Insert(KycProfile {
            user_id: user.id,
            status: kyc::Status::Pending,
            data: serde_json::Value::Object(serde_json::Map::new()),
            submitted_at: DateTime::now().coerce(),
        }))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        let verification = Verification {
            user_id: user.id,
            token: verification::Token::generate(),
            expires_at: (DateTime::now()
                + RegisterUser::VERIFICATION_DURATION)
                .coerce(),
        };
        tx.execute(Insert(verification.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { user, verification })
    }
}

/// Error of [`RegisterUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`user::Email`] is already occupied.
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] user::Email),
}
