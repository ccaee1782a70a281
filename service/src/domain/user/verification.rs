//! [`Verification`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Pending email verification of a [`User`].
///
/// Created on registration and deleted once the [`User`] follows the
/// emailed link (or once expired, by the purging task).
#[derive(Clone, Debug)]
pub struct Verification {
    /// ID of the [`User`] this [`Verification`] belongs to.
    pub user_id: user::Id,

    /// One-time [`Token`] to be presented by the [`User`].
    pub token: Token,

    /// [`DateTime`] when this [`Verification`] expires.
    pub expires_at: ExpirationDateTime,
}

/// One-time token of a [`Verification`].
#[derive(AsRef, Clone, Debug, Display, Eq, FromStr, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Token(String);

impl Token {
    /// Generates a new random [`Token`].
    #[must_use]
    pub fn generate() -> Self {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        Self(format!("{}{}", a.simple(), b.simple()))
    }
}

/// [`DateTime`] when a [`Verification`] expires.
pub type ExpirationDateTime = DateTimeOf<(Verification, unit::Expiration)>;
