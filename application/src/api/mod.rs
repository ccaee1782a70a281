//! REST API definitions.

pub mod admin;
pub mod auth;
pub mod import;
pub mod invest;
pub mod kyc;
pub mod listing;
pub mod market;
pub mod property;
pub mod rental;

use std::{fmt, str::FromStr};

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use service::{
    domain::user,
    query::{self, Query as _},
    read,
};

use crate::{AsError, Context, Error};

/// Assembles the [`Router`] of the whole API surface.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(admin::router())
        .merge(auth::router())
        .merge(import::router())
        .merge(invest::router())
        .merge(kyc::router())
        .merge(listing::router())
        .merge(market::router())
        .merge(property::router())
        .merge(rental::router())
}

/// Greets whoever hits the API root.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
async fn index() -> &'static str {
    "Brickly Fractional Property API"
}

/// Health-probe response.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct HealthResponse {
    /// Whether the API itself is up.
    pub ok: bool,

    /// Whether the database answers probes.
    pub db: bool,
}

/// Probes the API and its database.
async fn health(context: Context) -> Result<Json<HealthResponse>, Error> {
    let read::Health(db) = context
        .service()
        .execute(query::health::Probe::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(HealthResponse { ok: true, db }))
}

/// JSON-decoded request body.
///
/// Unlike the plain [`Json`] extractor, a malformed body is reported in
/// the API's own error shape with a `VALIDATION_ERROR` code.
#[derive(Clone, Copy, Debug)]
pub struct Input<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Input<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|e| Error::validation(&e))
    }
}

/// Parses the provided `input` string into a `T`, reporting a
/// `VALIDATION_ERROR` naming the `what` field on failure.
pub(crate) fn parse<T>(input: &str, what: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    input
        .parse()
        .map_err(|e| Error::validation(&format!("invalid `{what}`: {e}")))
}

/// Parses the provided optional `input` string into an `Option<T>`.
pub(crate) fn parse_opt<T>(
    input: Option<String>,
    what: &str,
) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    input.as_deref().map(|s| parse(s, what)).transpose()
}

/// Public contact of a [`User`] embedded into API responses.
///
/// [`User`]: service::domain::User
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// ID of the [`User`].
    ///
    /// [`User`]: service::domain::User
    pub id: user::Id,

    /// Email address of the [`User`].
    ///
    /// [`User`]: service::domain::User
    pub email: String,

    /// Phone number of the [`User`].
    ///
    /// [`User`]: service::domain::User
    pub phone: Option<String>,

    /// Role of the [`User`].
    ///
    /// [`User`]: service::domain::User
    pub role: user::Role,
}

impl From<read::user::Contact> for Contact {
    fn from(contact: read::user::Contact) -> Self {
        Self {
            id: contact.id,
            email: contact.email.to_string(),
            phone: contact.phone.map(|p| p.to_string()),
            role: contact.role,
        }
    }
}
