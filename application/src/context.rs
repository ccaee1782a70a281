//! [`Context`]-related definitions.

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::DateTime;
use service::{
    command::{self, Command as _},
    domain::user::{self, kyc, session},
    query::{self, Query as _},
};
use tokio::sync::OnceCell;

use crate::{define_error, AsError, Error, Service};

/// Application context of a single HTTP request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// Current [`Session`].
    current_session: OnceCell<Session>,

    /// Last authentication [`Error`].
    auth_error: OnceCell<Error>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Tries to get the current [`Session`] for this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if the provided authentication token is invalid.
    pub async fn try_current_session(&self) -> Result<Option<Session>, Error> {
        self.current_session().await.map(Some).or_else(|e| {
            if e.code == Error::from(AuthError::AuthorizationRequired).code {
                Ok(None)
            } else {
                Err(e)
            }
        })
    }

    /// Returns the current [`Session`] for this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request is not authorized;
    /// - the provided authentication token is invalid.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.current_session
            .get_or_try_init(|| async {
                match self
                    .auth_error
                    .get_or_try_init(|| async {
                        match self.do_authentication().await {
                            Ok(u) => Err(u),
                            Err(e) => Ok(e),
                        }
                    })
                    .await
                {
                    Ok(e) => Err(e),
                    Err(u) => Ok(u),
                }
            })
            .await
            .cloned()
            .map_err(Clone::clone)
    }

    /// Returns the current [`Session`], requiring one of the provided
    /// [`user::Role`]s.
    ///
    /// # Errors
    ///
    /// Errors if the current HTTP request is not authorized, or the
    /// authorized [`User`]'s role is not one of the provided `roles`.
    ///
    /// [`User`]: service::domain::User
    pub async fn authorize(
        &self,
        roles: &[user::Role],
    ) -> Result<Session, Error> {
        let session = self.current_session().await?;
        if !roles.contains(&session.role) {
            return Err(AuthError::Forbidden.into());
        }
        Ok(session)
    }

    /// Checks that the [`User`] of the current [`Session`] passed KYC.
    ///
    /// # Errors
    ///
    /// Errors if the [`User`]'s KYC profile is absent or not approved.
    ///
    /// [`User`]: service::domain::User
    pub async fn require_kyc_approved(
        &self,
        session: &Session,
    ) -> Result<(), Error> {
        let profile = self
            .service
            .execute(query::kyc::ProfileById::by(session.user_id))
            .await
            .map_err(AsError::into_error)?;
        if profile.map_or(true, |p| p.status != kyc::Status::Approved) {
            return Err(AuthError::KycNotApproved.into());
        }
        Ok(())
    }

    /// Performs the [`Session`] authentication.
    ///
    /// # Errors
    ///
    /// Errors if the provided authentication token is invalid.
    async fn do_authentication(&self) -> Result<Session, Error> {
        let res = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await;
        match res {
            Ok(TypedHeader(Authorization(bearer))) => {
                #[expect(unsafe_code, reason = "specified in correct header")]
                let token = unsafe {
                    session::Token::new_unchecked(bearer.token().to_owned())
                };
                self.service
                    .execute(command::AuthorizeUserSession {
                        token: token.clone(),
                    })
                    .await
                    .map(|s| Session {
                        user_id: s.user_id,
                        role: s.role,
                        token,
                        expires_at: s.expires_at.coerce(),
                    })
                    .map_err(AsError::into_error)
            }
            Err(e) => {
                if e.is_missing() {
                    Err(AuthError::AuthorizationRequired.into())
                } else {
                    Err(e.into_error())
                }
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;

        Ok(Self {
            service,
            parts: parts.clone(),
            current_session: OnceCell::new(),
            auth_error: OnceCell::new(),
        })
    }
}

/// User session.
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] associated with this [`Session`].
    ///
    /// [`User`]: service::domain::User
    pub user_id: user::Id,

    /// [`user::Role`] of the [`User`] associated with this [`Session`].
    ///
    /// [`User`]: service::domain::User
    pub role: user::Role,

    /// Authentication token.
    pub token: session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::InvalidToken.into())
            }
            Self::UserNotExists(_) => Some(AuthError::InvalidToken.into()),
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "UNAUTHORIZED"]
        #[status = UNAUTHORIZED]
        #[message = "Missing authorization token"]
        AuthorizationRequired,

        #[code = "INVALID_TOKEN"]
        #[status = UNAUTHORIZED]
        #[message = "Invalid or expired token"]
        InvalidToken,

        #[code = "FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "Forbidden"]
        Forbidden,

        #[code = "KYC_NOT_APPROVED"]
        #[status = FORBIDDEN]
        #[message = "KYC not approved"]
        KycNotApproved,
    }
}
