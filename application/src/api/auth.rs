//! Authentication endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/auth/register` | `register` |
//! | `POST` | `/auth/login` | `login` |
//! | `GET` | `/auth/verify` | `verify` |

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use service::command::{self, Command as _};
use tracing as log;

use crate::{api, define_error, AsError, Context, Error};

/// Links configuration of the API.
#[derive(Clone, Debug)]
pub struct Links {
    /// Base URL of the web application.
    pub web_base_url: String,
}

/// Request of the `register` handler.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address of the new user.
    pub email: String,

    /// Password of the new user.
    pub password: String,

    /// Role of the new user.
    pub role: String,

    /// Phone number of the new user.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Response of the `register` handler.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Human-readable outcome message.
    pub message: String,

    /// Verification URL the user must follow.
    ///
    /// Email delivery is handled by an external service watching the
    /// `verifications` table; the URL is returned for development
    /// deployments where no such service runs.
    pub verify_url: String,
}

/// Request of the `login` handler.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or phone number of the user.
    pub email_or_phone: String,

    /// Password of the user.
    pub password: String,
}

/// Response of the `login` handler.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Issued bearer token.
    pub token: String,
}

/// Query parameters of the `verify` handler.
#[derive(Clone, Debug, Deserialize)]
pub struct VerifyQuery {
    /// Presented verification token.
    #[serde(default)]
    pub token: String,
}

/// Response of the `verify` handler.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VerifyResponse {
    /// Whether the email was verified.
    pub ok: bool,
}

/// Builds the [`Router`] of the authentication endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
}

/// Registers a new user and issues its email verification link.
async fn register(
    context: Context,
    Extension(links): Extension<Links>,
    api::Input(request): api::Input<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), Error> {
    let RegisterRequest {
        email,
        password,
        role,
        phone,
    } = request;

    let email = api::parse(&email, "email")?;
    let password = api::parse(&password, "password")?;
    let role = api::parse(&role, "role")?;
    let phone = api::parse_opt(phone, "phone")?;

    let output = context
        .service()
        .execute(command::RegisterUser {
            email,
            password: secrecy::SecretBox::init_with(move || password),
            phone,
            role,
        })
        .await
        .map_err(AsError::into_error)?;

    let verify_url = format!(
        "{}/verify?token={}",
        links.web_base_url, output.verification.token,
    );
    log::info!(user_id = %output.user.id, "verification link issued");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Verify your email.".to_owned(),
            verify_url,
        }),
    ))
}

/// Verifies the provided credentials and issues a bearer token.
async fn login(
    context: Context,
    api::Input(request): api::Input<LoginRequest>,
) -> Result<Json<LoginResponse>, Error> {
    let LoginRequest {
        email_or_phone,
        password,
    } = request;

    let identifier = api::parse(&email_or_phone, "emailOrPhone")?;
    let password = api::parse(&password, "password")?;

    let output = context
        .service()
        .execute(command::CreateUserSession {
            identifier,
            password: secrecy::SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(LoginResponse {
        token: output.token.to_string(),
    }))
}

/// Verifies a user's email by the presented token.
async fn verify(
    context: Context,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, Error> {
    let VerifyQuery { token } = query;
    if token.is_empty() {
        return Err(Error::validation(&"Missing token"));
    }
    let token = api::parse(&token, "token")?;

    drop(
        context
            .service()
            .execute(command::VerifyEmail { token })
            .await
            .map_err(AsError::into_error)?,
    );

    Ok(Json(VerifyResponse { ok: true }))
}

impl AsError for command::register_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(AuthApiError::EmailOccupied.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailNotVerified(_) => {
                Some(AuthApiError::EmailNotVerified.into())
            }
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongCredentials => {
                Some(AuthApiError::InvalidCredentials.into())
            }
        }
    }
}

impl AsError for command::verify_email::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidToken => Some(AuthApiError::InvalidToken.into()),
            Self::UserNotExists(_) => None,
        }
    }
}

define_error! {
    enum AuthApiError {
        #[code = "CONFLICT"]
        #[status = BAD_REQUEST]
        #[message = "Email already in use"]
        EmailOccupied,

        #[code = "EMAIL_NOT_VERIFIED"]
        #[status = FORBIDDEN]
        #[message = "Please verify your email to continue"]
        EmailNotVerified,

        #[code = "INVALID_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Invalid credentials"]
        InvalidCredentials,

        #[code = "INVALID_TOKEN"]
        #[status = BAD_REQUEST]
        #[message = "Invalid or expired token"]
        InvalidToken,
    }
}
