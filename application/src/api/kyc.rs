//! KYC endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/kyc/me` | `me` |
//! | `POST` | `/kyc/submit` | `submit` |
//! | `GET` | `/kyc/submissions` | `submissions` |
//! | `POST` | `/kyc/approve` | `approve` |
//! | `POST` | `/kyc/reject` | `reject` |

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, decide_kyc::Decision, Command as _},
    domain::user::{self, kyc},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// KYC profile as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// ID of the user the profile belongs to.
    pub user_id: user::Id,

    /// Current status of the profile.
    pub status: kyc::Status,

    /// Free-form data submitted for verification.
    pub data: serde_json::Value,

    /// When the profile was last submitted.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub submitted_at: kyc::SubmissionDateTime,
}

impl From<user::KycProfile> for Profile {
    fn from(profile: user::KycProfile) -> Self {
        Self {
            user_id: profile.user_id,
            status: profile.status,
            data: profile.data,
            submitted_at: profile.submitted_at,
        }
    }
}

/// Pending KYC submission with its user's contact.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// The profile itself.
    #[serde(flatten)]
    pub profile: Profile,

    /// Contact of the submitting user.
    pub user: api::Contact,
}

impl From<read::kyc::Submission> for Submission {
    fn from(submission: read::kyc::Submission) -> Self {
        Self {
            profile: submission.profile.into(),
            user: submission.user.into(),
        }
    }
}

/// Request of the `submit` handler.
#[derive(Clone, Debug, Deserialize)]
pub struct SubmitRequest {
    /// Free-form data to submit for verification.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Request of the `approve` and `reject` handlers.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// ID of the user whose profile is decided.
    pub user_id: Uuid,
}

/// Builds the [`Router`] of the KYC endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/kyc/me", get(me))
        .route("/kyc/submit", post(submit))
        .route("/kyc/submissions", get(submissions))
        .route("/kyc/approve", post(approve))
        .route("/kyc/reject", post(reject))
}

/// Returns the KYC profile of the authenticated user.
async fn me(context: Context) -> Result<Json<Profile>, Error> {
    let session = context.current_session().await?;

    let profile = context
        .service()
        .execute(query::kyc::ProfileById::by(session.user_id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(KycError::ProfileNotFound)?;

    Ok(Json(profile.into()))
}

/// Submits KYC data of the authenticated user.
async fn submit(
    context: Context,
    api::Input(request): api::Input<SubmitRequest>,
) -> Result<Json<Profile>, Error> {
    let session = context.current_session().await?;

    let SubmitRequest { data } = request;
    let data = if data.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        data
    };

    let profile = context
        .service()
        .execute(command::SubmitKyc {
            user_id: session.user_id,
            data,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(profile.into()))
}

/// Lists all pending KYC submissions.
async fn submissions(
    context: Context,
) -> Result<Json<Vec<Submission>>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let submissions = context
        .service()
        .execute(query::kyc::PendingSubmissions::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// Approves the KYC profile of the provided user.
async fn approve(
    context: Context,
    api::Input(request): api::Input<DecisionRequest>,
) -> Result<Json<Profile>, Error> {
    decide(context, request, Decision::Approve).await
}

/// Rejects the KYC profile of the provided user.
async fn reject(
    context: Context,
    api::Input(request): api::Input<DecisionRequest>,
) -> Result<Json<Profile>, Error> {
    decide(context, request, Decision::Reject).await
}

/// Applies an administrator `decision` to the provided user's profile.
async fn decide(
    context: Context,
    request: DecisionRequest,
    decision: Decision,
) -> Result<Json<Profile>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let profile = context
        .service()
        .execute(command::DecideKyc {
            user_id: user::Id::from(request.user_id),
            decision,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(profile.into()))
}

impl AsError for command::decide_kyc::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProfileNotExists(_) => {
                Some(KycError::ProfileNotFound.into())
            }
        }
    }
}

impl AsError for command::submit_kyc::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum KycError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "KYC profile not found"]
        ProfileNotFound,
    }
}
