//! Rental workflow endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/rentals` | `list` |
//! | `POST` | `/rentals/apply` | `apply` |
//! | `GET` | `/admin/rental-applications` | `pending` |
//! | `POST` | `/admin/rental-applications/approve` | `approve` |
//! | `POST` | `/admin/rental-applications/reject` | `reject` |

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::Money;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        self, decide_rental_application::Decision, Command as _,
    },
    domain::{property, rental, user},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Rental application as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// ID of the application.
    pub id: rental::Id,

    /// ID of the property applied for.
    pub property_id: property::Id,

    /// ID of the applying tenant.
    pub tenant_id: user::Id,

    /// Current status of the application.
    pub status: rental::Status,

    /// Monthly rent approved by an administrator, if any.
    pub rent_amount: Option<Money>,

    /// When the application was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: rental::CreationDateTime,
}

impl From<service::domain::RentalApplication> for Application {
    fn from(application: service::domain::RentalApplication) -> Self {
        Self {
            id: application.id,
            property_id: application.property_id,
            tenant_id: application.tenant_id,
            status: application.status,
            rent_amount: application.rent_amount,
            created_at: application.created_at,
        }
    }
}

/// Pending rental application with its property and tenant.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApplication {
    /// The application itself.
    #[serde(flatten)]
    pub application: Application,

    /// Property applied for.
    pub property: api::property::Property,

    /// Contact of the applying tenant.
    pub tenant: api::Contact,
}

impl From<read::rental::PendingApplication> for PendingApplication {
    fn from(pending: read::rental::PendingApplication) -> Self {
        Self {
            application: pending.application.into(),
            property: pending.property.into(),
            tenant: pending.tenant.into(),
        }
    }
}

/// Request of the `apply` handler.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    /// ID of the property to apply for.
    pub property_id: Uuid,
}

/// Request of the `approve` and `reject` handlers.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// ID of the application to decide on.
    pub application_id: Uuid,

    /// Monthly rent to fix on approval.
    #[serde(default)]
    pub rent_amount: Option<String>,
}

/// Builds the [`Router`] of the rental workflow endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/rentals", get(list))
        .route("/rentals/apply", post(apply))
        .route("/admin/rental-applications", get(pending))
        .route("/admin/rental-applications/approve", post(approve))
        .route("/admin/rental-applications/reject", post(reject))
}

/// Lists all rent-listed properties.
async fn list(
    context: Context,
) -> Result<Json<Vec<api::property::Summary>>, Error> {
    let summaries = context
        .service()
        .execute(query::properties::List::by(read::property::Selector {
            status: Some(property::Status::RentListed),
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// Applies the authenticated tenant for a property rental.
async fn apply(
    context: Context,
    api::Input(request): api::Input<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>), Error> {
    let session = context.authorize(&[user::Role::Tenant]).await?;

    let application = context
        .service()
        .execute(command::ApplyForRental {
            property_id: property::Id::from(request.property_id),
            tenant_id: session.user_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(application.into())))
}

/// Lists all pending rental applications.
async fn pending(
    context: Context,
) -> Result<Json<Vec<PendingApplication>>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let applications = context
        .service()
        .execute(query::rentals::PendingApplications::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(applications.into_iter().map(Into::into).collect()))
}

/// Approves the provided rental application.
async fn approve(
    context: Context,
    api::Input(request): api::Input<DecisionRequest>,
) -> Result<Json<Application>, Error> {
    let rent_amount = api::parse_opt(request.rent_amount, "rentAmount")?;
    decide(context, request.application_id, Decision::Approve(rent_amount))
        .await
}

/// Rejects the provided rental application.
async fn reject(
    context: Context,
    api::Input(request): api::Input<DecisionRequest>,
) -> Result<Json<Application>, Error> {
    decide(context, request.application_id, Decision::Reject).await
}

/// Applies an administrator `decision` to the provided application.
async fn decide(
    context: Context,
    application_id: Uuid,
    decision: Decision,
) -> Result<Json<Application>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let application = context
        .service()
        .execute(command::DecideRentalApplication {
            application_id: rental::Id::from(application_id),
            decision,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(application.into()))
}

impl AsError for command::apply_for_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AlreadyApplied(_) => Some(RentalError::AlreadyApplied.into()),
            Self::Db(e) => e.try_as_error(),
            Self::NotRentListed(_) => Some(RentalError::NotRentListed.into()),
            Self::PropertyNotFound(_) => {
                Some(RentalError::PropertyNotFound.into())
            }
        }
    }
}

impl AsError for command::decide_rental_application::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ApplicationNotFound(_) => {
                Some(RentalError::ApplicationNotFound.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::NotPending(_) => Some(RentalError::NotPending.into()),
            Self::NotRentListed(_) => Some(RentalError::NotRentListed.into()),
        }
    }
}

define_error! {
    enum RentalError {
        #[code = "ALREADY_APPLIED"]
        #[status = BAD_REQUEST]
        #[message = "Application already exists"]
        AlreadyApplied,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Application not found"]
        ApplicationNotFound,

        #[code = "NOT_PENDING"]
        #[status = BAD_REQUEST]
        #[message = "Application is not pending"]
        NotPending,

        #[code = "NOT_RENT_LISTED"]
        #[status = BAD_REQUEST]
        #[message = "Property is not available for rent"]
        NotRentListed,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        PropertyNotFound,
    }
}
