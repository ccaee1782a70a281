//! Administrator endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/admin/rent-list` | `rent_list` |
//! | `DELETE` | `/admin/properties/:id` | `delete_property` |
//! | `GET` | `/admin/mls-listings` | `mls_listings` |
//! | `POST` | `/admin/mls-listings/seed` | `seed_mls_listings` |
//! | `POST` | `/admin/mls-listings/clear` | `clear_mls_listings` |

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use common::Money;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{mls, property, user},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Number of rows returned by the `mls_listings` handler.
const SEARCH_LIMIT: u8 = 50;

/// Request of the `rent_list` handler.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentListRequest {
    /// ID of the property to list for rent.
    pub property_id: Uuid,
}

/// Query parameters of the `mls_listings` handler.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchQuery {
    /// Source feed to search.
    #[serde(default)]
    pub source: Option<String>,

    /// Search term to match against address, city and ZIP code.
    #[serde(default)]
    pub q: Option<String>,
}

/// Row of the `mls_listings` handler response.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MlsRow {
    /// External ID of the listing.
    pub external_id: String,

    /// First address line of the listed property.
    pub address: String,

    /// City the listed property is located in.
    pub city: String,

    /// State the listed property is located in.
    pub state: String,

    /// ZIP code of the listed property.
    pub zip: String,

    /// List price of the listed property.
    pub list_price: Money,

    /// Raw status string reported by the source.
    pub status: String,

    /// Source feed the listing comes from.
    pub source_type: mls::SourceType,

    /// Thumbnail URL of the listed property.
    pub thumb_url: Option<String>,
}

impl From<service::domain::MlsListing> for MlsRow {
    fn from(listing: service::domain::MlsListing) -> Self {
        Self {
            external_id: listing.external_id.to_string(),
            address: listing.address.to_string(),
            city: listing.city.to_string(),
            state: listing.state.to_string(),
            zip: listing.zip.to_string(),
            list_price: listing.list_price,
            status: listing.status.to_string(),
            source_type: listing.source,
            thumb_url: listing.thumb_url.map(|u| u.to_string()),
        }
    }
}

/// Response of the `seed_mls_listings` and `clear_mls_listings`
/// handlers.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CountResponse {
    /// Number of affected rows.
    pub count: u64,
}

/// Builds the [`Router`] of the administrator endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/admin/rent-list", post(rent_list))
        .route("/admin/properties/:id", delete(delete_property))
        .route("/admin/mls-listings", get(mls_listings))
        .route("/admin/mls-listings/seed", post(seed_mls_listings))
        .route("/admin/mls-listings/clear", post(clear_mls_listings))
}

/// Flips a property into rent-listed state.
async fn rent_list(
    context: Context,
    api::Input(request): api::Input<RentListRequest>,
) -> Result<Json<api::property::Property>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let property = context
        .service()
        .execute(command::RentListProperty {
            property_id: property::Id::from(request.property_id),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(property.into()))
}

/// Deletes a property and everything attached to it.
async fn delete_property(
    context: Context,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    context
        .service()
        .execute(command::DeleteProperty {
            property_id: property::Id::from(id),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Searches the stored external listings.
async fn mls_listings(
    context: Context,
    Query(search): Query<SearchQuery>,
) -> Result<Json<Vec<MlsRow>>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let SearchQuery { source, q } = search;
    let source = api::parse_opt(source, "source")?
        .unwrap_or(mls::SourceType::Public);

    let listings = context
        .service()
        .execute(query::mls::Search::by(read::mls::Selector {
            source,
            term: q.map(|q| q.trim().to_owned()),
            limit: SEARCH_LIMIT,
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// Replaces the stored external listings with the built-in mock dataset.
async fn seed_mls_listings(
    context: Context,
) -> Result<Json<CountResponse>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let count = context
        .service()
        .execute(command::SeedMlsListings)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(CountResponse {
        count: u64::try_from(count).unwrap(),
    }))
}

/// Deletes all stored external listings.
async fn clear_mls_listings(
    context: Context,
) -> Result<Json<CountResponse>, Error> {
    drop(context.authorize(&[user::Role::Admin]).await?);

    let count = context
        .service()
        .execute(command::ClearMlsListings)
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(CountResponse { count }))
}

impl AsError for command::rent_list_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotFound(_) => {
                Some(AdminError::PropertyNotFound.into())
            }
        }
    }
}

impl AsError for command::delete_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidState(_) => Some(AdminError::InvalidState.into()),
            Self::PropertyNotFound(_) => {
                Some(AdminError::PropertyNotFound.into())
            }
        }
    }
}

impl AsError for command::seed_mls_listings::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::clear_mls_listings::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum AdminError {
        #[code = "INVALID_STATE"]
        #[status = BAD_REQUEST]
        #[message = "Only listed properties can be deleted"]
        InvalidState,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        PropertyNotFound,
    }
}
