//! [`MlsListing`] import endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/import/listings` | `browse` |
//! | `GET` | `/import/listings/:externalId` | `detail` |
//! | `POST` | `/import/confirm` | `confirm` |
//!
//! [`MlsListing`]: service::domain::MlsListing

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::{DateTime, Money};
use serde::{Deserialize, Serialize};
use service::{
    command::Command as _,
    domain::{mls, property, user},
    query::{self, Query as _},
    read,
};

use crate::{api, define_error, AsError, Context, Error};

/// Number of rows returned by the `browse` handler.
const BROWSE_LIMIT: u8 = 10;

/// Query parameters of the `browse` and `detail` handlers.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceQuery {
    /// Source feed to browse.
    #[serde(default)]
    pub source: String,

    /// Search term to match against address, city and ZIP code.
    #[serde(default)]
    pub q: Option<String>,
}

/// Row of the `browse` handler response.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseRow {
    /// External ID of the listing.
    pub external_id: String,

    /// First address line of the listed property.
    pub address_line: String,

    /// City the listed property is located in.
    pub city: String,

    /// State the listed property is located in.
    pub state: String,

    /// ZIP code of the listed property.
    pub zip: String,

    /// List price of the listed property.
    pub list_price: Money,

    /// Number of bedrooms in the listed property.
    pub beds: Option<u16>,

    /// Number of bathrooms in the listed property.
    pub baths: Option<u16>,

    /// Thumbnail URL of the listed property.
    pub thumb_url: Option<String>,

    /// Raw status string reported by the source.
    pub status: String,
}

impl From<service::domain::MlsListing> for BrowseRow {
    fn from(listing: service::domain::MlsListing) -> Self {
        Self {
            external_id: listing.external_id.to_string(),
            address_line: listing.address.to_string(),
            city: listing.city.to_string(),
            state: listing.state.to_string(),
            zip: listing.zip.to_string(),
            list_price: listing.list_price,
            beds: listing.beds,
            baths: listing.baths,
            thumb_url: listing.thumb_url.map(|u| u.to_string()),
            status: listing.status.to_string(),
        }
    }
}

/// Response of the `detail` handler.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    /// External ID of the listing.
    pub external_id: String,

    /// Address of the listed property.
    pub address: DetailAddress,

    /// Facts about the listed property.
    pub facts: DetailFacts,

    /// Pricing of the listed property.
    pub pricing: DetailPricing,

    /// Image URLs of the listed property.
    pub images: Vec<String>,

    /// Thumbnail URL of the listed property.
    pub thumb_url: Option<String>,

    /// Raw status string reported by the source.
    pub status: String,

    /// Attribution required by the source.
    pub attribution: Option<String>,
}

/// Address block of a [`Detail`] response.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailAddress {
    /// First address line.
    pub line1: String,

    /// City.
    pub city: String,

    /// State.
    pub state: String,

    /// ZIP code.
    pub zip: String,
}

/// Facts block of a [`Detail`] response.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailFacts {
    /// Number of bedrooms.
    pub beds: Option<u16>,

    /// Number of bathrooms.
    pub baths: Option<u16>,

    /// Interior area in square feet.
    pub sqft: Option<u32>,

    /// Year the property was built.
    pub year_built: Option<u16>,
}

/// Pricing block of a [`Detail`] response.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPricing {
    /// List price.
    pub list_price: Money,

    /// Estimated monthly rent.
    pub rent_estimate: Option<Money>,
}

impl From<service::domain::MlsListing> for Detail {
    fn from(listing: service::domain::MlsListing) -> Self {
        Self {
            external_id: listing.external_id.to_string(),
            address: DetailAddress {
                line1: listing.address.to_string(),
                city: listing.city.to_string(),
                state: listing.state.to_string(),
                zip: listing.zip.to_string(),
            },
            facts: DetailFacts {
                beds: listing.beds,
                baths: listing.baths,
                sqft: listing.sqft,
                year_built: listing.year_built,
            },
            pricing: DetailPricing {
                list_price: listing.list_price,
                rent_estimate: listing.rent_estimate,
            },
            images: listing.images.iter().map(ToString::to_string).collect(),
            thumb_url: listing.thumb_url.map(|u| u.to_string()),
            status: listing.status.to_string(),
            attribution: listing.attribution.map(|a| a.to_string()),
        }
    }
}

/// Request of the `confirm` handler.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Source feed the listing comes from.
    pub source: String,

    /// External ID of the imported listing.
    pub external_id: String,

    /// Property details.
    pub property: api::listing::PropertyInput,

    /// Listing details.
    pub listing: api::listing::ListingInput,

    /// Share structure details.
    pub share_class: api::listing::ShareClassInput,

    /// Gallery image URLs, in display order.
    #[serde(default)]
    pub images: Vec<String>,

    /// Attribution required by the source.
    #[serde(default)]
    pub attribution: Option<String>,
}

/// Builds the [`Router`] of the import endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/import/listings", get(browse))
        .route("/import/listings/:external_id", get(detail))
        .route("/import/confirm", post(confirm))
}

/// Browses importable external listings.
async fn browse(
    context: Context,
    Query(query): Query<SourceQuery>,
) -> Result<Json<Vec<BrowseRow>>, Error> {
    let SourceQuery { source, q } = query;
    let source = api::parse(&source, "source")?;

    let listings = context
        .service()
        .execute(query::mls::Search::by(read::mls::Selector {
            source,
            term: q.map(|q| q.trim().to_owned()),
            limit: BROWSE_LIMIT,
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// Returns a single importable external listing.
async fn detail(
    context: Context,
    Path(external_id): Path<String>,
    Query(query): Query<SourceQuery>,
) -> Result<Json<Detail>, Error> {
    let source = api::parse(&query.source, "source")?;
    let external_id = api::parse(&external_id, "externalId")?;

    let listing = context
        .service()
        .execute(query::mls::ByExternalRef::by(read::mls::ExternalRef {
            source,
            external_id,
        }))
        .await
        .map_err(AsError::into_error)?
        .ok_or(ImportError::NotFound)?;

    Ok(Json(listing.into()))
}

/// Confirms an import, creating the property with provenance.
async fn confirm(
    context: Context,
    api::Input(request): api::Input<ConfirmRequest>,
) -> Result<(StatusCode, Json<api::listing::CreateResponse>), Error> {
    let session = context
        .authorize(&[
            user::Role::Admin,
            user::Role::Investor,
            user::Role::Lister,
            user::Role::Tenant,
        ])
        .await?;
    context.require_kyc_approved(&session).await?;

    let ConfirmRequest {
        source,
        external_id,
        property,
        listing,
        share_class,
        images,
        attribution,
    } = request;

    let provenance = property::Provenance {
        source: api::parse(&source, "source")?,
        external_id: api::parse(&external_id, "externalId")?,
        attribution: api::parse_opt::<mls::Attribution>(
            attribution,
            "attribution",
        )?,
        imported_at: DateTime::now().coerce(),
    };
    let command = api::listing::CreateRequest {
        property,
        listing,
        share_class,
        images,
    }
    .into_command(session.user_id, Some(provenance))?;

    let output = context
        .service()
        .execute(command)
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        Json(api::listing::CreateResponse {
            property: output.property.into(),
            listing: output.listing.into(),
            share_class: output.share_class.into(),
            images_created: output.images.len(),
        }),
    ))
}

define_error! {
    enum ImportError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Listing not found"]
        NotFound,
    }
}
