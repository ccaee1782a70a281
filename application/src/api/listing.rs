//! [`Listing`] management endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/listings` | `create` |
//! | `GET` | `/listings/mine` | `mine` |
//! | `PUT` | `/listings/:id` | `update` |
//!
//! [`Listing`]: service::domain::Listing

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use common::{Money, Percent};
use serde::{Deserialize, Serialize};
use service::{
    command::{
        self,
        create_listing::PropertyDetails,
        update_listing::PropertyChanges,
        Command as _,
    },
    domain::{listing, property, user},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Property details of a `create` request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    /// Kind of the property.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// First address line of the property.
    pub address1: String,

    /// City the property is located in.
    pub city: String,

    /// State the property is located in.
    pub state: String,

    /// ZIP code of the property.
    pub zip: String,

    /// Interior area of the property in square feet.
    #[serde(default)]
    pub square_feet: Option<u32>,

    /// Number of bedrooms in the property.
    #[serde(default)]
    pub bedrooms: Option<u16>,

    /// Number of bathrooms in the property.
    #[serde(default)]
    pub bathrooms: Option<u16>,

    /// Total amount to raise for the property.
    #[serde(default)]
    pub target_raise: Option<String>,

    /// Estimated monthly rent of the property.
    #[serde(default)]
    pub est_monthly_rent: Option<String>,
}

impl PropertyInput {
    /// Validates this [`PropertyInput`] into [`PropertyDetails`].
    pub(crate) fn into_details(self) -> Result<PropertyDetails, Error> {
        let Self {
            kind,
            address1,
            city,
            state,
            zip,
            square_feet,
            bedrooms,
            bathrooms,
            target_raise,
            est_monthly_rent,
        } = self;

        Ok(PropertyDetails {
            kind: api::parse_opt(kind, "type")?
                .unwrap_or(property::Kind::House),
            address1: api::parse(&address1, "address1")?,
            city: api::parse(&city, "city")?,
            state: api::parse(&state, "state")?,
            zip: api::parse(&zip, "zip")?,
            square_feet,
            bedrooms,
            bathrooms,
            target_raise: api::parse_opt(target_raise, "targetRaise")?,
            est_monthly_rent: api::parse_opt(
                est_monthly_rent,
                "estMonthlyRent",
            )?,
        })
    }
}

/// Listing details of a `create` request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    /// Asking price of the listing.
    pub asking_price: String,

    /// Bonus percent offered to early investors.
    pub bonus_percent: String,
}

/// Share structure details of a `create` request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClassInput {
    /// Total number of shares to issue.
    pub total_shares: u32,

    /// Reference price per share.
    pub reference_price_per_share: String,
}

/// Request of the `create` handler.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Property details.
    pub property: PropertyInput,

    /// Listing details.
    pub listing: ListingInput,

    /// Share structure details.
    pub share_class: ShareClassInput,

    /// Gallery image URLs, in display order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateRequest {
    /// Validates this [`CreateRequest`] into a [`command::CreateListing`].
    pub(crate) fn into_command(
        self,
        lister_id: user::Id,
        provenance: Option<property::Provenance>,
    ) -> Result<command::CreateListing, Error> {
        let Self {
            property,
            listing,
            share_class,
            images,
        } = self;

        Ok(command::CreateListing {
            lister_id,
            property: property.into_details()?,
            asking_price: api::parse(&listing.asking_price, "askingPrice")?,
            bonus_percent: api::parse(
                &listing.bonus_percent,
                "bonusPercent",
            )?,
            total_shares: share_class.total_shares,
            reference_price_per_share: api::parse(
                &share_class.reference_price_per_share,
                "referencePricePerShare",
            )?,
            images: images
                .iter()
                .map(|url| api::parse(url, "images"))
                .collect::<Result<_, _>>()?,
            provenance,
        })
    }
}

/// Response of the `create` handler.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    /// Created property.
    pub property: api::property::Property,

    /// Created listing.
    pub listing: Listing,

    /// Created share class.
    pub share_class: api::property::ShareClass,

    /// Number of gallery images created.
    pub images_created: usize,
}

/// Listing as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// ID of the listing.
    pub id: listing::Id,

    /// ID of the listed property.
    pub property_id: property::Id,

    /// ID of the posting lister.
    pub lister_id: user::Id,

    /// Asking price of the listing.
    pub asking_price: Money,

    /// Bonus percent offered to early investors.
    pub bonus_percent: Percent,

    /// Current status of the listing.
    pub status: listing::Status,

    /// When the listing was posted.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub posted_at: listing::PostingDateTime,
}

impl From<service::domain::Listing> for Listing {
    fn from(listing: service::domain::Listing) -> Self {
        Self {
            id: listing.id,
            property_id: listing.property_id,
            lister_id: listing.lister_id,
            asking_price: listing.asking_price,
            bonus_percent: listing.bonus_percent,
            status: listing.status,
            posted_at: listing.posted_at,
        }
    }
}

/// Listing of the authenticated lister with its property details.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owned {
    /// The listing itself.
    #[serde(flatten)]
    pub listing: Listing,

    /// Listed property.
    pub property: api::property::Property,

    /// Gallery images of the property.
    pub images: Vec<api::property::Image>,

    /// Share structure of the property.
    pub share_class: Option<api::property::ShareClass>,
}

impl From<read::listing::Owned> for Owned {
    fn from(owned: read::listing::Owned) -> Self {
        Self {
            listing: owned.listing.into(),
            property: owned.property.into(),
            images: owned.images.into_iter().map(Into::into).collect(),
            share_class: owned.share_class.map(Into::into),
        }
    }
}

/// Property changes of an `update` request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    /// New kind, if any.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// New first address line, if any.
    #[serde(default)]
    pub address1: Option<String>,

    /// New city, if any.
    #[serde(default)]
    pub city: Option<String>,

    /// New state, if any.
    #[serde(default)]
    pub state: Option<String>,

    /// New ZIP code, if any.
    #[serde(default)]
    pub zip: Option<String>,

    /// New interior area in square feet, if any.
    #[serde(default)]
    pub square_feet: Option<u32>,

    /// New number of bedrooms, if any.
    #[serde(default)]
    pub bedrooms: Option<u16>,

    /// New number of bathrooms, if any.
    #[serde(default)]
    pub bathrooms: Option<u16>,

    /// New target raise, if any.
    #[serde(default)]
    pub target_raise: Option<String>,

    /// New estimated monthly rent, if any.
    #[serde(default)]
    pub est_monthly_rent: Option<String>,
}

/// Listing changes of an `update` request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    /// New asking price, if any.
    #[serde(default)]
    pub asking_price: Option<String>,

    /// New bonus percent, if any.
    #[serde(default)]
    pub bonus_percent: Option<String>,
}

/// Request of the `update` handler.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// Property field changes, if any.
    #[serde(default)]
    pub property: Option<PropertyPatch>,

    /// Listing field changes, if any.
    #[serde(default)]
    pub listing: Option<ListingPatch>,
}

/// Response of the `update` handler.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    /// Updated listing.
    #[serde(flatten)]
    pub listing: Listing,

    /// Updated property.
    pub property: api::property::Property,
}

/// Builds the [`Router`] of the listing management endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/listings", post(create))
        .route("/listings/mine", get(mine))
        .route("/listings/:id", put(update))
}

/// Creates a new listing with its property and share structure.
async fn create(
    context: Context,
    api::Input(request): api::Input<CreateRequest>,
) -> Result<(StatusCode, Json<CreateResponse>), Error> {
    let session = context
        .authorize(&[user::Role::Admin, user::Role::Lister])
        .await?;
    context.require_kyc_approved(&session).await?;

    let output = context
        .service()
        .execute(request.into_command(session.user_id, None)?)
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            property: output.property.into(),
            listing: output.listing.into(),
            share_class: output.share_class.into(),
            images_created: output.images.len(),
        }),
    ))
}

/// Lists all listings of the authenticated lister.
async fn mine(context: Context) -> Result<Json<Vec<Owned>>, Error> {
    let session = context.authorize(&[user::Role::Lister]).await?;

    let listings = context
        .service()
        .execute(query::listings::OwnedBy::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// Partially updates a listing and its property.
async fn update(
    context: Context,
    Path(id): Path<Uuid>,
    api::Input(request): api::Input<UpdateRequest>,
) -> Result<Json<UpdateResponse>, Error> {
    let session = context.authorize(&[user::Role::Lister]).await?;

    let UpdateRequest { property, listing } = request;
    let property = property.unwrap_or_default();
    let listing = listing.unwrap_or_default();

    let output = context
        .service()
        .execute(command::UpdateListing {
            listing_id: listing::Id::from(id),
            lister_id: session.user_id,
            property: PropertyChanges {
                kind: api::parse_opt(property.kind, "type")?,
                address1: api::parse_opt(property.address1, "address1")?,
                city: api::parse_opt(property.city, "city")?,
                state: api::parse_opt(property.state, "state")?,
                zip: api::parse_opt(property.zip, "zip")?,
                square_feet: property.square_feet,
                bedrooms: property.bedrooms,
                bathrooms: property.bathrooms,
                target_raise: api::parse_opt(
                    property.target_raise,
                    "targetRaise",
                )?,
                est_monthly_rent: api::parse_opt(
                    property.est_monthly_rent,
                    "estMonthlyRent",
                )?,
            },
            asking_price: api::parse_opt(listing.asking_price, "askingPrice")?,
            bonus_percent: api::parse_opt(
                listing.bonus_percent,
                "bonusPercent",
            )?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(UpdateResponse {
        listing: output.listing.into(),
        property: output.property.into(),
    }))
}

impl AsError for command::create_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ZeroShares => Some(Error::validation(
                &"`totalShares` must be a positive integer",
            )),
        }
    }
}

impl AsError for command::update_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotFound(_) => {
                Some(ListingError::NotFound.into())
            }
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Listing not found"]
        NotFound,
    }
}
