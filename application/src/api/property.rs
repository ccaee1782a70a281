//! [`Property`] catalogue endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/properties` | `list` |
//! | `GET` | `/properties/:id` | `detail` |
//!
//! [`Property`]: service::domain::Property

use axum::{extract::Path, routing::get, Json, Router};
use common::{Money, Percent};
use serde::Serialize;
use service::{
    domain::{listing, mls, property, share},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// [`Property`] as exposed by the API.
///
/// [`Property`]: service::domain::Property
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// ID of the property.
    pub id: property::Id,

    /// Kind of the property.
    pub kind: property::Kind,

    /// First address line of the property.
    pub address1: String,

    /// City the property is located in.
    pub city: String,

    /// State the property is located in.
    pub state: String,

    /// ZIP code of the property.
    pub zip: String,

    /// Current status of the property.
    pub status: property::Status,

    /// Interior area of the property in square feet.
    pub square_feet: Option<u32>,

    /// Number of bedrooms in the property.
    pub bedrooms: Option<u16>,

    /// Number of bathrooms in the property.
    pub bathrooms: Option<u16>,

    /// Total amount to raise for the property.
    pub target_raise: Option<Money>,

    /// Estimated monthly rent of the property.
    pub est_monthly_rent: Option<Money>,

    /// Provenance of an imported property, if any.
    pub source: Option<Source>,

    /// When the property was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: property::CreationDateTime,
}

impl From<service::domain::Property> for Property {
    fn from(property: service::domain::Property) -> Self {
        Self {
            id: property.id,
            kind: property.kind,
            address1: property.address1.to_string(),
            city: property.city.to_string(),
            state: property.state.to_string(),
            zip: property.zip.to_string(),
            status: property.status,
            square_feet: property.square_feet,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            target_raise: property.target_raise,
            est_monthly_rent: property.est_monthly_rent,
            source: property.provenance.map(Into::into),
            created_at: property.created_at,
        }
    }
}

/// Provenance of an imported property.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// External source type the property was imported from.
    pub source_type: mls::SourceType,

    /// External ID of the original listing.
    pub external_id: String,

    /// Attribution required by the external source.
    pub attribution: Option<String>,

    /// When the property was imported.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub imported_at: property::ImportDateTime,
}

impl From<property::Provenance> for Source {
    fn from(provenance: property::Provenance) -> Self {
        Self {
            source_type: provenance.source,
            external_id: provenance.external_id.to_string(),
            attribution: provenance.attribution.map(|a| a.to_string()),
            imported_at: provenance.imported_at,
        }
    }
}

/// Gallery image of a property.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// URL of the image.
    pub url: String,

    /// Position of the image in the gallery.
    pub sort_order: u16,
}

impl From<service::domain::PropertyImage> for Image {
    fn from(image: service::domain::PropertyImage) -> Self {
        Self {
            url: image.url.to_string(),
            sort_order: image.sort_order,
        }
    }
}

/// Share structure of a property.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClass {
    /// ID of the share class.
    pub id: share::Id,

    /// Total number of shares issued.
    pub total_shares: u32,

    /// Number of shares remaining in the unissued pool.
    pub shares_available: u32,

    /// Reference price per share.
    pub reference_price_per_share: Money,
}

impl From<service::domain::ShareClass> for ShareClass {
    fn from(share_class: service::domain::ShareClass) -> Self {
        Self {
            id: share_class.id,
            total_shares: share_class.total_shares,
            shares_available: share_class.shares_available,
            reference_price_per_share: share_class.reference_price_per_share,
        }
    }
}

/// Listing of a property together with its lister's contact.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// ID of the listing.
    pub id: listing::Id,

    /// ID of the listed property.
    pub property_id: property::Id,

    /// Asking price of the listing.
    pub asking_price: Money,

    /// Bonus percent offered to early investors.
    pub bonus_percent: Percent,

    /// Current status of the listing.
    pub status: listing::Status,

    /// When the listing was posted.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub posted_at: listing::PostingDateTime,

    /// Contact of the lister.
    pub lister: api::Contact,
}

impl From<read::listing::WithLister> for Listing {
    fn from(with_lister: read::listing::WithLister) -> Self {
        let read::listing::WithLister { listing, lister } = with_lister;
        Self {
            id: listing.id,
            property_id: listing.property_id,
            asking_price: listing.asking_price,
            bonus_percent: listing.bonus_percent,
            status: listing.status,
            posted_at: listing.posted_at,
            lister: lister.into(),
        }
    }
}

/// Property together with its listings, images and share class.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The property itself.
    #[serde(flatten)]
    pub property: Property,

    /// Listings of the property.
    pub listings: Vec<Listing>,

    /// Gallery images of the property.
    pub images: Vec<Image>,

    /// Share structure of the property.
    pub share_class: Option<ShareClass>,
}

impl From<read::property::Summary> for Summary {
    fn from(summary: read::property::Summary) -> Self {
        Self {
            property: summary.property.into(),
            listings: summary.listings.into_iter().map(Into::into).collect(),
            images: summary.images.into_iter().map(Into::into).collect(),
            share_class: summary.share_class.map(Into::into),
        }
    }
}

/// Builds the [`Router`] of the property catalogue.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/properties", get(list))
        .route("/properties/:id", get(detail))
}

/// Lists all properties with their listings, images and share classes.
async fn list(context: Context) -> Result<Json<Vec<Summary>>, Error> {
    let summaries = context
        .service()
        .execute(query::properties::List::by(
            read::property::Selector::default(),
        ))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// Returns a single property by its ID.
async fn detail(
    context: Context,
    Path(id): Path<Uuid>,
) -> Result<Json<Summary>, Error> {
    let summary = context
        .service()
        .execute(query::property::ById::by(property::Id::from(id)))
        .await
        .map_err(AsError::into_error)?
        .ok_or(PropertyError::NotFound)?;

    Ok(Json(summary.into()))
}

define_error! {
    enum PropertyError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        NotFound,
    }
}
