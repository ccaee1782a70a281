//! [`MlsListing`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, FromStr};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use crate::domain::property;
#[cfg(doc)]
use crate::domain::Property;

/// MLS-style external listing available for import as a [`Property`].
///
/// Rows come either from the built-in mock dataset (seeded by an
/// administrator) or from a partner feed; they are read-only source
/// material for the import flow.
#[derive(Clone, Debug)]
pub struct MlsListing {
    /// [`ExternalId`] of this [`MlsListing`] within its source.
    pub external_id: ExternalId,

    /// [`SourceType`] this [`MlsListing`] comes from.
    pub source: SourceType,

    /// First address line of the listed property.
    pub address: property::AddressLine,

    /// City the listed property is located in.
    pub city: property::City,

    /// State the listed property is located in.
    pub state: property::State,

    /// ZIP code of the listed property.
    pub zip: property::Zip,

    /// List price of the listed property.
    pub list_price: Money,

    /// Estimated monthly rent of the listed property.
    pub rent_estimate: Option<Money>,

    /// Number of bedrooms in the listed property.
    pub beds: Option<property::Rooms>,

    /// Number of bathrooms in the listed property.
    pub baths: Option<property::Rooms>,

    /// Interior area of the listed property in square feet.
    pub sqft: Option<property::SquareFeet>,

    /// Year the listed property was built.
    pub year_built: Option<YearBuilt>,

    /// Image URLs of the listed property.
    pub images: Vec<property::ImageUrl>,

    /// Thumbnail URL of the listed property.
    pub thumb_url: Option<property::ImageUrl>,

    /// Raw status string reported by the source.
    pub status: ListingStatus,

    /// [`Attribution`] required by the source, if any.
    pub attribution: Option<Attribution>,

    /// [`DateTime`] when this [`MlsListing`] was recorded.
    pub created_at: CreationDateTime,
}

define_kind! {
    #[doc = "Source of an [`MlsListing`]."]
    enum SourceType {
        #[doc = "A publicly available listing feed."]
        Public = 1,

        #[doc = "A partner-provided listing feed."]
        Partner = 2,
    }
}

impl SourceType {
    /// Derives the [`SourceType`] from an [`ExternalId`] prefix.
    ///
    /// IDs prefixed with `partner-` belong to the partner feed; anything
    /// else is treated as public.
    #[must_use]
    pub fn from_external_id(id: &ExternalId) -> Self {
        if AsRef::<str>::as_ref(id).starts_with("partner-") {
            Self::Partner
        } else {
            Self::Public
        }
    }
}

/// ID of an [`MlsListing`] within its external source.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ExternalId(String);

impl ExternalId {
    /// Creates a new [`ExternalId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.is_empty() && id.len() <= 128).then_some(Self(id))
    }
}

impl FromStr for ExternalId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ExternalId`")
    }
}

/// Raw status string of an [`MlsListing`] as reported by its source.
#[derive(AsRef, Clone, Debug, Display, Eq, FromStr, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ListingStatus(String);

/// Attribution line required by an [`MlsListing`] source.
#[derive(AsRef, Clone, Debug, Display, Eq, FromStr, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Attribution(String);

/// Year a listed property was built.
pub type YearBuilt = u16;

/// [`DateTime`] when an [`MlsListing`] was recorded.
pub type CreationDateTime = DateTimeOf<(MlsListing, unit::Creation)>;
