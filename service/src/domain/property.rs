//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::mls;

/// Real-estate property offered for fractional investment.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Kind`] of this [`Property`].
    pub kind: Kind,

    /// First address line of this [`Property`].
    pub address1: AddressLine,

    /// City this [`Property`] is located in.
    pub city: City,

    /// State this [`Property`] is located in.
    pub state: State,

    /// ZIP code of this [`Property`].
    pub zip: Zip,

    /// Current [`Status`] of this [`Property`].
    pub status: Status,

    /// Interior area of this [`Property`] in square feet.
    pub square_feet: Option<SquareFeet>,

    /// Number of bedrooms in this [`Property`].
    pub bedrooms: Option<Rooms>,

    /// Number of bathrooms in this [`Property`].
    pub bathrooms: Option<Rooms>,

    /// Total amount of [`Money`] to raise for this [`Property`].
    pub target_raise: Option<Money>,

    /// Estimated monthly rent of this [`Property`].
    pub est_monthly_rent: Option<Money>,

    /// [`Provenance`] of this [`Property`], if it was imported from an
    /// external listing source.
    pub provenance: Option<Provenance>,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "A single-family house."]
        House = 1,

        #[doc = "An apartment."]
        Apartment = 2,

        #[doc = "A condominium."]
        Condo = 3,

        #[doc = "A townhouse."]
        Townhouse = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Property`]."]
    enum Status {
        #[doc = "Listed for fractional investment."]
        Listed = 1,

        #[doc = "Additionally listed for rent."]
        RentListed = 2,

        #[doc = "Rented out to a tenant."]
        Rented = 3,
    }
}

/// First address line of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct AddressLine(String);

impl AddressLine {
    /// Creates a new [`AddressLine`] if the given `line` is valid.
    #[must_use]
    pub fn new(line: impl Into<String>) -> Option<Self> {
        let line = line.into();
        Self::check(&line).then_some(Self(line))
    }

    /// Checks whether the given `line` is a valid [`AddressLine`].
    fn check(line: impl AsRef<str>) -> bool {
        let line = line.as_ref();
        line.trim() == line && !line.is_empty() && line.len() <= 512
    }
}

impl FromStr for AddressLine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `AddressLine`")
    }
}

/// City of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 512
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// State of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct State(String);

impl State {
    /// Creates a new [`State`] if the given `state` is valid.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Option<Self> {
        let state = state.into();
        Self::check(&state).then_some(Self(state))
    }

    /// Checks whether the given `state` is a valid [`State`].
    fn check(state: impl AsRef<str>) -> bool {
        let state = state.as_ref();
        state.trim() == state && !state.is_empty() && state.len() <= 512
    }
}

impl FromStr for State {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `State`")
    }
}

/// ZIP code of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Zip(String);

impl Zip {
    /// Creates a new [`Zip`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`Zip`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.trim() == code && !code.is_empty() && code.len() <= 32
    }
}

impl FromStr for Zip {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Zip`")
    }
}

/// Interior area of a [`Property`] in square feet.
pub type SquareFeet = u32;

/// Number of rooms of some sort in a [`Property`].
pub type Rooms = u16;

/// Provenance of an imported [`Property`].
#[derive(Clone, Debug)]
pub struct Provenance {
    /// [`mls::SourceType`] the [`Property`] was imported from.
    pub source: mls::SourceType,

    /// [`mls::ExternalId`] of the original external listing.
    pub external_id: mls::ExternalId,

    /// Attribution required by the external listing source.
    pub attribution: Option<mls::Attribution>,

    /// [`DateTime`] when the [`Property`] was imported.
    pub imported_at: ImportDateTime,
}

/// Image of a [`Property`].
#[derive(Clone, Debug)]
pub struct PropertyImage {
    /// ID of the [`Property`] this [`PropertyImage`] belongs to.
    pub property_id: Id,

    /// URL of this [`PropertyImage`].
    pub url: ImageUrl,

    /// Position of this [`PropertyImage`] in the gallery.
    pub sort_order: SortOrder,
}

/// URL of a [`PropertyImage`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        (url.starts_with("http://") || url.starts_with("https://"))
            && url.len() <= 2048
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Position of a [`PropertyImage`] in the gallery.
pub type SortOrder = u16;

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

/// [`DateTime`] when a [`Property`] was imported.
pub type ImportDateTime = DateTimeOf<(Provenance, unit::Creation)>;
