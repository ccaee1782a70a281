//! Domain definitions.

pub mod listing;
pub mod market;
pub mod mls;
pub mod property;
pub mod rental;
pub mod share;
pub mod user;

pub use self::{
    listing::Listing,
    market::{SellOrder, Trade},
    mls::MlsListing,
    property::{Property, PropertyImage},
    rental::RentalApplication,
    share::{Holding, ShareClass},
    user::User,
};
