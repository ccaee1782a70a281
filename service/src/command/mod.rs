//! [`Command`] definition.

pub mod apply_for_rental;
pub mod authorize_user_session;
pub mod clear_mls_listings;
pub mod create_listing;
pub mod create_sell_order;
pub mod create_user_session;
pub mod decide_kyc;
pub mod decide_rental_application;
pub mod delete_property;
pub mod execute_trade;
pub mod purchase_shares;
pub mod register_user;
pub mod rent_list_property;
pub mod seed_mls_listings;
pub mod submit_kyc;
pub mod update_listing;
pub mod verify_email;

#[cfg(test)]
pub(crate) mod mock;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    apply_for_rental::ApplyForRental,
    authorize_user_session::AuthorizeUserSession,
    clear_mls_listings::ClearMlsListings, create_listing::CreateListing,
    create_sell_order::CreateSellOrder,
    create_user_session::CreateUserSession, decide_kyc::DecideKyc,
    decide_rental_application::DecideRentalApplication,
    delete_property::DeleteProperty, execute_trade::ExecuteTrade,
    purchase_shares::PurchaseShares, register_user::RegisterUser,
    rent_list_property::RentListProperty, seed_mls_listings::SeedMlsListings,
    submit_kyc::SubmitKyc, update_listing::UpdateListing,
    verify_email::VerifyEmail,
};
