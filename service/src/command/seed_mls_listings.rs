//! [`Command`] for seeding the [`MlsListing`] dataset.

use common::{
    money::Currency,
    operations::{By, Commit, Delete, Insert, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{mls, property, MlsListing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing the stored [`MlsListing`] rows with the
/// built-in mock dataset.
///
/// Source feeds are out of reach in development deployments, so the
/// import flow is fed from a fixed dataset instead; external IDs
/// prefixed with `partner-` land in the partner feed, the rest in the
/// public one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeedMlsListings;

/// Row of the built-in mock dataset.
type MockRow = (
    // external id
    &'static str,
    // address, city, state, zip
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    // list price, rent estimate
    i64,
    i64,
    // beds, baths, sqft, year built
    u16,
    u16,
    u32,
    u16,
    // thumb URL
    &'static str,
    // status
    &'static str,
    // attribution
    Option<&'static str>,
);

/// Built-in mock dataset fed into the import flow.
const MOCK_LISTINGS: &[MockRow] = &[
    (
        "pub-1001",
        "1284 Magnolia Ave",
        "Orlando",
        "FL",
        "32803",
        345_000,
        2_150,
        3,
        2,
        1_540,
        1998,
        "https://images.brickly.test/pub-1001/thumb.jpg",
        "ACTIVE",
        None,
    ),
    (
        "pub-1002",
        "77 Birchwood Dr",
        "Charlotte",
        "NC",
        "28205",
        289_900,
        1_850,
        3,
        1,
        1_210,
        1974,
        "https://images.brickly.test/pub-1002/thumb.jpg",
        "ACTIVE",
        None,
    ),
    (
        "pub-1003",
        "410 E Jefferson St",
        "Phoenix",
        "AZ",
        "85004",
        512_000,
        2_700,
        4,
        3,
        2_105,
        2006,
        "https://images.brickly.test/pub-1003/thumb.jpg",
        "PENDING",
        None,
    ),
    (
        "partner-2001",
        "95 Harborview Ln",
        "Tampa",
        "FL",
        "33602",
        625_000,
        3_400,
        4,
        3,
        2_380,
        2015,
        "https://images.brickly.test/partner-2001/thumb.jpg",
        "ACTIVE",
        Some("Courtesy of Harborview Realty Partners"),
    ),
    (
        "partner-2002",
        "18 Cobblestone Ct",
        "Nashville",
        "TN",
        "37206",
        459_500,
        2_450,
        3,
        2,
        1_760,
        2001,
        "https://images.brickly.test/partner-2002/thumb.jpg",
        "ACTIVE",
        Some("Courtesy of Midtown Brokerage LLC"),
    ),
    (
        "partner-2003",
        "732 Sierra Vista Rd",
        "Boise",
        "ID",
        "83702",
        398_000,
        2_050,
        3,
        2,
        1_630,
        1989,
        "https://images.brickly.test/partner-2003/thumb.jpg",
        "OFF_MARKET",
        Some("Courtesy of Sierra Vista Group"),
    ),
];

impl<Db> Command<SeedMlsListings> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Vec<MlsListing>, ()>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<Insert<Vec<MlsListing>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = usize;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: SeedMlsListings) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let listings = MOCK_LISTINGS
            .iter()
            .map(|row| {
                let (
                    external_id,
                    address,
                    city,
                    state,
                    zip,
                    list_price,
                    rent_estimate,
                    beds,
                    baths,
                    sqft,
                    year_built,
                    thumb_url,
                    status,
                    attribution,
                ) = *row;

                let external_id = mls::ExternalId::new(external_id)
                    .expect("mock dataset is valid");
                MlsListing {
                    source: mls::SourceType::from_external_id(&external_id),
                    external_id,
                    address: property::AddressLine::new(address)
                        .expect("mock dataset is valid"),
                    city: property::City::new(city)
                        .expect("mock dataset is valid"),
                    state: property::State::new(state)
                        .expect("mock dataset is valid"),
                    zip: property::Zip::new(zip)
                        .expect("mock dataset is valid"),
                    list_price: Money {
                        amount: Decimal::from(list_price),
                        currency: Currency::Usd,
                    },
                    rent_estimate: Some(Money {
                        amount: Decimal::from(rent_estimate),
                        currency: Currency::Usd,
                    }),
                    beds: Some(beds),
                    baths: Some(baths),
                    sqft: Some(sqft),
                    year_built: Some(year_built),
                    images: Vec::new(),
                    thumb_url: property::ImageUrl::new(thumb_url),
                    status: status.parse().expect("mock dataset is valid"),
                    attribution: attribution
                        .map(|a| a.parse().expect("mock dataset is valid")),
                    created_at: DateTime::now().coerce(),
                }
            })
            .collect::<Vec<_>>();
        let count = listings.len();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Delete(By::<Vec<MlsListing>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(listings))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(count)
    }
}

/// Error of [`SeedMlsListings`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
