//! [`Command`] for creating a new [`Listing`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        listing, property, share, user, Listing, Property, PropertyImage,
        ShareClass,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Listing`].
///
/// Creates the [`Property`], its [`Listing`], its [`ShareClass`] with the
/// whole issue in the unissued pool, and the gallery images, all in one
/// transaction. An imported listing carries [`property::Provenance`] and
/// is otherwise identical to a manually created one.
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// ID of the [`User`] posting the [`Listing`].
    ///
    /// [`User`]: crate::domain::User
    pub lister_id: user::Id,

    /// Details of the [`Property`] to create.
    pub property: PropertyDetails,

    /// Asking price of the [`Listing`].
    pub asking_price: Money,

    /// Bonus [`Percent`] offered to early investors.
    pub bonus_percent: Percent,

    /// Total number of shares to issue.
    pub total_shares: share::Count,

    /// Reference price per share.
    pub reference_price_per_share: Money,

    /// Gallery image URLs, in display order.
    pub images: Vec<property::ImageUrl>,

    /// [`property::Provenance`] of an imported [`Property`], if any.
    pub provenance: Option<property::Provenance>,
}

/// Details of the [`Property`] created by [`CreateListing`].
#[derive(Clone, Debug)]
pub struct PropertyDetails {
    /// [`property::Kind`] of the [`Property`].
    pub kind: property::Kind,

    /// First address line of the [`Property`].
    pub address1: property::AddressLine,

    /// City the [`Property`] is located in.
    pub city: property::City,

    /// State the [`Property`] is located in.
    pub state: property::State,

    /// ZIP code of the [`Property`].
    pub zip: property::Zip,

    /// Interior area of the [`Property`] in square feet.
    pub square_feet: Option<property::SquareFeet>,

    /// Number of bedrooms in the [`Property`].
    pub bedrooms: Option<property::Rooms>,

    /// Number of bathrooms in the [`Property`].
    pub bathrooms: Option<property::Rooms>,

    /// Total amount of [`Money`] to raise for the [`Property`].
    pub target_raise: Option<Money>,

    /// Estimated monthly rent of the [`Property`].
    pub est_monthly_rent: Option<Money>,
}

/// Output of [`CreateListing`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Created [`Property`].
    pub property: Property,

    /// Created [`Listing`].
    pub listing: Listing,

    /// Created [`ShareClass`].
    pub share_class: ShareClass,

    /// Created [`PropertyImage`]s.
    pub images: Vec<PropertyImage>,
}

impl<Db> Command<CreateListing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<Insert<Listing>, Err = Traced<database::Error>>
        + Database<Insert<ShareClass>, Err = Traced<database::Error>>
        + Database<Insert<Vec<PropertyImage>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateListing {
            lister_id,
            property,
            asking_price,
            bonus_percent,
            total_shares,
            reference_price_per_share,
            images,
            provenance,
        } = cmd;

        if total_shares == 0 {
            return Err(tracerr::new!(E::ZeroShares));
        }

        let property = Property {
            id: property::Id::new(),
            kind: property.kind,
            address1: property.address1,
            city: property.city,
            state: property.state,
            zip: property.zip,
            status: property::Status::Listed,
            square_feet: property.square_feet,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            target_raise: property.target_raise,
            est_monthly_rent: property.est_monthly_rent,
            provenance,
            created_at: DateTime::now().coerce(),
        };
        let listing = Listing {
            id: listing::Id::new(),
            property_id: property.id,
            lister_id,
            asking_price,
            bonus_percent,
            status: listing::Status::Listed,
            posted_at: DateTime::now().coerce(),
        };
        let share_class = ShareClass {
            id: share::Id::new(),
            property_id: property.id,
            total_shares,
            shares_available: total_shares,
            reference_price_per_share,
        };
        let images = images
            .into_iter()
            .enumerate()
            .map(|(i, url)| PropertyImage {
                property_id: property.id,
                url,
                sort_order: property::SortOrder::try_from(i)
                    .unwrap_or(property::SortOrder::MAX),
            })
            .collect::<Vec<_>>();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(share_class.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(images.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            property,
            listing,
            share_class,
            images,
        })
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Total share count is zero.
    #[display("Total share count is zero")]
    ZeroShares,
}
