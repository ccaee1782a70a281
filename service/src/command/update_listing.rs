//! [`Command`] for updating a [`Listing`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, property, user, Listing, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for partially updating a [`Listing`] and its [`Property`].
///
/// Only the posting [`User`] may update a [`Listing`]; a [`Listing`] of
/// another lister is indistinguishable from a missing one.
#[derive(Clone, Debug)]
pub struct UpdateListing {
    /// ID of the [`Listing`] to update.
    pub listing_id: listing::Id,

    /// ID of the [`User`] requesting the update.
    ///
    /// [`User`]: crate::domain::User
    pub lister_id: user::Id,

    /// [`Property`] field changes, if any.
    pub property: PropertyChanges,

    /// New asking price, if any.
    pub asking_price: Option<Money>,

    /// New bonus [`Percent`], if any.
    pub bonus_percent: Option<Percent>,
}

/// [`Property`] field changes of [`UpdateListing`].
#[derive(Clone, Debug, Default)]
pub struct PropertyChanges {
    /// New [`property::Kind`], if any.
    pub kind: Option<property::Kind>,

    /// New first address line, if any.
    pub address1: Option<property::AddressLine>,

    /// New city, if any.
    pub city: Option<property::City>,

    /// New state, if any.
    pub state: Option<property::State>,

    /// New ZIP code, if any.
    pub zip: Option<property::Zip>,

    /// New interior area in square feet, if any.
    pub square_feet: Option<property::SquareFeet>,

    /// New number of bedrooms, if any.
    pub bedrooms: Option<property::Rooms>,

    /// New number of bathrooms, if any.
    pub bathrooms: Option<property::Rooms>,

    /// New target raise, if any.
    pub target_raise: Option<Money>,

    /// New estimated monthly rent, if any.
    pub est_monthly_rent: Option<Money>,
}

/// Output of [`UpdateListing`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Updated [`Listing`].
    pub listing: Listing,

    /// Updated [`Property`].
    pub property: Property,
}

impl<Db> Command<UpdateListing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateListing {
            listing_id,
            lister_id,
            property: changes,
            asking_price,
            bonus_percent,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|l| l.lister_id == lister_id)
            .ok_or(E::ListingNotFound(listing_id))
            .map_err(tracerr::wrap!())?;

        let mut property = tx
            .execute(Select(By::<Option<Property>, _>::new(
                listing.property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotFound(listing_id))
            .map_err(tracerr::wrap!())?;

        let PropertyChanges {
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
        } = changes;
        if let Some(kind) = kind {
            property.kind = kind;
        }
        if let Some(address1) = address1 {
            property.address1 = address1;
        }
        if let Some(city) = city {
            property.city = city;
        }
        if let Some(state) = state {
            property.state = state;
        }
        if let Some(zip) = zip {
            property.zip = zip;
        }
        if let Some(square_feet) = square_feet {
            property.square_feet = Some(square_feet);
        }
        if let Some(bedrooms) = bedrooms {
            property.bedrooms = Some(bedrooms);
        }
        if let Some(bathrooms) = bathrooms {
            property.bathrooms = Some(bathrooms);
        }
        if let Some(target_raise) = target_raise {
            property.target_raise = Some(target_raise);
        }
        if let Some(est_monthly_rent) = est_monthly_rent {
            property.est_monthly_rent = Some(est_monthly_rent);
        }
        if let Some(asking_price) = asking_price {
            listing.asking_price = asking_price;
        }
        if let Some(bonus_percent) = bonus_percent {
            listing.bonus_percent = bonus_percent;
        }

        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { listing, property })
    }
}

/// Error of [`UpdateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Listing`] with the provided ID does not exist or belongs to
    /// another lister.
    #[display("`Listing(id: {_0})` does not exist")]
    ListingNotFound(#[error(not(source))] listing::Id),
}
