//! [`Command`] for applying for a [`Property`] rental.

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, rental, user, Property, RentalApplication},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for a tenant [`User`] applying to rent a [`Property`].
///
/// The [`Property`] must be listed for rent, and the tenant must not
/// already have a pending or approved application for it.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Copy, Debug)]
pub struct ApplyForRental {
    /// ID of the [`Property`] applied for.
    pub property_id: property::Id,

    /// ID of the applying tenant [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub tenant_id: user::Id,
}

impl<Db> Command<ApplyForRental> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<RentalApplication>, rental::Duplicate>>,
            Ok = Option<RentalApplication>,
            Err = Traced<database::Error>,
        > + Database<Insert<RentalApplication>, Err = Traced<database::Error>>,
{
    type Ok = RentalApplication;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ApplyForRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApplyForRental {
            property_id,
            tenant_id,
        } = cmd;

        let property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotFound(property_id))
            .map_err(tracerr::wrap!())?;
        if property.status != property::Status::RentListed {
            return Err(tracerr::new!(E::NotRentListed(property_id)));
        }

        let existing = self
            .database()
            .execute(Select(By::<Option<RentalApplication>, _>::new(
                rental::Duplicate {
                    property_id,
                    tenant_id,
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyApplied(property_id)));
        }

        let application = RentalApplication {
            id: rental::Id::new(),
            property_id,
            tenant_id,
            status: rental::Status::Pending,
            rent_amount: None,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(application.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(application)
    }
}

/// Error of [`ApplyForRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Tenant already has an active application for the [`Property`].
    #[display("Active application for `Property(id: {_0})` already exists")]
    AlreadyApplied(#[error(not(source))] property::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] is not listed for rent.
    #[display("`Property(id: {_0})` is not listed for rent")]
    NotRentListed(#[error(not(source))] property::Id),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotFound(#[error(not(source))] property::Id),
}
