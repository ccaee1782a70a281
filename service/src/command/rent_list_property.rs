//! [`Command`] for listing a [`Property`] for rent.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for flipping a [`Property`] into rent-listed state.
#[derive(Clone, Copy, Debug, From)]
pub struct RentListProperty {
    /// ID of the [`Property`] to list for rent.
    pub property_id: property::Id,
}

impl<Db> Command<RentListProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RentListProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RentListProperty { property_id } = cmd;

        let mut property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotFound(property_id))
            .map_err(tracerr::wrap!())?;

        property.status = property::Status::RentListed;
        self.database()
            .execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`RentListProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotFound(#[error(not(source))] property::Id),
}
