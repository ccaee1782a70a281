//! [`Command`] for clearing the [`MlsListing`] dataset.

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::MlsListing,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting all stored [`MlsListing`] rows.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearMlsListings;

impl<Db> Command<ClearMlsListings> for Service<Db>
where
    Db: Database<
        Delete<By<Vec<MlsListing>, ()>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: ClearMlsListings,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.database()
            .execute(Delete(By::<Vec<MlsListing>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ClearMlsListings`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
