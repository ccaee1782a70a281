//! [`Command`] for deciding on a [`RentalApplication`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, rental, Property, RentalApplication},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for an administrator decision on a [`RentalApplication`].
///
/// Approval also flips the [`Property`] into rented state, in the same
/// transaction.
#[derive(Clone, Copy, Debug)]
pub struct DecideRentalApplication {
    /// ID of the [`RentalApplication`] to decide on.
    pub application_id: rental::Id,

    /// [`Decision`] to apply.
    pub decision: Decision,
}

/// Administrator decision on a [`RentalApplication`].
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    /// Approve the [`RentalApplication`], optionally fixing the monthly
    /// rent.
    Approve(Option<Money>),

    /// Reject the [`RentalApplication`].
    Reject,
}

impl<Db> Command<DecideRentalApplication> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<RentalApplication>, rental::Id>>,
            Ok = Option<RentalApplication>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Update<RentalApplication>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = RentalApplication;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DecideRentalApplication,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DecideRentalApplication {
            application_id,
            decision,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut application = tx
            .execute(Select(By::<Option<RentalApplication>, _>::new(
                application_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ApplicationNotFound(application_id))
            .map_err(tracerr::wrap!())?;

        match decision {
            Decision::Approve(rent_amount) => {
                if application.status != rental::Status::Pending {
                    return Err(tracerr::new!(E::NotPending(application_id)));
                }

                let mut property = tx
                    .execute(Select(By::<Option<Property>, _>::new(
                        application.property_id,
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::ApplicationNotFound(application_id))
                    .map_err(tracerr::wrap!())?;
                if property.status != property::Status::RentListed {
                    return Err(tracerr::new!(E::NotRentListed(property.id)));
                }

                application.status = rental::Status::Approved;
                application.rent_amount = rent_amount;
                property.status = property::Status::Rented;

                tx.execute(Update(application.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Update(property))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            Decision::Reject => {
                application.status = rental::Status::Rejected;
                tx.execute(Update(application.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(application)
    }
}

/// Error of [`DecideRentalApplication`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`RentalApplication`] with the provided ID does not exist.
    #[display("`RentalApplication(id: {_0})` does not exist")]
    ApplicationNotFound(#[error(not(source))] rental::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`RentalApplication`] is not pending anymore.
    #[display("`RentalApplication(id: {_0})` is not pending")]
    NotPending(#[error(not(source))] rental::Id),

    /// [`Property`] of the [`RentalApplication`] is not listed for rent.
    #[display("`Property(id: {_0})` is not listed for rent")]
    NotRentListed(#[error(not(source))] property::Id),
}
