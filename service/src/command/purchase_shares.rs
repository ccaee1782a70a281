//! [`Command`] for a primary-issuance share purchase.

use common::operations::{
    By, Commit, Perform, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, share, user, Holding, ShareClass},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for purchasing shares of a [`Property`] from the unissued
/// pool of its [`ShareClass`].
///
/// No [`Trade`] is recorded: primary issuance moves shares from the pool
/// into the buyer's [`Holding`], not between holders.
///
/// [`Property`]: crate::domain::Property
/// [`Trade`]: crate::domain::Trade
#[derive(Clone, Copy, Debug)]
pub struct PurchaseShares {
    /// ID of the [`Property`] whose shares are purchased.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// ID of the buying [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub buyer_id: user::Id,

    /// Number of shares to purchase.
    pub shares: share::Count,
}

impl<Db> Command<PurchaseShares> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<ShareClass>, property::Id>>,
            Ok = Option<ShareClass>,
            Err = Traced<database::Error>,
        > + Database<
            Perform<share::PoolWithdrawal>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<
            Perform<share::HoldingDeposit>,
            Ok = Holding,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Holding;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PurchaseShares) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PurchaseShares {
            property_id,
            buyer_id,
            shares,
        } = cmd;

        if shares == 0 {
            return Err(tracerr::new!(E::ZeroShares));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let share_class = tx
            .execute(Select(By::<Option<ShareClass>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotFound(property_id))
            .map_err(tracerr::wrap!())?;

        // The affected-row count of the conditional withdrawal is the
        // sole oversell check: no prior read of `shares_available` is
        // consulted.
        let withdrawn = tx
            .execute(Perform(share::PoolWithdrawal {
                share_class_id: share_class.id,
                shares,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !withdrawn {
            return Err(tracerr::new!(E::InsufficientShares(property_id)));
        }

        let holding = tx
            .execute(Perform(share::HoldingDeposit {
                owner: share::Owner {
                    user_id: buyer_id,
                    share_class_id: share_class.id,
                },
                shares,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(holding)
    }
}

/// Error of [`PurchaseShares`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Unissued pool of the [`ShareClass`] holds fewer shares than
    /// requested.
    #[display("Not enough available shares of `Property(id: {_0})`")]
    InsufficientShares(#[error(not(source))] property::Id),

    /// [`Property`] with the provided ID has no [`ShareClass`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotFound(#[error(not(source))] property::Id),

    /// Requested share count is zero.
    #[display("Requested share count is zero")]
    ZeroShares,
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            mock::{self, State},
            Command as _,
        },
        domain::{property, user},
    };

    use super::{ExecutionError, PurchaseShares};

    #[tokio::test]
    async fn moves_shares_from_pool_into_holding() {
        let property_id = property::Id::new();
        let buyer_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 10_000);
        let class_id = class.id;
        let (service, db) = mock::service(State {
            share_classes: vec![class],
            ..State::default()
        });

        let holding = service
            .execute(PurchaseShares {
                property_id,
                buyer_id,
                shares: 500,
            })
            .await
            .unwrap();
        assert_eq!(holding.shares_owned, 500);

        let state = db.state();
        assert_eq!(state.share_classes[0].shares_available, 9_500);
        assert_eq!(state.holdings.len(), 1);
        assert_eq!(state.holdings[0].user_id, buyer_id);
        assert_eq!(state.holdings[0].shares_owned, 500);
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn increments_existing_holding() {
        let property_id = property::Id::new();
        let buyer_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_500);
        let class_id = class.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(buyer_id, class_id, 500)],
            share_classes: vec![class],
            ..State::default()
        });

        let holding = service
            .execute(PurchaseShares {
                property_id,
                buyer_id,
                shares: 300,
            })
            .await
            .unwrap();
        assert_eq!(holding.shares_owned, 800);

        let state = db.state();
        assert_eq!(state.holdings.len(), 1);
        assert_eq!(state.share_classes[0].shares_available, 9_200);
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn rejects_oversell_and_leaves_state_unchanged() {
        let property_id = property::Id::new();
        let class = mock::share_class(property_id, 10_000, 100);
        let class_id = class.id;
        let (service, db) = mock::service(State {
            share_classes: vec![class],
            ..State::default()
        });

        let err = service
            .execute(PurchaseShares {
                property_id,
                buyer_id: user::Id::new(),
                shares: 500,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InsufficientShares(_)
        ));

        let state = db.state();
        assert_eq!(state.share_classes[0].shares_available, 100);
        assert!(state.holdings.is_empty());
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn rejects_unknown_property() {
        let (service, db) = mock::service(State::default());

        let err = service
            .execute(PurchaseShares {
                property_id: property::Id::new(),
                buyer_id: user::Id::new(),
                shares: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PropertyNotFound(_)
        ));
        assert!(db.state().holdings.is_empty());
    }

    #[tokio::test]
    async fn rejects_zero_shares() {
        let property_id = property::Id::new();
        let (service, _) = mock::service(State {
            share_classes: vec![mock::share_class(property_id, 100, 100)],
            ..State::default()
        });

        let err = service
            .execute(PurchaseShares {
                property_id,
                buyer_id: user::Id::new(),
                shares: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ZeroShares));
    }
}
