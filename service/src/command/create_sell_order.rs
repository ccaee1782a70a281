//! [`Command`] for creating a new [`SellOrder`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{market, property, share, user, Holding, SellOrder, ShareClass},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for listing shares of a [`Property`] for sale.
///
/// The seller must own at least the offered amount at creation time, but
/// the shares are NOT reserved: they remain owned (and spendable) until a
/// buyer actually fills the order, which re-validates the seller's
/// [`Holding`] at fill time.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct CreateSellOrder {
    /// ID of the selling [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub seller_id: user::Id,

    /// ID of the [`Property`] whose shares are offered.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// Number of shares offered for sale.
    pub shares_for_sale: share::Count,

    /// Asking price per share.
    pub ask_price_per_share: Money,
}

impl<Db> Command<CreateSellOrder> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<ShareClass>, property::Id>>,
            Ok = Option<ShareClass>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Holding>, share::Owner>>,
            Ok = Option<Holding>,
            Err = Traced<database::Error>,
        > + Database<Insert<SellOrder>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SellOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSellOrder,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSellOrder {
            seller_id,
            property_id,
            shares_for_sale,
            ask_price_per_share,
        } = cmd;

        if shares_for_sale == 0 {
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

        let holding = tx
            .execute(Select(By::<Option<Holding>, _>::new(share::Owner {
                user_id: seller_id,
                share_class_id: share_class.id,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if holding.map_or(true, |h| h.shares_owned < shares_for_sale) {
            return Err(tracerr::new!(E::InsufficientShares(property_id)));
        }

        let order = SellOrder {
            id: market::Id::new(),
            user_id: seller_id,
            property_id,
            shares_for_sale,
            ask_price_per_share,
            status: market::Status::Open,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(order)
    }
}

/// Error of [`CreateSellOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Seller owns fewer shares of the [`Property`] than offered.
    ///
    /// [`Property`]: crate::domain::Property
    #[display("Not enough owned shares of `Property(id: {_0})`")]
    InsufficientShares(#[error(not(source))] property::Id),

    /// [`Property`] with the provided ID has no [`ShareClass`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotFound(#[error(not(source))] property::Id),

    /// Offered share count is zero.
    #[display("Offered share count is zero")]
    ZeroShares,
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            mock::{self, State},
            Command as _,
        },
        domain::{market, property, user},
    };

    use super::{CreateSellOrder, ExecutionError};

    #[tokio::test]
    async fn lists_owned_shares_without_reserving_them() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_500);
        let class_id = class.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 500)],
            share_classes: vec![class],
            ..State::default()
        });

        let order = service
            .execute(CreateSellOrder {
                seller_id,
                property_id,
                shares_for_sale: 500,
                ask_price_per_share: mock::usd(185),
            })
            .await
            .unwrap();
        assert_eq!(order.status, market::Status::Open);
        assert_eq!(order.shares_for_sale, 500);

        let state = db.state();
        assert_eq!(state.sell_orders.len(), 1);
        // Listing does not move any shares.
        assert_eq!(state.holdings[0].shares_owned, 500);
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn rejects_listing_more_than_owned() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_700);
        let class_id = class.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 300)],
            share_classes: vec![class],
            ..State::default()
        });

        let err = service
            .execute(CreateSellOrder {
                seller_id,
                property_id,
                shares_for_sale: 500,
                ask_price_per_share: mock::usd(185),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InsufficientShares(_)
        ));
        assert!(db.state().sell_orders.is_empty());
    }

    #[tokio::test]
    async fn rejects_listing_without_any_holding() {
        let property_id = property::Id::new();
        let (service, db) = mock::service(State {
            share_classes: vec![mock::share_class(property_id, 100, 100)],
            ..State::default()
        });

        let err = service
            .execute(CreateSellOrder {
                seller_id: user::Id::new(),
                property_id,
                shares_for_sale: 1,
                ask_price_per_share: mock::usd(185),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InsufficientShares(_)
        ));
        assert!(db.state().sell_orders.is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_property() {
        let (service, _) = mock::service(State::default());

        let err = service
            .execute(CreateSellOrder {
                seller_id: user::Id::new(),
                property_id: property::Id::new(),
                shares_for_sale: 1,
                ask_price_per_share: mock::usd(185),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PropertyNotFound(_)
        ));
    }
}
