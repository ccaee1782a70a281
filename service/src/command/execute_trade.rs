//! [`Command`] for executing a [`Trade`] against a [`SellOrder`].

use common::{
    operations::{By, Commit, Insert, Perform, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        market, property, share, user, Holding, SellOrder, ShareClass, Trade,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for buying shares from an open [`SellOrder`].
///
/// The whole fill is one all-or-nothing transaction: the seller's
/// [`Holding`] is conditionally debited (guarding against shares spent
/// since the order was listed), the buyer's [`Holding`] is credited, the
/// order's remainder is conditionally decremented (flipping it to
/// `FILLED` once it hits zero), and an immutable [`Trade`] is recorded at
/// the order's asking price. Any failed step aborts the whole sequence
/// with no partial effect.
#[derive(Clone, Copy, Debug)]
pub struct ExecuteTrade {
    /// ID of the buying [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub buyer_id: user::Id,

    /// ID of the [`SellOrder`] to buy from.
    pub sell_order_id: market::Id,

    /// Number of shares to buy.
    pub shares: share::Count,
}

/// Output of [`ExecuteTrade`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Recorded [`Trade`].
    pub trade: Trade,

    /// [`SellOrder`] state after the fill.
    pub order: SellOrder,

    /// Buyer's [`Holding`] state after the fill.
    pub holding: Holding,
}

impl<Db> Command<ExecuteTrade> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<SellOrder>, market::Id>>,
            Ok = Option<SellOrder>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ShareClass>, property::Id>>,
            Ok = Option<ShareClass>,
            Err = Traced<database::Error>,
        > + Database<
            Perform<share::HoldingWithdrawal>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<
            Perform<share::HoldingDeposit>,
            Ok = Holding,
            Err = Traced<database::Error>,
        > + Database<
            Perform<market::OrderFill>,
            Ok = Option<SellOrder>,
            Err = Traced<database::Error>,
        > + Database<Insert<Trade>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ExecuteTrade) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ExecuteTrade {
            buyer_id,
            sell_order_id,
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

        let order = tx
            .execute(Select(By::<Option<SellOrder>, _>::new(sell_order_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotFound(sell_order_id))
            .map_err(tracerr::wrap!())?;
        if order.status != market::Status::Open {
            return Err(tracerr::new!(E::OrderClosed(sell_order_id)));
        }

        let share_class = tx
            .execute(Select(By::<Option<ShareClass>, _>::new(
                order.property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotFound(order.property_id))
            .map_err(tracerr::wrap!())?;

        // Sell orders don't reserve shares at listing time, so the
        // seller may own fewer by now: the conditional withdrawal is the
        // oversell guard.
        let withdrawn = tx
            .execute(Perform(share::HoldingWithdrawal {
                owner: share::Owner {
                    user_id: order.user_id,
                    share_class_id: share_class.id,
                },
                shares,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !withdrawn {
            return Err(tracerr::new!(E::SellerInsufficient(order.user_id)));
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

        let order = tx
            .execute(Perform(market::OrderFill {
                order_id: order.id,
                shares,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InsufficientOrderShares(sell_order_id))
            .map_err(tracerr::wrap!())?;

        let trade = Trade {
            id: market::TradeId::new(),
            sell_order_id: order.id,
            property_id: order.property_id,
            buyer_id,
            seller_id: order.user_id,
            shares_traded: shares,
            price_per_share: order.ask_price_per_share,
            executed_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(trade.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            trade,
            order,
            holding,
        })
    }
}

/// Error of [`ExecuteTrade`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`SellOrder`] has fewer shares remaining than requested.
    #[display("Not enough shares remaining in `SellOrder(id: {_0})`")]
    InsufficientOrderShares(#[error(not(source))] market::Id),

    /// [`SellOrder`] is not open anymore.
    #[display("`SellOrder(id: {_0})` is not open")]
    OrderClosed(#[error(not(source))] market::Id),

    /// [`SellOrder`] with the provided ID does not exist.
    #[display("`SellOrder(id: {_0})` does not exist")]
    OrderNotFound(#[error(not(source))] market::Id),

    /// [`Property`] of the [`SellOrder`] has no [`ShareClass`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotFound(#[error(not(source))] property::Id),

    /// Seller owns fewer shares than requested.
    ///
    /// [`User`]: crate::domain::User
    #[display("`User(id: {_0})` has insufficient shares to sell")]
    SellerInsufficient(#[error(not(source))] user::Id),

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
        domain::{market, property, user},
    };

    use super::{ExecuteTrade, ExecutionError};

    #[tokio::test]
    async fn full_fill_closes_the_order() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let buyer_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_500);
        let class_id = class.id;
        let order =
            mock::sell_order(seller_id, property_id, 500, mock::usd(185));
        let order_id = order.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 500)],
            share_classes: vec![class],
            sell_orders: vec![order],
            ..State::default()
        });

        let output = service
            .execute(ExecuteTrade {
                buyer_id,
                sell_order_id: order_id,
                shares: 500,
            })
            .await
            .unwrap();
        assert_eq!(output.order.status, market::Status::Filled);
        assert_eq!(output.order.shares_for_sale, 0);
        assert_eq!(output.holding.shares_owned, 500);
        assert_eq!(output.trade.shares_traded, 500);
        assert_eq!(output.trade.price_per_share, mock::usd(185));

        let state = db.state();
        let seller = state
            .holdings
            .iter()
            .find(|h| h.user_id == seller_id)
            .unwrap();
        let buyer = state
            .holdings
            .iter()
            .find(|h| h.user_id == buyer_id)
            .unwrap();
        assert_eq!(seller.shares_owned, 0);
        assert_eq!(buyer.shares_owned, 500);
        assert_eq!(state.sell_orders[0].status, market::Status::Filled);
        assert_eq!(state.trades.len(), 1);
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn partial_fill_keeps_the_order_open() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_500);
        let class_id = class.id;
        let order =
            mock::sell_order(seller_id, property_id, 500, mock::usd(185));
        let order_id = order.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 500)],
            share_classes: vec![class],
            sell_orders: vec![order],
            ..State::default()
        });

        let output = service
            .execute(ExecuteTrade {
                buyer_id: user::Id::new(),
                sell_order_id: order_id,
                shares: 200,
            })
            .await
            .unwrap();
        assert_eq!(output.order.status, market::Status::Open);
        assert_eq!(output.order.shares_for_sale, 300);
        assert_eq!(output.trade.shares_traded, 200);

        let state = db.state();
        assert_eq!(state.sell_orders[0].shares_for_sale, 300);
        assert_eq!(state.sell_orders[0].status, market::Status::Open);
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn rejects_fill_once_seller_spent_the_shares() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_900);
        let class_id = class.id;
        // The order was listed for 500 shares, but the seller holds only
        // 100 by now.
        let order =
            mock::sell_order(seller_id, property_id, 500, mock::usd(185));
        let order_id = order.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 100)],
            share_classes: vec![class],
            sell_orders: vec![order],
            ..State::default()
        });

        let err = service
            .execute(ExecuteTrade {
                buyer_id: user::Id::new(),
                sell_order_id: order_id,
                shares: 200,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::SellerInsufficient(_)
        ));

        let state = db.state();
        assert_eq!(state.holdings[0].shares_owned, 100);
        assert_eq!(state.sell_orders[0].shares_for_sale, 500);
        assert!(state.trades.is_empty());
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn aborts_whole_fill_on_order_shortage() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_500);
        let class_id = class.id;
        // The seller still owns 500 shares, but only 100 remain in the
        // order itself.
        let order =
            mock::sell_order(seller_id, property_id, 100, mock::usd(185));
        let order_id = order.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 500)],
            share_classes: vec![class],
            sell_orders: vec![order],
            ..State::default()
        });

        let err = service
            .execute(ExecuteTrade {
                buyer_id: user::Id::new(),
                sell_order_id: order_id,
                shares: 200,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InsufficientOrderShares(_)
        ));

        // The aborted transaction must not leak the already-performed
        // holding withdrawal.
        let state = db.state();
        assert_eq!(state.holdings.len(), 1);
        assert_eq!(state.holdings[0].shares_owned, 500);
        assert_eq!(state.sell_orders[0].shares_for_sale, 100);
        assert!(state.trades.is_empty());
        assert!(state.is_conserved(class_id));
    }

    #[tokio::test]
    async fn rejects_filled_order() {
        let property_id = property::Id::new();
        let seller_id = user::Id::new();
        let class = mock::share_class(property_id, 10_000, 9_500);
        let class_id = class.id;
        let mut order =
            mock::sell_order(seller_id, property_id, 0, mock::usd(185));
        order.status = market::Status::Filled;
        let order_id = order.id;
        let (service, db) = mock::service(State {
            holdings: vec![mock::holding(seller_id, class_id, 500)],
            share_classes: vec![class],
            sell_orders: vec![order],
            ..State::default()
        });

        let err = service
            .execute(ExecuteTrade {
                buyer_id: user::Id::new(),
                sell_order_id: order_id,
                shares: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OrderClosed(_)));
        assert!(db.state().trades.is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_order() {
        let (service, _) = mock::service(State::default());

        let err = service
            .execute(ExecuteTrade {
                buyer_id: user::Id::new(),
                sell_order_id: market::Id::new(),
                shares: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OrderNotFound(_)));
    }
}
