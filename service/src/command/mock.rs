//! In-memory [`Database`] mock for [`Command`] tests.
//!
//! Models the transactional contract the real infrastructure provides:
//! a [`Transact`] operation yields a working copy of the whole state,
//! and only [`Commit`] publishes it back, so an aborted [`Command`]
//! leaves the base state untouched.
//!
//! [`Command`]: super::Command

use std::sync::{Arc, Mutex};

use common::{
    money::Currency,
    operations::{By, Commit, Insert, Perform, Select, Transact},
    DateTime, Money,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        market, property, share, user, Holding, SellOrder, ShareClass, Trade,
    },
    infra::{database, Database},
    Config, Service,
};

/// State shared by all mocked operations.
#[derive(Clone, Debug, Default)]
pub(crate) struct State {
    /// Stored [`ShareClass`]es.
    pub(crate) share_classes: Vec<ShareClass>,

    /// Stored [`Holding`]s.
    pub(crate) holdings: Vec<Holding>,

    /// Stored [`SellOrder`]s.
    pub(crate) sell_orders: Vec<SellOrder>,

    /// Stored [`Trade`]s.
    pub(crate) trades: Vec<Trade>,
}

impl State {
    /// Checks the share conservation invariant of the provided
    /// [`ShareClass`]: issued shares are either in the unissued pool or
    /// owned through [`Holding`]s, never created or destroyed.
    pub(crate) fn is_conserved(&self, share_class_id: share::Id) -> bool {
        let Some(class) = self
            .share_classes
            .iter()
            .find(|c| c.id == share_class_id)
        else {
            return false;
        };
        let owned: u64 = self
            .holdings
            .iter()
            .filter(|h| h.share_class_id == share_class_id)
            .map(|h| u64::from(h.shares_owned))
            .sum();
        u64::from(class.total_shares)
            == u64::from(class.shares_available) + owned
    }
}

/// In-memory [`Database`] mock.
#[derive(Clone, Debug)]
pub(crate) struct Mock(Arc<Mutex<State>>);

impl Mock {
    /// Creates a new [`Mock`] over the provided [`State`].
    pub(crate) fn new(state: State) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    /// Returns a snapshot of the current [`State`].
    pub(crate) fn state(&self) -> State {
        self.0.lock().unwrap().clone()
    }
}

/// In-flight transaction of a [`Mock`] database.
#[derive(Clone, Debug)]
pub(crate) struct MockTx {
    /// Base [`State`] the transaction was started from.
    base: Arc<Mutex<State>>,

    /// Working copy the operations apply to.
    working: Arc<Mutex<State>>,
}

/// Builds a [`Service`] over a [`Mock`] of the provided [`State`].
pub(crate) fn service(state: State) -> (Service<Mock>, Mock) {
    let mock = Mock::new(state);
    let config = Config {
        jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"test"),
        jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"test"),
        purge_expired_verifications:
            crate::task::purge_expired_verifications::Config {
                interval: std::time::Duration::from_secs(60 * 60),
            },
    };
    (Service::new_detached(config, mock.clone()), mock)
}

/// Shortcut for a USD [`Money`] amount.
pub(crate) fn usd(amount: i64) -> Money {
    Money {
        amount: Decimal::from(amount),
        currency: Currency::Usd,
    }
}

/// Builds a [`ShareClass`] with the provided counters.
pub(crate) fn share_class(
    property_id: property::Id,
    total_shares: share::Count,
    shares_available: share::Count,
) -> ShareClass {
    ShareClass {
        id: share::Id::new(),
        property_id,
        total_shares,
        shares_available,
        reference_price_per_share: usd(100),
    }
}

/// Builds a [`Holding`] of the provided owner.
pub(crate) fn holding(
    user_id: user::Id,
    share_class_id: share::Id,
    shares_owned: share::Count,
) -> Holding {
    Holding {
        id: share::HoldingId::new(),
        user_id,
        share_class_id,
        shares_owned,
        updated_at: DateTime::now().coerce(),
    }
}

/// Builds an open [`SellOrder`] of the provided seller.
pub(crate) fn sell_order(
    user_id: user::Id,
    property_id: property::Id,
    shares_for_sale: share::Count,
    ask_price_per_share: Money,
) -> SellOrder {
    SellOrder {
        id: market::Id::new(),
        user_id,
        property_id,
        shares_for_sale,
        ask_price_per_share,
        status: market::Status::Open,
        created_at: DateTime::now().coerce(),
    }
}

impl Database<Transact> for Mock {
    type Ok = MockTx;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let working = self.0.lock().unwrap().clone();
        Ok(MockTx {
            base: Arc::clone(&self.0),
            working: Arc::new(Mutex::new(working)),
        })
    }
}

impl Database<Commit> for MockTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        *self.base.lock().unwrap() = self.working.lock().unwrap().clone();
        Ok(())
    }
}

impl Database<Select<By<Option<ShareClass>, property::Id>>> for MockTx {
    type Ok = Option<ShareClass>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ShareClass>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();
        Ok(self
            .working
            .lock()
            .unwrap()
            .share_classes
            .iter()
            .find(|c| c.property_id == property_id)
            .cloned())
    }
}

impl Database<Select<By<Option<Holding>, share::Owner>>> for MockTx {
    type Ok = Option<Holding>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Holding>, share::Owner>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner = by.into_inner();
        Ok(self
            .working
            .lock()
            .unwrap()
            .holdings
            .iter()
            .find(|h| {
                h.user_id == owner.user_id
                    && h.share_class_id == owner.share_class_id
            })
            .cloned())
    }
}

impl Database<Select<By<Option<SellOrder>, market::Id>>> for MockTx {
    type Ok = Option<SellOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SellOrder>, market::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .working
            .lock()
            .unwrap()
            .sell_orders
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }
}

impl Database<Perform<share::PoolWithdrawal>> for MockTx {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(withdrawal): Perform<share::PoolWithdrawal>,
    ) -> Result<Self::Ok, Self::Err> {
        let share::PoolWithdrawal {
            share_class_id,
            shares,
        } = withdrawal;
        let mut state = self.working.lock().unwrap();
        let Some(class) = state
            .share_classes
            .iter_mut()
            .find(|c| c.id == share_class_id && c.shares_available >= shares)
        else {
            return Ok(false);
        };
        class.shares_available -= shares;
        Ok(true)
    }
}

impl Database<Perform<share::HoldingWithdrawal>> for MockTx {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(withdrawal): Perform<share::HoldingWithdrawal>,
    ) -> Result<Self::Ok, Self::Err> {
        let share::HoldingWithdrawal { owner, shares } = withdrawal;
        let mut state = self.working.lock().unwrap();
        let Some(holding) = state.holdings.iter_mut().find(|h| {
            h.user_id == owner.user_id
                && h.share_class_id == owner.share_class_id
                && h.shares_owned >= shares
        }) else {
            return Ok(false);
        };
        holding.shares_owned -= shares;
        holding.updated_at = DateTime::now().coerce();
        Ok(true)
    }
}

impl Database<Perform<share::HoldingDeposit>> for MockTx {
    type Ok = Holding;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(deposit): Perform<share::HoldingDeposit>,
    ) -> Result<Self::Ok, Self::Err> {
        let share::HoldingDeposit { owner, shares } = deposit;
        let mut state = self.working.lock().unwrap();
        if let Some(holding) = state.holdings.iter_mut().find(|h| {
            h.user_id == owner.user_id
                && h.share_class_id == owner.share_class_id
        }) {
            holding.shares_owned += shares;
            holding.updated_at = DateTime::now().coerce();
            return Ok(holding.clone());
        }

        let holding = holding(owner.user_id, owner.share_class_id, shares);
        state.holdings.push(holding.clone());
        Ok(holding)
    }
}

impl Database<Perform<market::OrderFill>> for MockTx {
    type Ok = Option<SellOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(fill): Perform<market::OrderFill>,
    ) -> Result<Self::Ok, Self::Err> {
        let market::OrderFill { order_id, shares } = fill;
        let mut state = self.working.lock().unwrap();
        let Some(order) = state.sell_orders.iter_mut().find(|o| {
            o.id == order_id
                && o.status == market::Status::Open
                && o.shares_for_sale >= shares
        }) else {
            return Ok(None);
        };
        order.shares_for_sale -= shares;
        if order.shares_for_sale == 0 {
            order.status = market::Status::Filled;
        }
        Ok(Some(order.clone()))
    }
}

impl Database<Insert<SellOrder>> for MockTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<SellOrder>,
    ) -> Result<Self::Ok, Self::Err> {
        self.working.lock().unwrap().sell_orders.push(order);
        Ok(())
    }
}

impl Database<Insert<Trade>> for MockTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(trade): Insert<Trade>,
    ) -> Result<Self::Ok, Self::Err> {
        self.working.lock().unwrap().trades.push(trade);
        Ok(())
    }
}
