//! Secondary marketplace endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/market/sell-orders` | `create_sell_order` |
//! | `GET` | `/market/sell-orders` | `list_sell_orders` |
//! | `POST` | `/market/buy` | `buy` |

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::Money;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{market, property, user},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Request of the `create_sell_order` handler.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOrderRequest {
    /// ID of the property whose shares are offered.
    pub property_id: Uuid,

    /// Number of shares offered for sale.
    pub shares_for_sale: u32,

    /// Asking price per share.
    pub ask_price_per_share: String,
}

/// Sell order as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOrder {
    /// ID of the sell order.
    pub id: market::Id,

    /// ID of the selling user.
    pub user_id: user::Id,

    /// ID of the property whose shares are sold.
    pub property_id: property::Id,

    /// Number of shares remaining for sale.
    pub shares_for_sale: u32,

    /// Asking price per share.
    pub ask_price_per_share: Money,

    /// Current status of the sell order.
    pub status: market::Status,

    /// When the sell order was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: market::CreationDateTime,
}

impl From<service::domain::SellOrder> for SellOrder {
    fn from(order: service::domain::SellOrder) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            property_id: order.property_id,
            shares_for_sale: order.shares_for_sale,
            ask_price_per_share: order.ask_price_per_share,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Open sell order with its property and seller, as exposed by the
/// public marketplace.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    /// The sell order itself.
    #[serde(flatten)]
    pub order: SellOrder,

    /// Property whose shares are sold.
    pub property: api::property::Property,

    /// Contact of the selling user.
    pub seller: api::Contact,
}

impl From<read::market::OpenOrder> for OpenOrder {
    fn from(open: read::market::OpenOrder) -> Self {
        Self {
            order: open.order.into(),
            property: open.property.into(),
            seller: open.seller.into(),
        }
    }
}

/// Request of the `buy` handler.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    /// ID of the sell order to buy from.
    pub sell_order_id: Uuid,

    /// Number of shares to buy.
    pub shares_to_buy: u32,
}

/// Trade as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// ID of the trade.
    pub id: market::TradeId,

    /// ID of the sell order the trade was executed against.
    pub sell_order_id: market::Id,

    /// ID of the traded property.
    pub property_id: property::Id,

    /// ID of the buying user.
    pub buyer_id: user::Id,

    /// ID of the selling user.
    pub seller_id: user::Id,

    /// Number of shares traded.
    pub shares_traded: u32,

    /// Price per share the trade was executed at.
    pub price_per_share: Money,

    /// When the trade was executed.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub executed_at: market::ExecutionDateTime,
}

impl From<service::domain::Trade> for Trade {
    fn from(trade: service::domain::Trade) -> Self {
        Self {
            id: trade.id,
            sell_order_id: trade.sell_order_id,
            property_id: trade.property_id,
            buyer_id: trade.buyer_id,
            seller_id: trade.seller_id,
            shares_traded: trade.shares_traded,
            price_per_share: trade.price_per_share,
            executed_at: trade.executed_at,
        }
    }
}

/// Response of the `buy` handler.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyResponse {
    /// Recorded trade.
    pub trade: Trade,

    /// Sell order state after the fill.
    pub order: SellOrder,

    /// Buyer's holding state after the fill.
    pub holding: api::invest::Holding,
}

/// Builds the [`Router`] of the marketplace endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route(
            "/market/sell-orders",
            post(create_sell_order).get(list_sell_orders),
        )
        .route("/market/buy", post(buy))
}

/// Lists shares of a property for sale.
async fn create_sell_order(
    context: Context,
    api::Input(request): api::Input<SellOrderRequest>,
) -> Result<(StatusCode, Json<SellOrder>), Error> {
    let session = context.current_session().await?;
    context.require_kyc_approved(&session).await?;

    let SellOrderRequest {
        property_id,
        shares_for_sale,
        ask_price_per_share,
    } = request;
    let ask_price_per_share =
        api::parse(&ask_price_per_share, "askPricePerShare")?;

    let order = context
        .service()
        .execute(command::CreateSellOrder {
            seller_id: session.user_id,
            property_id: property::Id::from(property_id),
            shares_for_sale,
            ask_price_per_share,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Lists all open sell orders.
async fn list_sell_orders(
    context: Context,
) -> Result<Json<Vec<OpenOrder>>, Error> {
    let orders = context
        .service()
        .execute(query::market::OpenOrders::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Buys shares from an open sell order.
async fn buy(
    context: Context,
    api::Input(request): api::Input<BuyRequest>,
) -> Result<(StatusCode, Json<BuyResponse>), Error> {
    let session = context
        .authorize(&[
            user::Role::Investor,
            user::Role::Admin,
            user::Role::Lister,
        ])
        .await?;
    context.require_kyc_approved(&session).await?;

    let BuyRequest {
        sell_order_id,
        shares_to_buy,
    } = request;

    let output = context
        .service()
        .execute(command::ExecuteTrade {
            buyer_id: session.user_id,
            sell_order_id: market::Id::from(sell_order_id),
            shares: shares_to_buy,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        Json(BuyResponse {
            trade: output.trade.into(),
            order: output.order.into(),
            holding: output.holding.into(),
        }),
    ))
}

impl AsError for command::create_sell_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InsufficientShares(_) => {
                Some(MarketError::InsufficientShares.into())
            }
            Self::PropertyNotFound(_) => {
                Some(MarketError::PropertyNotFound.into())
            }
            Self::ZeroShares => Some(Error::validation(
                &"`sharesForSale` must be a positive integer",
            )),
        }
    }
}

impl AsError for command::execute_trade::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InsufficientOrderShares(_) => {
                Some(MarketError::InsufficientOrderShares.into())
            }
            Self::OrderClosed(_) => Some(MarketError::OrderClosed.into()),
            Self::OrderNotFound(_) => Some(MarketError::OrderNotFound.into()),
            Self::PropertyNotFound(_) => {
                Some(MarketError::PropertyNotFound.into())
            }
            Self::SellerInsufficient(_) => {
                Some(MarketError::SellerInsufficient.into())
            }
            Self::ZeroShares => Some(Error::validation(
                &"`sharesToBuy` must be a positive integer",
            )),
        }
    }
}

define_error! {
    enum MarketError {
        #[code = "INSUFFICIENT_ORDER_SHARES"]
        #[status = BAD_REQUEST]
        #[message = "Not enough shares in sell order"]
        InsufficientOrderShares,

        #[code = "INSUFFICIENT_SHARES"]
        #[status = BAD_REQUEST]
        #[message = "Not enough shares owned"]
        InsufficientShares,

        #[code = "ORDER_CLOSED"]
        #[status = BAD_REQUEST]
        #[message = "Sell order is not open"]
        OrderClosed,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Sell order not found"]
        OrderNotFound,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        PropertyNotFound,

        #[code = "SELLER_INSUFFICIENT"]
        #[status = BAD_REQUEST]
        #[message = "Seller has insufficient shares"]
        SellerInsufficient,
    }
}
