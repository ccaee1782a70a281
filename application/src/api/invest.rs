//! Primary-issuance investment endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `POST` | `/invest/buy` | `buy` |
//! | `GET` | `/portfolio` | `portfolio` |

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{property, share, user},
    query::{self, Query as _},
    read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Request of the `buy` handler.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    /// ID of the property whose shares are purchased.
    pub property_id: Uuid,

    /// Number of shares to purchase.
    pub shares_to_buy: u32,
}

/// Holding of a user as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// ID of the holding.
    pub id: share::HoldingId,

    /// ID of the share class the holding belongs to.
    pub share_class_id: share::Id,

    /// Number of shares currently owned.
    pub shares_owned: u32,

    /// When the holding was last modified.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub updated_at: share::ModificationDateTime,
}

impl From<service::domain::Holding> for Holding {
    fn from(holding: service::domain::Holding) -> Self {
        Self {
            id: holding.id,
            share_class_id: holding.share_class_id,
            shares_owned: holding.shares_owned,
            updated_at: holding.updated_at,
        }
    }
}

/// Portfolio position of a user as exposed by the API.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// ID of the holding.
    pub id: share::HoldingId,

    /// Number of shares currently owned.
    pub shares_owned: u32,

    /// Owned fraction of the whole share class.
    pub percent: f64,

    /// When the holding was last modified.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub updated_at: share::ModificationDateTime,

    /// Property the shares belong to.
    pub property: api::property::Property,

    /// Share structure of the property.
    pub share_class: api::property::ShareClass,
}

impl From<read::portfolio::Position> for Position {
    fn from(position: read::portfolio::Position) -> Self {
        let read::portfolio::Position {
            holding,
            property,
            share_class,
        } = position;
        let percent = if share_class.total_shares > 0 {
            f64::from(holding.shares_owned)
                / f64::from(share_class.total_shares)
        } else {
            0.0
        };
        Self {
            id: holding.id,
            shares_owned: holding.shares_owned,
            percent,
            updated_at: holding.updated_at,
            property: property.into(),
            share_class: share_class.into(),
        }
    }
}

/// Builds the [`Router`] of the investment endpoints.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/invest/buy", post(buy))
        .route("/portfolio", get(portfolio))
}

/// Purchases shares from the unissued pool of a property.
async fn buy(
    context: Context,
    api::Input(request): api::Input<BuyRequest>,
) -> Result<(StatusCode, Json<Holding>), Error> {
    let session = context
        .authorize(&[
            user::Role::Investor,
            user::Role::Admin,
            user::Role::Lister,
        ])
        .await?;
    context.require_kyc_approved(&session).await?;

    let BuyRequest {
        property_id,
        shares_to_buy,
    } = request;

    let holding = context
        .service()
        .execute(command::PurchaseShares {
            property_id: property::Id::from(property_id),
            buyer_id: session.user_id,
            shares: shares_to_buy,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(holding.into())))
}

/// Returns the portfolio of the authenticated user.
async fn portfolio(context: Context) -> Result<Json<Vec<Position>>, Error> {
    let session = context.current_session().await?;

    let positions = context
        .service()
        .execute(query::portfolio::OfUser::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(positions.into_iter().map(Into::into).collect()))
}

impl AsError for command::purchase_shares::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InsufficientShares(_) => {
                Some(InvestError::InsufficientShares.into())
            }
            Self::PropertyNotFound(_) => {
                Some(InvestError::PropertyNotFound.into())
            }
            Self::ZeroShares => Some(Error::validation(
                &"`sharesToBuy` must be a positive integer",
            )),
        }
    }
}

define_error! {
    enum InvestError {
        #[code = "INSUFFICIENT_SHARES"]
        #[status = BAD_REQUEST]
        #[message = "Not enough shares available"]
        InsufficientShares,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        PropertyNotFound,
    }
}
