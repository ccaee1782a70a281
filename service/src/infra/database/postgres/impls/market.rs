//! [`SellOrder`]- and [`Trade`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Perform, Select},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{market, SellOrder, Trade},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::property::from_row as property_from_row;

/// Restores a [`SellOrder`] from the provided [`Row`] by prefixed column
/// names.
fn from_row(row: &Row) -> SellOrder {
    SellOrder {
        id: row.get("sell_order_id"),
        user_id: row.get("user_id"),
        property_id: row.get("property_id"),
        shares_for_sale: u32::try_from(row.get::<_, i64>("shares_for_sale"))
            .expect("`shares_for_sale` overflow"),
        ask_price_per_share: Money {
            amount: row.get("ask_price_per_share"),
            currency: row.get("ask_price_currency"),
        },
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<SellOrder>, market::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<SellOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SellOrder>, market::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: market::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id AS sell_order_id, user_id, property_id, \
                   shares_for_sale, \
                   ask_price_per_share, ask_price_currency, \
                   status, created_at \
            FROM sell_orders \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Insert<SellOrder>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<SellOrder>,
    ) -> Result<Self::Ok, Self::Err> {
        let SellOrder {
            id,
            user_id,
            property_id,
            shares_for_sale,
            ask_price_per_share,
            status,
            created_at,
        } = order;

        const SQL: &str = "\
            INSERT INTO sell_orders (\
                id, user_id, property_id, shares_for_sale, \
                ask_price_per_share, ask_price_currency, \
                status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT8, \
                $5::NUMERIC, $6::INT2, \
                $7::INT2, $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &property_id,
                &i64::from(shares_for_sale),
                &ask_price_per_share.amount,
                &ask_price_per_share.currency,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Perform<market::OrderFill>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<SellOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(fill): Perform<market::OrderFill>,
    ) -> Result<Self::Ok, Self::Err> {
        let market::OrderFill { order_id, shares } = fill;
        let open = market::Status::Open;
        let filled = market::Status::Filled;

        // Decrement and the `OPEN -> FILLED` transition happen in one
        // conditional statement: the returned row (or its absence) is
        // the sole success signal.
        const SQL: &str = "\
            UPDATE sell_orders \
            SET shares_for_sale = shares_for_sale - $2::INT8, \
                status = CASE \
                    WHEN shares_for_sale - $2::INT8 = 0 THEN $4::INT2 \
                    ELSE status \
                END \
            WHERE id = $1::UUID \
              AND status = $3::INT2 \
              AND shares_for_sale >= $2::INT8 \
            RETURNING id AS sell_order_id, user_id, property_id, \
                      shares_for_sale, \
                      ask_price_per_share, ask_price_currency, \
                      status, created_at";
        Ok(self
            .query_opt(
                SQL,
                &[&order_id, &i64::from(shares), &open, &filled],
            )
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Insert<Trade>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(trade): Insert<Trade>,
    ) -> Result<Self::Ok, Self::Err> {
        let Trade {
            id,
            sell_order_id,
            property_id,
            buyer_id,
            seller_id,
            shares_traded,
            price_per_share,
            executed_at,
        } = trade;

        const SQL: &str = "\
            INSERT INTO trades (\
                id, sell_order_id, property_id, \
                buyer_id, seller_id, shares_traded, \
                price_per_share, price_currency, executed_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::UUID, $5::UUID, $6::INT8, \
                $7::NUMERIC, $8::INT2, $9::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &sell_order_id,
                &property_id,
                &buyer_id,
                &seller_id,
                &i64::from(shares_traded),
                &price_per_share.amount,
                &price_per_share.currency,
                &executed_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::market::OpenOrder>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::market::OpenOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::market::OpenOrder>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let open = market::Status::Open;

        const SQL: &str = "\
            SELECT o.id AS sell_order_id, o.user_id, o.property_id, \
                   o.shares_for_sale, \
                   o.ask_price_per_share, o.ask_price_currency, \
                   o.status, o.created_at, \
                   u.email, u.phone, u.role, \
                   p.id, p.kind, p.address1, p.city, p.state, p.zip, \
                   p.status AS property_status, \
                   p.square_feet, p.bedrooms, p.bathrooms, \
                   p.target_raise, p.target_raise_currency, \
                   p.est_monthly_rent, p.est_monthly_rent_currency, \
                   p.source_type, p.source_ref_id, p.source_attribution, \
                   p.imported_at, p.created_at AS property_created_at \
            FROM sell_orders AS o \
            JOIN users AS u ON u.id = o.user_id \
            JOIN properties AS p ON p.id = o.property_id \
            WHERE o.status = $1::INT2 \
            ORDER BY o.created_at DESC";
        Ok(self
            .query(SQL, &[&open])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let order = from_row(&row);
                let mut property = property_from_row(&row);
                property.status = row.get("property_status");
                property.created_at = row.get("property_created_at");
                read::market::OpenOrder {
                    seller: read::user::Contact {
                        id: order.user_id,
                        email: row.get("email"),
                        phone: row.get("phone"),
                        role: row.get("role"),
                    },
                    property,
                    order,
                }
            })
            .collect())
    }
}
