//! [`ShareClass`]- and [`Holding`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Perform, Select},
    DateTime, Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, share, user, Holding, ShareClass},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::property::from_row as property_from_row;

/// Restores a [`ShareClass`] from the provided [`Row`] by prefixed
/// column names.
fn share_class_from_row(row: &Row) -> ShareClass {
    ShareClass {
        id: row.get("share_class_id"),
        property_id: row.get("property_id"),
        total_shares: u32::try_from(row.get::<_, i64>("total_shares"))
            .expect("`total_shares` overflow"),
        shares_available: u32::try_from(row.get::<_, i64>("shares_available"))
            .expect("`shares_available` overflow"),
        reference_price_per_share: Money {
            amount: row.get("reference_price_per_share"),
            currency: row.get("reference_price_currency"),
        },
    }
}

/// Restores a [`Holding`] from the provided [`Row`].
fn holding_from_row(row: &Row) -> Holding {
    Holding {
        id: row.get("id"),
        user_id: row.get("user_id"),
        share_class_id: row.get("share_class_id"),
        shares_owned: u32::try_from(row.get::<_, i64>("shares_owned"))
            .expect("`shares_owned` overflow"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<ShareClass>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<ShareClass>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ShareClass>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id AS share_class_id, property_id, \
                   total_shares, shares_available, \
                   reference_price_per_share, reference_price_currency \
            FROM share_classes \
            WHERE property_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| share_class_from_row(&row)))
    }
}

impl<C, IDs> Database<Select<By<HashMap<property::Id, ShareClass>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, ShareClass>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, ShareClass>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id AS share_class_id, property_id, \
                   total_shares, shares_available, \
                   reference_price_per_share, reference_price_currency \
            FROM share_classes \
            WHERE property_id IN (SELECT unnest($1::UUID[]))";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let share_class = share_class_from_row(&row);
                (share_class.property_id, share_class)
            })
            .collect())
    }
}

impl<C> Database<Insert<ShareClass>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(share_class): Insert<ShareClass>,
    ) -> Result<Self::Ok, Self::Err> {
        let ShareClass {
            id,
            property_id,
            total_shares,
            shares_available,
            reference_price_per_share,
        } = share_class;

        const SQL: &str = "\
            INSERT INTO share_classes (\
                id, property_id, \
                total_shares, shares_available, \
                reference_price_per_share, reference_price_currency\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::INT8, $4::INT8, \
                $5::NUMERIC, $6::INT2\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &i64::from(total_shares),
                &i64::from(shares_available),
                &reference_price_per_share.amount,
                &reference_price_per_share.currency,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Perform<share::PoolWithdrawal>> for Postgres<C>
where
    C: Connection,
{
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

        // The `shares_available >= $2` predicate makes the decrement
        // conditional: zero affected rows means the pool is short.
        const SQL: &str = "\
            UPDATE share_classes \
            SET shares_available = shares_available - $2::INT8 \
            WHERE id = $1::UUID \
              AND shares_available >= $2::INT8";
        self.exec(SQL, &[&share_class_id, &i64::from(shares)])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

impl<C> Database<Select<By<Option<Holding>, share::Owner>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Holding>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Holding>, share::Owner>>,
    ) -> Result<Self::Ok, Self::Err> {
        let share::Owner {
            user_id,
            share_class_id,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, share_class_id, shares_owned, updated_at \
            FROM holdings \
            WHERE user_id = $1::UUID \
              AND share_class_id = $2::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&user_id, &share_class_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| holding_from_row(&row)))
    }
}

impl<C> Database<Perform<share::HoldingWithdrawal>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(withdrawal): Perform<share::HoldingWithdrawal>,
    ) -> Result<Self::Ok, Self::Err> {
        let share::HoldingWithdrawal { owner, shares } = withdrawal;
        let updated_at: share::ModificationDateTime = DateTime::now().coerce();

        // The `shares_owned >= $3` predicate makes the decrement
        // conditional: zero affected rows means the holder is short.
        const SQL: &str = "\
            UPDATE holdings \
            SET shares_owned = shares_owned - $3::INT8, \
                updated_at = $4::TIMESTAMPTZ \
            WHERE user_id = $1::UUID \
              AND share_class_id = $2::UUID \
              AND shares_owned >= $3::INT8";
        self.exec(
            SQL,
            &[
                &owner.user_id,
                &owner.share_class_id,
                &i64::from(shares),
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|affected| affected > 0)
    }
}

impl<C> Database<Perform<share::HoldingDeposit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Holding;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(deposit): Perform<share::HoldingDeposit>,
    ) -> Result<Self::Ok, Self::Err> {
        let share::HoldingDeposit { owner, shares } = deposit;
        let id = share::HoldingId::new();
        let updated_at: share::ModificationDateTime = DateTime::now().coerce();

        const SQL: &str = "\
            INSERT INTO holdings (\
                id, user_id, share_class_id, shares_owned, updated_at\
            ) \
            VALUES ($1::UUID, $2::UUID, $3::UUID, $4::INT8, $5::TIMESTAMPTZ) \
            ON CONFLICT (user_id, share_class_id) DO UPDATE \
            SET shares_owned = holdings.shares_owned + EXCLUDED.shares_owned, \
                updated_at = EXCLUDED.updated_at \
            RETURNING id, user_id, share_class_id, shares_owned, updated_at";
        let row = self
            .query_opt(
                SQL,
                &[
                    &id,
                    &owner.user_id,
                    &owner.share_class_id,
                    &i64::from(shares),
                    &updated_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .expect("`RETURNING` always yields a row");
        Ok(holding_from_row(&row))
    }
}

impl<C> Database<Select<By<Vec<read::portfolio::Position>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::portfolio::Position>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::portfolio::Position>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT h.id AS holding_id, h.user_id, h.shares_owned, \
                   h.updated_at, \
                   s.id AS share_class_id, s.property_id, \
                   s.total_shares, s.shares_available, \
                   s.reference_price_per_share, s.reference_price_currency, \
                   p.id, p.kind, p.address1, p.city, p.state, p.zip, \
                   p.status, p.square_feet, p.bedrooms, p.bathrooms, \
                   p.target_raise, p.target_raise_currency, \
                   p.est_monthly_rent, p.est_monthly_rent_currency, \
                   p.source_type, p.source_ref_id, p.source_attribution, \
                   p.imported_at, p.created_at \
            FROM holdings AS h \
            JOIN share_classes AS s ON s.id = h.share_class_id \
            JOIN properties AS p ON p.id = s.property_id \
            WHERE h.user_id = $1::UUID \
            ORDER BY h.updated_at DESC";
        Ok(self
            .query(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let share_class = share_class_from_row(&row);
                read::portfolio::Position {
                    holding: Holding {
                        id: row.get("holding_id"),
                        user_id: row.get("user_id"),
                        share_class_id: share_class.id,
                        shares_owned: u32::try_from(
                            row.get::<_, i64>("shares_owned"),
                        )
                        .expect("`shares_owned` overflow"),
                        updated_at: row.get("updated_at"),
                    },
                    property: property_from_row(&row),
                    share_class,
                }
            })
            .collect())
    }
}
