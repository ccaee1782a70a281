//! [`RentalApplication`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select, Update},
    Money,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{rental, RentalApplication},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::property::from_row as property_from_row;

/// Restores a [`RentalApplication`] from the provided [`Row`] by
/// prefixed column names.
fn from_row(row: &Row) -> RentalApplication {
    RentalApplication {
        id: row.get("application_id"),
        property_id: row.get("property_id"),
        tenant_id: row.get("tenant_id"),
        status: row.get("application_status"),
        rent_amount: row.get::<_, Option<Decimal>>("rent_amount").map(
            |amount| Money {
                amount,
                currency: row.get("rent_currency"),
            },
        ),
        created_at: row.get("application_created_at"),
    }
}

/// Columns of the `rental_applications` table restored by [`from_row`].
const COLUMNS: &str = "\
    id AS application_id, property_id, tenant_id, \
    status AS application_status, \
    rent_amount, rent_currency, \
    created_at AS application_created_at";

impl<C> Database<Select<By<Option<RentalApplication>, rental::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RentalApplication>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentalApplication>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rental::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rental_applications \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Option<RentalApplication>, rental::Duplicate>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RentalApplication>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RentalApplication>, rental::Duplicate>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental::Duplicate {
            property_id,
            tenant_id,
        } = by.into_inner();
        let pending = rental::Status::Pending;
        let approved = rental::Status::Approved;

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rental_applications \
             WHERE property_id = $1::UUID \
               AND tenant_id = $2::UUID \
               AND status IN ($3::INT2, $4::INT2) \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&property_id, &tenant_id, &pending, &approved])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Insert<RentalApplication>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<RentalApplication>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(application): Insert<RentalApplication>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(application))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<RentalApplication>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(application): Update<RentalApplication>,
    ) -> Result<Self::Ok, Self::Err> {
        let RentalApplication {
            id,
            property_id,
            tenant_id,
            status,
            rent_amount,
            created_at,
        } = application;

        const SQL: &str = "\
            INSERT INTO rental_applications (\
                id, property_id, tenant_id, status, \
                rent_amount, rent_currency, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT2, \
                $5::NUMERIC, $6::INT2, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                tenant_id = EXCLUDED.tenant_id, \
                status = EXCLUDED.status, \
                rent_amount = EXCLUDED.rent_amount, \
                rent_currency = EXCLUDED.rent_currency, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &tenant_id,
                &status,
                &rent_amount.map(|m| m.amount),
                &rent_amount.map(|m| m.currency),
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::rental::PendingApplication>, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::rental::PendingApplication>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::rental::PendingApplication>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let pending = rental::Status::Pending;

        const SQL: &str = "\
            SELECT a.id AS application_id, a.property_id, a.tenant_id, \
                   a.status AS application_status, \
                   a.rent_amount, a.rent_currency, \
                   a.created_at AS application_created_at, \
                   u.email, u.phone, u.role, \
                   p.id, p.kind, p.address1, p.city, p.state, p.zip, \
                   p.status, p.square_feet, p.bedrooms, p.bathrooms, \
                   p.target_raise, p.target_raise_currency, \
                   p.est_monthly_rent, p.est_monthly_rent_currency, \
                   p.source_type, p.source_ref_id, p.source_attribution, \
                   p.imported_at, p.created_at \
            FROM rental_applications AS a \
            JOIN users AS u ON u.id = a.tenant_id \
            JOIN properties AS p ON p.id = a.property_id \
            WHERE a.status = $1::INT2 \
            ORDER BY a.created_at ASC";
        Ok(self
            .query(SQL, &[&pending])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let application = from_row(&row);
                read::rental::PendingApplication {
                    tenant: read::user::Contact {
                        id: application.tenant_id,
                        email: row.get("email"),
                        phone: row.get("phone"),
                        role: row.get("role"),
                    },
                    property: property_from_row(&row),
                    application,
                }
            })
            .collect())
    }
}
