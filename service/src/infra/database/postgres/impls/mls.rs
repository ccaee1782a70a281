//! [`MlsListing`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    Money,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::MlsListing,
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Restores an [`MlsListing`] from the provided [`Row`].
fn from_row(row: &Row) -> MlsListing {
    MlsListing {
        external_id: row.get("external_id"),
        source: row.get("source_type"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        zip: row.get("zip"),
        list_price: Money {
            amount: row.get("list_price"),
            currency: row.get("list_price_currency"),
        },
        rent_estimate: row.get::<_, Option<Decimal>>("rent_estimate").map(
            |amount| Money {
                amount,
                currency: row.get("rent_currency"),
            },
        ),
        beds: row
            .get::<_, Option<i32>>("beds")
            .map(u16::try_from)
            .transpose()
            .expect("`beds` overflow"),
        baths: row
            .get::<_, Option<i32>>("baths")
            .map(u16::try_from)
            .transpose()
            .expect("`baths` overflow"),
        sqft: row
            .get::<_, Option<i64>>("sqft")
            .map(u32::try_from)
            .transpose()
            .expect("`sqft` overflow"),
        year_built: row
            .get::<_, Option<i32>>("year_built")
            .map(u16::try_from)
            .transpose()
            .expect("`year_built` overflow"),
        images: row.get("images"),
        thumb_url: row.get("thumb_url"),
        status: row.get("status"),
        attribution: row.get("attribution"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `mls_listings` table restored by [`from_row`].
const COLUMNS: &str = "\
    external_id, source_type, address, city, state, zip, \
    list_price, list_price_currency, rent_estimate, rent_currency, \
    beds, baths, sqft, year_built, \
    images, thumb_url, status, attribution, created_at";

impl<C> Database<Insert<Vec<MlsListing>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listings): Insert<Vec<MlsListing>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO mls_listings (\
                external_id, source_type, address, city, state, zip, \
                list_price, list_price_currency, \
                rent_estimate, rent_currency, \
                beds, baths, sqft, year_built, \
                images, thumb_url, status, attribution, created_at\
            ) \
            VALUES (\
                $1::VARCHAR, $2::INT2, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::NUMERIC, $8::INT2, \
                $9::NUMERIC, $10::INT2, \
                $11::INT4, $12::INT4, $13::INT8, $14::INT4, \
                $15::VARCHAR[], $16::VARCHAR, $17::VARCHAR, $18::VARCHAR, \
                $19::TIMESTAMPTZ\
            ) \
            ON CONFLICT (external_id) DO UPDATE \
            SET source_type = EXCLUDED.source_type, \
                address = EXCLUDED.address, \
                city = EXCLUDED.city, \
                state = EXCLUDED.state, \
                zip = EXCLUDED.zip, \
                list_price = EXCLUDED.list_price, \
                list_price_currency = EXCLUDED.list_price_currency, \
                rent_estimate = EXCLUDED.rent_estimate, \
                rent_currency = EXCLUDED.rent_currency, \
                beds = EXCLUDED.beds, \
                baths = EXCLUDED.baths, \
                sqft = EXCLUDED.sqft, \
                year_built = EXCLUDED.year_built, \
                images = EXCLUDED.images, \
                thumb_url = EXCLUDED.thumb_url, \
                status = EXCLUDED.status, \
                attribution = EXCLUDED.attribution, \
                created_at = EXCLUDED.created_at";
        for listing in listings {
            let MlsListing {
                external_id,
                source,
                address,
                city,
                state,
                zip,
                list_price,
                rent_estimate,
                beds,
                baths,
                sqft,
                year_built,
                images,
                thumb_url,
                status,
                attribution,
                created_at,
            } = listing;

            self.exec(
                SQL,
                &[
                    &external_id,
                    &source,
                    &address,
                    &city,
                    &state,
                    &zip,
                    &list_price.amount,
                    &list_price.currency,
                    &rent_estimate.map(|m| m.amount),
                    &rent_estimate.map(|m| m.currency),
                    &beds.map(i32::from),
                    &baths.map(i32::from),
                    &sqft.map(i64::from),
                    &year_built.map(i32::from),
                    &images,
                    &thumb_url,
                    &status,
                    &attribution,
                    &created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        }
        Ok(())
    }
}

impl<C> Database<Delete<By<Vec<MlsListing>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(_): Delete<By<Vec<MlsListing>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "DELETE FROM mls_listings";
        self.exec(SQL, &[]).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<MlsListing>, read::mls::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MlsListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MlsListing>, read::mls::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::mls::Selector {
            source,
            term,
            limit,
        } = by.into_inner();
        let limit = i32::from(limit);

        let rows = if let Some(term) = term.filter(|t| !t.is_empty()) {
            let pattern = FuzzPattern::new(&term);
            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM mls_listings \
                 WHERE source_type = $1::INT2 \
                   AND (LOWER(address) SIMILAR TO LOWER($3::VARCHAR) \
                        OR LOWER(city) SIMILAR TO LOWER($3::VARCHAR) \
                        OR LOWER(zip) SIMILAR TO LOWER($3::VARCHAR)) \
                 ORDER BY created_at DESC \
                 LIMIT $2::INT4",
            );
            self.query(&sql, &[&source, &limit, &pattern]).await
        } else {
            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM mls_listings \
                 WHERE source_type = $1::INT2 \
                 ORDER BY created_at DESC \
                 LIMIT $2::INT4",
            );
            self.query(&sql, &[&source, &limit]).await
        }
        .map_err(tracerr::wrap!())?;

        Ok(rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Select<By<Option<MlsListing>, read::mls::ExternalRef>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<MlsListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MlsListing>, read::mls::ExternalRef>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::mls::ExternalRef {
            source,
            external_id,
        } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM mls_listings \
             WHERE external_id = $1::VARCHAR \
               AND source_type = $2::INT2 \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&external_id, &source])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}
