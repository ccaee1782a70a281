//! [`Property`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{operations::{By, Delete, Insert, Select, Update}, Money};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, Property, PropertyImage, ShareClass},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Restores a [`Property`] from the provided [`Row`].
pub(super) fn from_row(row: &Row) -> Property {
    let provenance = match (
        row.get::<_, Option<_>>("source_type"),
        row.get::<_, Option<_>>("source_ref_id"),
        row.get::<_, Option<_>>("imported_at"),
    ) {
        (Some(source), Some(external_id), Some(imported_at)) => {
            Some(property::Provenance {
                source,
                external_id,
                attribution: row.get("source_attribution"),
                imported_at,
            })
        }
        _ => None,
    };

    Property {
        id: row.get("id"),
        kind: row.get("kind"),
        address1: row.get("address1"),
        city: row.get("city"),
        state: row.get("state"),
        zip: row.get("zip"),
        status: row.get("status"),
        square_feet: row
            .get::<_, Option<i64>>("square_feet")
            .map(u32::try_from)
            .transpose()
            .expect("`square_feet` overflow"),
        bedrooms: row
            .get::<_, Option<i32>>("bedrooms")
            .map(u16::try_from)
            .transpose()
            .expect("`bedrooms` overflow"),
        bathrooms: row
            .get::<_, Option<i32>>("bathrooms")
            .map(u16::try_from)
            .transpose()
            .expect("`bathrooms` overflow"),
        target_raise: row.get::<_, Option<Decimal>>("target_raise").map(
            |amount| Money {
                amount,
                currency: row.get("target_raise_currency"),
            },
        ),
        est_monthly_rent: row
            .get::<_, Option<Decimal>>("est_monthly_rent")
            .map(|amount| Money {
                amount,
                currency: row.get("est_monthly_rent_currency"),
            }),
        provenance,
        created_at: row.get("created_at"),
    }
}

/// Columns of the `properties` table restored by [`from_row`].
const COLUMNS: &str = "\
    id, kind, address1, city, state, zip, status, \
    square_feet, bedrooms, bathrooms, \
    target_raise, target_raise_currency, \
    est_monthly_rent, est_monthly_rent_currency, \
    source_type, source_ref_id, source_attribution, imported_at, \
    created_at";

impl<C, IDs> Database<Select<By<HashMap<property::Id, Property>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<property::Id, Property>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM properties \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let property = from_row(&row);
                (property.id, property)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<property::Id, Property>, [property::Id; 1]>>,
        Ok = HashMap<property::Id, Property>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(
                By::<HashMap<property::Id, Property>, _>::new([id]),
            ))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Property>, read::property::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Property>, read::property::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::property::Selector { status } = by.into_inner();

        let rows = if let Some(status) = status {
            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM properties \
                 WHERE status = $1::INT2 \
                 ORDER BY created_at DESC",
            );
            self.query(&sql, &[&status]).await
        } else {
            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM properties \
                 ORDER BY created_at DESC",
            );
            self.query(&sql, &[]).await
        }
        .map_err(tracerr::wrap!())?;

        Ok(rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(property))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            kind,
            address1,
            city,
            state,
            zip,
            status,
            square_feet,
            bedrooms,
            bathrooms,
            target_raise,
            est_monthly_rent,
            provenance,
            created_at,
        } = property;

        let square_feet = square_feet.map(i64::from);
        let bedrooms = bedrooms.map(i32::from);
        let bathrooms = bathrooms.map(i32::from);
        let (source_type, source_ref_id, source_attribution, imported_at) =
            provenance.map_or((None, None, None, None), |p| {
                (
                    Some(p.source),
                    Some(p.external_id),
                    p.attribution,
                    Some(p.imported_at),
                )
            });

        const SQL: &str = "\
            INSERT INTO properties (\
                id, kind, address1, city, state, zip, status, \
                square_feet, bedrooms, bathrooms, \
                target_raise, target_raise_currency, \
                est_monthly_rent, est_monthly_rent_currency, \
                source_type, source_ref_id, source_attribution, \
                imported_at, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::INT2, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, \
                $8::INT8, $9::INT4, $10::INT4, \
                $11::NUMERIC, $12::INT2, \
                $13::NUMERIC, $14::INT2, \
                $15::INT2, $16::VARCHAR, $17::VARCHAR, \
                $18::TIMESTAMPTZ, $19::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET kind = EXCLUDED.kind, \
                address1 = EXCLUDED.address1, \
                city = EXCLUDED.city, \
                state = EXCLUDED.state, \
                zip = EXCLUDED.zip, \
                status = EXCLUDED.status, \
                square_feet = EXCLUDED.square_feet, \
                bedrooms = EXCLUDED.bedrooms, \
                bathrooms = EXCLUDED.bathrooms, \
                target_raise = EXCLUDED.target_raise, \
                target_raise_currency = EXCLUDED.target_raise_currency, \
                est_monthly_rent = EXCLUDED.est_monthly_rent, \
                est_monthly_rent_currency = \
                    EXCLUDED.est_monthly_rent_currency, \
                source_type = EXCLUDED.source_type, \
                source_ref_id = EXCLUDED.source_ref_id, \
                source_attribution = EXCLUDED.source_attribution, \
                imported_at = EXCLUDED.imported_at, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &kind,
                &address1,
                &city,
                &state,
                &zip,
                &status,
                &square_feet,
                &bedrooms,
                &bathrooms,
                &target_raise.map(|m| m.amount),
                &target_raise.map(|m| m.currency),
                &est_monthly_rent.map(|m| m.amount),
                &est_monthly_rent.map(|m| m.currency),
                &source_type,
                &source_ref_id,
                &source_attribution,
                &imported_at,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Property, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Property, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: property::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM properties \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<Vec<PropertyImage>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(images): Insert<Vec<PropertyImage>>,
    ) -> Result<Self::Ok, Self::Err> {
        if images.is_empty() {
            return Ok(());
        }

        let mut property_ids = Vec::with_capacity(images.len());
        let mut urls = Vec::with_capacity(images.len());
        let mut sort_orders = Vec::with_capacity(images.len());
        for image in images {
            property_ids.push(image.property_id);
            urls.push(image.url);
            sort_orders.push(i32::from(image.sort_order));
        }

        const SQL: &str = "\
            INSERT INTO property_images (property_id, url, sort_order) \
            SELECT * \
            FROM unnest($1::UUID[], $2::VARCHAR[], $3::INT4[])";
        self.exec(SQL, &[&property_ids, &urls, &sort_orders])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C, IDs>
    Database<Select<By<HashMap<property::Id, Vec<PropertyImage>>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Vec<PropertyImage>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<property::Id, Vec<PropertyImage>>, IDs>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT property_id, url, sort_order \
            FROM property_images \
            WHERE property_id IN (SELECT unnest($1::UUID[])) \
            ORDER BY sort_order ASC";
        let mut images = HashMap::<property::Id, Vec<_>>::new();
        for row in self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            let image = PropertyImage {
                property_id: row.get("property_id"),
                url: row.get("url"),
                sort_order: u16::try_from(row.get::<_, i32>("sort_order"))
                    .expect("`sort_order` overflow"),
            };
            images.entry(image.property_id).or_default().push(image);
        }
        Ok(images)
    }
}

impl<C> Database<Select<By<Vec<read::property::Summary>, read::property::Selector>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
            Select<By<Vec<Property>, read::property::Selector>>,
            Ok = Vec<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<property::Id, Vec<read::listing::WithLister>>,
                    Vec<property::Id>,
                >,
            >,
            Ok = HashMap<property::Id, Vec<read::listing::WithLister>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<HashMap<property::Id, Vec<PropertyImage>>, Vec<property::Id>>,
            >,
            Ok = HashMap<property::Id, Vec<PropertyImage>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<property::Id, ShareClass>, Vec<property::Id>>>,
            Ok = HashMap<property::Id, ShareClass>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<read::property::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::property::Summary>, read::property::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let selector = by.into_inner();

        let properties = self
            .execute(Select(By::<Vec<Property>, _>::new(selector)))
            .await
            .map_err(tracerr::wrap!())?;
        let ids = properties.iter().map(|p| p.id).collect::<Vec<_>>();

        let mut listings = self
            .execute(Select(By::<
                HashMap<property::Id, Vec<read::listing::WithLister>>,
                _,
            >::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        let mut images = self
            .execute(Select(By::<
                HashMap<property::Id, Vec<PropertyImage>>,
                _,
            >::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        let mut share_classes = self
            .execute(Select(
                By::<HashMap<property::Id, ShareClass>, _>::new(ids),
            ))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(properties
            .into_iter()
            .map(|property| read::property::Summary {
                listings: listings.remove(&property.id).unwrap_or_default(),
                images: images.remove(&property.id).unwrap_or_default(),
                share_class: share_classes.remove(&property.id),
                property,
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<read::property::Summary>, property::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<property::Id, Vec<read::listing::WithLister>>,
                    [property::Id; 1],
                >,
            >,
            Ok = HashMap<property::Id, Vec<read::listing::WithLister>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<property::Id, Vec<PropertyImage>>,
                    [property::Id; 1],
                >,
            >,
            Ok = HashMap<property::Id, Vec<PropertyImage>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<property::Id, ShareClass>, [property::Id; 1]>>,
            Ok = HashMap<property::Id, ShareClass>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<read::property::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::property::Summary>, property::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(property) = self
            .execute(Select(By::<Option<Property>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let mut listings = self
            .execute(Select(By::<
                HashMap<property::Id, Vec<read::listing::WithLister>>,
                _,
            >::new([id])))
            .await
            .map_err(tracerr::wrap!())?;
        let mut images = self
            .execute(Select(By::<
                HashMap<property::Id, Vec<PropertyImage>>,
                _,
            >::new([id])))
            .await
            .map_err(tracerr::wrap!())?;
        let mut share_classes = self
            .execute(Select(
                By::<HashMap<property::Id, ShareClass>, _>::new([id]),
            ))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(read::property::Summary {
            listings: listings.remove(&id).unwrap_or_default(),
            images: images.remove(&id).unwrap_or_default(),
            share_class: share_classes.remove(&id),
            property,
        }))
    }
}
