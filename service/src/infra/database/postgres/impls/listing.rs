//! [`Listing`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{listing, property, user, Listing, Property, PropertyImage, ShareClass},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Restores a [`Listing`] from the provided [`Row`].
fn from_row(row: &Row) -> Listing {
    Listing {
        id: row.get("id"),
        property_id: row.get("property_id"),
        lister_id: row.get("lister_id"),
        asking_price: Money {
            amount: row.get("asking_price"),
            currency: row.get("asking_price_currency"),
        },
        bonus_percent: row.get("bonus_percent"),
        status: row.get("status"),
        posted_at: row.get("posted_at"),
    }
}

impl<C> Database<Select<By<Option<Listing>, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, lister_id, \
                   asking_price, asking_price_currency, \
                   bonus_percent, status, posted_at \
            FROM listings \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Insert<Listing>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(listing))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Listing>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let Listing {
            id,
            property_id,
            lister_id,
            asking_price,
            bonus_percent,
            status,
            posted_at,
        } = listing;

        const SQL: &str = "\
            INSERT INTO listings (\
                id, property_id, lister_id, \
                asking_price, asking_price_currency, \
                bonus_percent, status, posted_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::NUMERIC, $5::INT2, \
                $6::NUMERIC, $7::INT2, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                lister_id = EXCLUDED.lister_id, \
                asking_price = EXCLUDED.asking_price, \
                asking_price_currency = EXCLUDED.asking_price_currency, \
                bonus_percent = EXCLUDED.bonus_percent, \
                status = EXCLUDED.status, \
                posted_at = EXCLUDED.posted_at";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &lister_id,
                &asking_price.amount,
                &asking_price.currency,
                &bonus_percent,
                &status,
                &posted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C, IDs>
    Database<
        Select<By<HashMap<property::Id, Vec<read::listing::WithLister>>, IDs>>,
    > for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[property::Id]>,
{
    type Ok = HashMap<property::Id, Vec<read::listing::WithLister>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<property::Id, Vec<read::listing::WithLister>>, IDs>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[property::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT l.id, l.property_id, l.lister_id, \
                   l.asking_price, l.asking_price_currency, \
                   l.bonus_percent, l.status, l.posted_at, \
                   u.email, u.phone, u.role \
            FROM listings AS l \
            JOIN users AS u ON u.id = l.lister_id \
            WHERE l.property_id IN (SELECT unnest($1::UUID[])) \
            ORDER BY l.posted_at DESC";
        let mut listings =
            HashMap::<property::Id, Vec<read::listing::WithLister>>::new();
        for row in self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            let listing = from_row(&row);
            let lister = read::user::Contact {
                id: listing.lister_id,
                email: row.get("email"),
                phone: row.get("phone"),
                role: row.get("role"),
            };
            listings
                .entry(listing.property_id)
                .or_default()
                .push(read::listing::WithLister { listing, lister });
        }
        Ok(listings)
    }
}

impl<C> Database<Select<By<Vec<read::listing::Owned>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
            Select<By<HashMap<property::Id, Property>, Vec<property::Id>>>,
            Ok = HashMap<property::Id, Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<property::Id, Vec<PropertyImage>>,
                    Vec<property::Id>,
                >,
            >,
            Ok = HashMap<property::Id, Vec<PropertyImage>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<property::Id, ShareClass>, Vec<property::Id>>>,
            Ok = HashMap<property::Id, ShareClass>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<read::listing::Owned>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::listing::Owned>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let lister_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, lister_id, \
                   asking_price, asking_price_currency, \
                   bonus_percent, status, posted_at \
            FROM listings \
            WHERE lister_id = $1::UUID \
            ORDER BY posted_at DESC";
        let listings = self
            .query(SQL, &[&lister_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Vec<_>>();
        let ids = listings.iter().map(|l| l.property_id).collect::<Vec<_>>();

        let mut properties = self
            .execute(Select(
                By::<HashMap<property::Id, Property>, _>::new(ids.clone()),
            ))
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

        Ok(listings
            .into_iter()
            .filter_map(|listing| {
                let property = properties.remove(&listing.property_id)?;
                Some(read::listing::Owned {
                    images: images
                        .remove(&listing.property_id)
                        .unwrap_or_default(),
                    share_class: share_classes.remove(&listing.property_id),
                    property,
                    listing,
                })
            })
            .collect())
    }
}
