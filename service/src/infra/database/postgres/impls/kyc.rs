//! [`KycProfile`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::user::{self, kyc, KycProfile},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<KycProfile>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<KycProfile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<KycProfile>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT user_id, status, data, submitted_at \
            FROM kyc_profiles \
            WHERE user_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| KycProfile {
                user_id: row.get("user_id"),
                status: row.get("status"),
                data: row.get("data"),
                submitted_at: row.get("submitted_at"),
            }))
    }
}

impl<C> Database<Insert<KycProfile>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<KycProfile>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(profile): Insert<KycProfile>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(profile))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<KycProfile>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(profile): Update<KycProfile>,
    ) -> Result<Self::Ok, Self::Err> {
        let KycProfile {
            user_id,
            status,
            data,
            submitted_at,
        } = profile;

        const SQL: &str = "\
            INSERT INTO kyc_profiles (user_id, status, data, submitted_at) \
            VALUES ($1::UUID, $2::INT2, $3::JSONB, $4::TIMESTAMPTZ) \
            ON CONFLICT (user_id) DO UPDATE \
            SET status = EXCLUDED.status, \
                data = EXCLUDED.data, \
                submitted_at = EXCLUDED.submitted_at";
        self.exec(SQL, &[&user_id, &status, &data, &submitted_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::kyc::Submission>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::kyc::Submission>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::kyc::Submission>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let pending = kyc::Status::Pending;

        const SQL: &str = "\
            SELECT p.user_id, p.status, p.data, p.submitted_at, \
                   u.email, u.phone, u.role \
            FROM kyc_profiles AS p \
            JOIN users AS u ON u.id = p.user_id \
            WHERE p.status = $1::INT2 \
            ORDER BY p.submitted_at ASC";
        Ok(self
            .query(SQL, &[&pending])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let user_id = row.get("user_id");
                read::kyc::Submission {
                    profile: KycProfile {
                        user_id,
                        status: row.get("status"),
                        data: row.get("data"),
                        submitted_at: row.get("submitted_at"),
                    },
                    user: read::user::Contact {
                        id: user_id,
                        email: row.get("email"),
                        phone: row.get("phone"),
                        role: row.get("role"),
                    },
                }
            })
            .collect())
    }
}
