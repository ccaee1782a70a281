//! [`User`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Select, Update};

use tracerr::Traced;

use crate::{
    domain::{
        user::{self, verification, Verification},
        User,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<user::Id, User>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[user::Id]>,
{
    type Ok = HashMap<user::Id, User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<user::Id, User>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[user::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, email, phone, \
                   password_hash, role, \
                   email_verified, created_at \
            FROM users \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    User {
                        id,
                        email: row.get("email"),
                        phone: row.get("phone"),
                        password_hash: row.get("password_hash"),
                        role: row.get("role"),
                        email_verified: row.get("email_verified"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<User>, user::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<user::Id, User>, [user::Id; 1]>>,
        Ok = HashMap<user::Id, User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::<HashMap<user::Id, User>, _>::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<User>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<User>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(user)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<User>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let User {
            id,
            email,
            phone,
            password_hash,
            role,
            email_verified,
            created_at,
        } = user;

        const SQL: &str = "\
            INSERT INTO users (\
                id, email, phone, \
                password_hash, role, \
                email_verified, created_at\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::INT2, \
                $6::BOOL, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                password_hash = EXCLUDED.password_hash, \
                role = EXCLUDED.role, \
                email_verified = EXCLUDED.email_verified, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &email,
                &phone,
                &password_hash,
                &role,
                &email_verified,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<'e, C> Database<Select<By<Option<User>, &'e user::Email>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM users \
            WHERE email = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&email])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let user_id = row.get("id");
        self.execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<'i, C> Database<Select<By<Option<User>, &'i user::Identifier>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'i user::Identifier>>,
    ) -> Result<Self::Ok, Self::Err> {
        let identifier = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM users \
            WHERE email = $1::VARCHAR \
               OR phone = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&identifier])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let user_id = row.get("id");
        self.execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Verification>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(verification): Insert<Verification>,
    ) -> Result<Self::Ok, Self::Err> {
        let Verification {
            user_id,
            token,
            expires_at,
        } = verification;

        const SQL: &str = "\
            INSERT INTO verifications (token, user_id, expires_at) \
            VALUES ($1::VARCHAR, $2::UUID, $3::TIMESTAMPTZ)";
        self.exec(SQL, &[&token, &user_id, &expires_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<'t, C> Database<Select<By<Option<Verification>, &'t verification::Token>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Verification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Verification>, &'t verification::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        const SQL: &str = "\
            SELECT token, user_id, expires_at \
            FROM verifications \
            WHERE token = $1::VARCHAR \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&token])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Verification {
                user_id: row.get("user_id"),
                token: row.get("token"),
                expires_at: row.get("expires_at"),
            }))
    }
}

impl<'t, C> Database<Delete<By<Verification, &'t verification::Token>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Verification, &'t verification::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let token: &verification::Token = by.into_inner();

        const SQL: &str = "\
            DELETE FROM verifications \
            WHERE token = $1::VARCHAR";
        self.exec(SQL, &[&token])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Verification, verification::ExpirationDateTime>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<
            By<Verification, verification::ExpirationDateTime>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let deadline: verification::ExpirationDateTime = by.into_inner();

        const SQL: &str = "\
            DELETE FROM verifications \
            WHERE expires_at < $1::TIMESTAMPTZ";
        self.exec(SQL, &[&deadline])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
