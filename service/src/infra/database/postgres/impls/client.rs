//! [`Client`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        client::{self, representative, Representative},
        Client,
    },
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

impl<C, IDs> Database<Select<By<HashMap<client::Id, Client>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[client::Id]>,
{
    type Ok = HashMap<client::Id, Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<client::Id, Client>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[client::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, name, rut, \
                   address, phone, email, \
                   created_at, deleted_at \
            FROM clients \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
                  AND deleted_at IS NULL \
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
                    Client {
                        id,
                        name: row.get("name"),
                        rut: row.get("rut"),
                        address: row.get("address"),
                        phone: row.get("phone"),
                        email: row.get("email"),
                        created_at: row.get("created_at"),
                        deleted_at: row.get("deleted_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Client>, client::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<client::Id, Client>, [client::Id; 1]>>,
        Ok = HashMap<client::Id, Client>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Client>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Client>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(client)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Client>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(client): Update<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        let Client {
            id,
            name,
            rut,
            address,
            phone,
            email,
            created_at,
            deleted_at,
        } = client;

        const SQL: &str = "\
            INSERT INTO clients (\
                id, name, rut, \
                address, phone, email, \
                created_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                rut = EXCLUDED.rut, \
                address = EXCLUDED.address, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                created_at = EXCLUDED.created_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &rut,
                &address,
                &phone,
                &email,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Client, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: client::Id = by.into_inner();

        // The no-op update takes the row lock even if the row exists.
        const SQL: &str = "\
            INSERT INTO clients_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::client::list::Page, read::client::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::client::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::client::list::Page, read::client::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::client::list::Selector {
            arguments,
            filter: read::client::list::Filter { name },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let name_idx = name.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let name_pattern = name.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let name_pattern_idx = name_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM clients \
             WHERE deleted_at IS NULL \
                   {cursor} \
                   {name_filtering} \
             ORDER BY {name_ordering} \
                      id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            name_filtering =
                name_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            name_ordering = name_idx.into_iter().format_with("", |idx, f| {
                let order = arguments.kind().order().sql();
                f(&format_args!(
                    "LEVENSHTEIN(name, ${idx}::VARCHAR, 1, 1, 0) {order},"
                ))
            })
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::client::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::client::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::client::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::client::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM clients \
            WHERE deleted_at IS NULL";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

/// Reads a [`Representative`] out of the provided [`Row`].
fn representative(row: &Row) -> Representative {
    Representative {
        id: row.get("id"),
        client_id: row.get("client_id"),
        name: row.get("name"),
        position: row.get("position"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Representative>, representative::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Representative>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Representative>, representative::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: representative::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, client_id, name, position, created_at \
            FROM client_representatives \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(representative))
    }
}

impl<C> Database<Select<By<Vec<Representative>, client::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Representative>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Representative>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let client_id: client::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, client_id, name, position, created_at \
            FROM client_representatives \
            WHERE client_id = $1::UUID \
            ORDER BY position, name, id";
        Ok(self
            .query(SQL, &[&client_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(representative)
            .collect())
    }
}

impl<C> Database<Insert<Representative>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<Representative>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(representative): Insert<Representative>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(representative))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Representative>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(representative): Update<Representative>,
    ) -> Result<Self::Ok, Self::Err> {
        let Representative {
            id,
            client_id,
            name,
            position,
            created_at,
        } = representative;

        const SQL: &str = "\
            INSERT INTO client_representatives (\
                id, client_id, name, position, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::INT4, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET client_id = EXCLUDED.client_id, \
                name = EXCLUDED.name, \
                position = EXCLUDED.position, \
                created_at = EXCLUDED.created_at";
        self.exec(SQL, &[&id, &client_id, &name, &position, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Representative, representative::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Representative, representative::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: representative::Id = by.into_inner();

        // `Quote`s keep the backup of the name.
        const SQL: &str = "\
            DELETE FROM client_representatives \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
