//! [`Job`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{job, quote, user, Job},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `jobs` table to read a [`Job`] from.
const COLUMNS: &str = "\
    id, quote_id, item_id, employee_id, status, \
    estimated_hours, worked_hours, notes, assigned_by, \
    started_at, finished_at, created_at, updated_at";

impl From<Row> for Job {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("id"),
            quote_id: row.get("quote_id"),
            item_id: row.get("item_id"),
            employee_id: row.get("employee_id"),
            status: row.get("status"),
            estimated_hours: row.get("estimated_hours"),
            worked_hours: row.get("worked_hours"),
            notes: row.get("notes"),
            assigned_by: row.get("assigned_by"),
            started_at: row.get("started_at"),
            finished_at: row.get("finished_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

impl<C> Database<Select<By<Option<Job>, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Job>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Job>, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: job::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM jobs \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(Job::from))
    }
}

impl<C> Database<Select<By<Option<Job>, (user::Id, quote::item::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Job>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Job>, (user::Id, quote::item::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, item_id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM jobs \
             WHERE employee_id = $1::UUID \
               AND item_id = $2::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&employee_id, &item_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(Job::from))
    }
}

impl<C> Database<Select<By<Vec<Job>, quote::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Job>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Job>, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let quote_id: quote::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM jobs \
             WHERE quote_id = $1::UUID \
             ORDER BY created_at",
        );
        Ok(self
            .query(&sql, &[&quote_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Job::from)
            .collect())
    }
}

impl<C> Database<Insert<Job>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Job>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(job): Insert<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(job)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Job>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(job): Update<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        let Job {
            id,
            quote_id,
            item_id,
            employee_id,
            status,
            estimated_hours,
            worked_hours,
            notes,
            assigned_by,
            started_at,
            finished_at,
            created_at,
            updated_at,
        } = job;

        const SQL: &str = "\
            INSERT INTO jobs (\
                id, quote_id, item_id, employee_id, status, \
                estimated_hours, worked_hours, notes, assigned_by, \
                started_at, finished_at, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, $5::INT2, \
                $6::NUMERIC, $7::NUMERIC, $8::TEXT, $9::UUID, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ, \
                $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                estimated_hours = EXCLUDED.estimated_hours, \
                worked_hours = EXCLUDED.worked_hours, \
                notes = EXCLUDED.notes, \
                started_at = EXCLUDED.started_at, \
                finished_at = EXCLUDED.finished_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &quote_id,
                &item_id,
                &employee_id,
                &status,
                &estimated_hours,
                &worked_hours,
                &notes,
                &assigned_by,
                &started_at,
                &finished_at,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Job, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Job, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: job::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM jobs \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Job, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Job, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: job::Id = by.into_inner();

        // The no-op update takes the row lock even if the row exists.
        const SQL: &str = "\
            INSERT INTO jobs_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::job::list::Page, read::job::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::job::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::job::list::Page, read::job::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::job::list::Selector {
            arguments,
            filter:
                read::job::list::Filter {
                    employee_id,
                    status,
                },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let employee_idx = employee_id.as_ref().map(|e| {
            ps.push(e);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM jobs \
             WHERE TRUE \
                   {cursor} \
                   {employee_filtering} \
                   {status_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            employee_filtering =
                employee_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND employee_id = ${idx}::UUID"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
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

        Ok(read::job::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<Select<By<read::job::list::TotalCount, read::job::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::job::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::job::list::TotalCount, read::job::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::job::list::Filter {
            employee_id,
            status,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM jobs \
            WHERE ($1::UUID IS NULL OR employee_id = $1::UUID) \
              AND ($2::INT2 IS NULL OR status = $2::INT2)";
        self.query_opt(SQL, &[&employee_id, &status])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
