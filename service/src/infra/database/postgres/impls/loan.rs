//! [`Loan`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Date,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{loan, material, Loan},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `loans` table to read a [`Loan`] from.
const COLUMNS: &str = "\
    id, material_id, borrower, issued_on, due_on, notes, \
    registered_by, created_at, updated_at";

impl From<Row> for Loan {
    fn from(row: Row) -> Self {
        Self {
            id: row.get("id"),
            material_id: row.get("material_id"),
            borrower: row.get("borrower"),
            issued_on: row.get("issued_on"),
            due_on: row.get("due_on"),
            notes: row.get("notes"),
            registered_by: row.get("registered_by"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

impl<C> Database<Select<By<Option<Loan>, loan::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Loan>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Loan>, loan::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: loan::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM loans \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(Loan::from))
    }
}

impl<C> Database<Select<By<Option<Loan>, material::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Loan>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Loan>, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let material_id: material::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM loans \
             WHERE material_id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&material_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(Loan::from))
    }
}

impl<C> Database<Insert<Loan>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Loan>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(loan): Insert<Loan>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(loan)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Loan>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(loan): Update<Loan>,
    ) -> Result<Self::Ok, Self::Err> {
        let Loan {
            id,
            material_id,
            borrower,
            issued_on,
            due_on,
            notes,
            registered_by,
            created_at,
            updated_at,
        } = loan;

        const SQL: &str = "\
            INSERT INTO loans (\
                id, material_id, borrower, issued_on, due_on, notes, \
                registered_by, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::DATE, $5::DATE, \
                $6::TEXT, $7::UUID, $8::TIMESTAMPTZ, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET borrower = EXCLUDED.borrower, \
                issued_on = EXCLUDED.issued_on, \
                due_on = EXCLUDED.due_on, \
                notes = EXCLUDED.notes, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &material_id,
                &borrower,
                &issued_on,
                &due_on,
                &notes,
                &registered_by,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Loan, loan::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Loan, loan::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: loan::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM loans \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::loan::list::Page, read::loan::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::loan::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::loan::list::Page, read::loan::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::loan::list::Selector {
            arguments,
            filter: read::loan::list::Filter { overdue_only },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;
        let today = Date::today();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let today_idx = overdue_only.then(|| {
            ps.push(&today);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM loans \
             WHERE TRUE \
                   {cursor} \
                   {overdue_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            overdue_filtering =
                today_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND due_on < ${idx}::DATE"))
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

        Ok(read::loan::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<Select<By<read::loan::list::TotalCount, read::loan::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::loan::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::loan::list::TotalCount, read::loan::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::loan::list::Filter { overdue_only } = by.into_inner();
        let today = Date::today();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM loans \
            WHERE NOT $1::BOOLEAN OR due_on < $2::DATE";
        self.query_opt(SQL, &[&overdue_only, &today])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Select<By<Option<loan::Record>, loan::record::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<loan::Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<loan::Record>, loan::record::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: loan::record::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, material_id, material_code, material_name, \
                   borrower, issued_on, due_on, returned_on, notes, \
                   registered_by, created_at \
            FROM loan_records \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| loan::Record {
                id: row.get("id"),
                material_id: row.get("material_id"),
                material_code: row.get("material_code"),
                material_name: row.get("material_name"),
                borrower: row.get("borrower"),
                issued_on: row.get("issued_on"),
                due_on: row.get("due_on"),
                returned_on: row.get("returned_on"),
                notes: row.get("notes"),
                registered_by: row.get("registered_by"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<loan::Record>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<loan::Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let loan::Record {
            id,
            material_id,
            material_code,
            material_name,
            borrower,
            issued_on,
            due_on,
            returned_on,
            notes,
            registered_by,
            created_at,
        } = record;

        // Records are append-only, so no upsert here.
        const SQL: &str = "\
            INSERT INTO loan_records (\
                id, material_id, material_code, material_name, \
                borrower, issued_on, due_on, returned_on, notes, \
                registered_by, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::DATE, $7::DATE, $8::DATE, $9::TEXT, \
                $10::UUID, $11::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &material_id,
                &material_code,
                &material_name,
                &borrower,
                &issued_on,
                &due_on,
                &returned_on,
                &notes,
                &registered_by,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Select<
            By<read::loan::history::TotalCount, read::loan::history::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::loan::history::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::loan::history::TotalCount, read::loan::history::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::loan::history::Filter { material_id } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM loan_records \
            WHERE ($1::UUID IS NULL OR material_id = $1::UUID)";
        self.query_opt(SQL, &[&material_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C>
    Database<
        Select<By<read::loan::history::Page, read::loan::history::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::loan::history::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::loan::history::Page, read::loan::history::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::loan::history::Selector {
            arguments,
            filter: read::loan::history::Filter { material_id },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let material_idx = material_id.as_ref().map(|m| {
            ps.push(m);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM loan_records \
             WHERE TRUE \
                   {cursor} \
                   {material_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            material_filtering =
                material_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND material_id = ${idx}::UUID"))
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

        Ok(read::loan::history::Page::new(&arguments, edges, has_more))
    }
}
