//! [`Quote`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    money::Currency,
    operations::{By, Delete, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        quote::{self, item, Item, Totals},
        Quote,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Reads a [`Money`] out of the provided `column` of the [`Row`].
fn money(row: &Row, column: &str, currency: Currency) -> Money {
    Money::new(row.get(column), currency)
}

impl<C, IDs> Database<Select<By<HashMap<quote::Id, Quote>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[quote::Id]>,
{
    type Ok = HashMap<quote::Id, Quote>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<quote::Id, Quote>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[quote::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, number, client_id, client_name, \
                   representative_id, representative_name, \
                   reference, location, status, due_on, currency, \
                   travel_expenses, \
                   services_total, materials_total, labor_total, \
                   net_total, vat_total, total, \
                   notes, created_by, token, sent_at, sent_to, \
                   responded_at, rejection_reason, client_comments, \
                   finalized_at, feedback_requested, \
                   created_at, updated_at \
            FROM quotes \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                let currency = row.get("currency");
                (
                    id,
                    Quote {
                        id,
                        number: row.get("number"),
                        client_id: row.get("client_id"),
                        client_name: row.get("client_name"),
                        representative_id: row.get("representative_id"),
                        representative_name: row.get("representative_name"),
                        reference: row.get("reference"),
                        location: row.get("location"),
                        status: row.get("status"),
                        due_on: row.get("due_on"),
                        currency,
                        travel_expenses: money(
                            &row,
                            "travel_expenses",
                            currency,
                        ),
                        totals: Totals {
                            services: money(&row, "services_total", currency),
                            materials: money(
                                &row,
                                "materials_total",
                                currency,
                            ),
                            labor: money(&row, "labor_total", currency),
                            net: money(&row, "net_total", currency),
                            vat: money(&row, "vat_total", currency),
                            total: money(&row, "total", currency),
                        },
                        notes: row.get("notes"),
                        created_by: row.get("created_by"),
                        token: row.get("token"),
                        sent_at: row.get("sent_at"),
                        sent_to: row.get("sent_to"),
                        responded_at: row.get("responded_at"),
                        rejection_reason: row.get("rejection_reason"),
                        client_comments: row.get("client_comments"),
                        finalized_at: row.get("finalized_at"),
                        feedback_requested: row.get("feedback_requested"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Quote>, quote::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<quote::Id, Quote>, [quote::Id; 1]>>,
        Ok = HashMap<quote::Id, Quote>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Quote>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quote>, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'n, C> Database<Select<By<Option<Quote>, &'n quote::Number>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Quote>, quote::Id>>,
        Ok = Option<Quote>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Quote>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quote>, &'n quote::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM quotes \
            WHERE number = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&number])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get::<_, quote::Id>("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<'t, C> Database<Select<By<Option<Quote>, &'t quote::Token>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Quote>, quote::Id>>,
        Ok = Option<Quote>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Quote>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quote>, &'t quote::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM quotes \
            WHERE token = $1::VARCHAR \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&token])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get::<_, quote::Id>("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<quote::Number>, read::quote::Year>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<quote::Number>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<quote::Number>, read::quote::Year>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::Year(year) = by.into_inner();
        let prefix = format!("{year}-%");

        const SQL: &str = "\
            SELECT number \
            FROM quotes \
            WHERE number LIKE $1::VARCHAR \
            ORDER BY split_part(number, '-', 2)::INT4 DESC \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&prefix])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| row.get("number")))
    }
}

impl<C> Database<Select<By<Vec<Quote>, read::quote::Overdue>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<quote::Id, Quote>, Vec<quote::Id>>>,
        Ok = HashMap<quote::Id, Quote>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Quote>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quote>, read::quote::Overdue>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::Overdue { today } = by.into_inner();
        let sent = quote::Status::Sent;
        let reviewed = quote::Status::Reviewed;

        const SQL: &str = "\
            SELECT id \
            FROM quotes \
            WHERE status IN ($1::INT2, $2::INT2) \
              AND due_on < $3::DATE \
            ORDER BY due_on";
        let ids = self
            .query(SQL, &[&sent, &reviewed, &today])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<quote::Id>>();

        let mut quotes = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| quotes.remove(id)).collect())
    }
}

impl<C> Database<Select<By<Vec<Quote>, read::quote::AwaitingFeedback>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<quote::Id, Quote>, Vec<quote::Id>>>,
        Ok = HashMap<quote::Id, Quote>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Quote>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quote>, read::quote::AwaitingFeedback>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::AwaitingFeedback { finalized_before } =
            by.into_inner();
        let finalized = quote::Status::Finalized;

        const SQL: &str = "\
            SELECT id \
            FROM quotes \
            WHERE status = $1::INT2 \
              AND NOT feedback_requested \
              AND sent_to IS NOT NULL \
              AND finalized_at <= $2::TIMESTAMPTZ \
            ORDER BY finalized_at";
        let ids = self
            .query(SQL, &[&finalized, &finalized_before])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<quote::Id>>();

        let mut quotes = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| quotes.remove(id)).collect())
    }
}

impl<C> Database<Insert<Quote>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Quote>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(quote): Insert<Quote>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(quote)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Quote>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(quote): Update<Quote>,
    ) -> Result<Self::Ok, Self::Err> {
        let Quote {
            id,
            number,
            client_id,
            client_name,
            representative_id,
            representative_name,
            reference,
            location,
            status,
            due_on,
            currency,
            travel_expenses,
            totals:
                Totals {
                    services,
                    materials,
                    labor,
                    net,
                    vat,
                    total,
                },
            notes,
            created_by,
            token,
            sent_at,
            sent_to,
            responded_at,
            rejection_reason,
            client_comments,
            finalized_at,
            feedback_requested,
            created_at,
            updated_at,
        } = quote;

        const SQL: &str = "\
            INSERT INTO quotes (\
                id, number, client_id, client_name, reference, location, \
                status, due_on, currency, travel_expenses, \
                services_total, materials_total, labor_total, \
                net_total, vat_total, total, \
                notes, created_by, token, sent_at, sent_to, \
                responded_at, rejection_reason, client_comments, \
                finalized_at, feedback_requested, \
                created_at, updated_at, \
                representative_id, representative_name\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, $4::VARCHAR, $5::TEXT, \
                $6::VARCHAR, $7::INT2, $8::DATE, $9::INT2, $10::NUMERIC, \
                $11::NUMERIC, $12::NUMERIC, $13::NUMERIC, \
                $14::NUMERIC, $15::NUMERIC, $16::NUMERIC, \
                $17::TEXT, $18::UUID, $19::VARCHAR, $20::TIMESTAMPTZ, \
                $21::VARCHAR, $22::TIMESTAMPTZ, $23::TEXT, $24::TEXT, \
                $25::TIMESTAMPTZ, $26::BOOLEAN, \
                $27::TIMESTAMPTZ, $28::TIMESTAMPTZ, \
                $29::UUID, $30::VARCHAR\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                client_id = EXCLUDED.client_id, \
                client_name = EXCLUDED.client_name, \
                reference = EXCLUDED.reference, \
                location = EXCLUDED.location, \
                status = EXCLUDED.status, \
                due_on = EXCLUDED.due_on, \
                currency = EXCLUDED.currency, \
                travel_expenses = EXCLUDED.travel_expenses, \
                services_total = EXCLUDED.services_total, \
                materials_total = EXCLUDED.materials_total, \
                labor_total = EXCLUDED.labor_total, \
                net_total = EXCLUDED.net_total, \
                vat_total = EXCLUDED.vat_total, \
                total = EXCLUDED.total, \
                notes = EXCLUDED.notes, \
                created_by = EXCLUDED.created_by, \
                token = EXCLUDED.token, \
                sent_at = EXCLUDED.sent_at, \
                sent_to = EXCLUDED.sent_to, \
                responded_at = EXCLUDED.responded_at, \
                rejection_reason = EXCLUDED.rejection_reason, \
                client_comments = EXCLUDED.client_comments, \
                finalized_at = EXCLUDED.finalized_at, \
                feedback_requested = EXCLUDED.feedback_requested, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at, \
                representative_id = EXCLUDED.representative_id, \
                representative_name = EXCLUDED.representative_name";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &client_id,
                &client_name,
                &reference,
                &location,
                &status,
                &due_on,
                &currency,
                &travel_expenses.amount,
                &services.amount,
                &materials.amount,
                &labor.amount,
                &net.amount,
                &vat.amount,
                &total.amount,
                &notes,
                &created_by,
                &token,
                &sent_at,
                &sent_to,
                &responded_at,
                &rejection_reason,
                &client_comments,
                &finalized_at,
                &feedback_requested,
                &created_at,
                &updated_at,
                &representative_id,
                &representative_name,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Quote, quote::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Quote, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quote::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM quotes \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Quote, quote::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Quote, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: quote::Id = by.into_inner();

        // The no-op update takes the row lock even if the row exists.
        const SQL: &str = "\
            INSERT INTO quotes_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Quote, read::quote::Year>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Quote, read::quote::Year>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::Year(year) = by.into_inner();

        // The no-op update takes the row lock even if the row exists.
        const SQL: &str = "\
            INSERT INTO quotes_numbering_lock \
            VALUES ($1::INT4) \
            ON CONFLICT (year) DO UPDATE SET year = EXCLUDED.year";
        self.query(SQL, &[&year])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::quote::list::Page, read::quote::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::quote::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::quote::list::Page, read::quote::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::list::Selector {
            arguments,
            filter: read::quote::list::Filter { status, client_id },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let client_idx = client_id.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM quotes \
             WHERE TRUE \
                   {cursor} \
                   {status_filtering} \
                   {client_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            client_filtering =
                client_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND client_id = ${idx}::UUID"))
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

        Ok(read::quote::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<By<read::quote::list::TotalCount, read::quote::list::Filter>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::quote::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::quote::list::TotalCount, read::quote::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::list::Filter { status, client_id } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM quotes \
            WHERE ($1::INT2 IS NULL OR status = $1::INT2) \
              AND ($2::UUID IS NULL OR client_id = $2::UUID)";
        self.query_opt(SQL, &[&status, &client_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

/// Reads an [`Item`] out of the provided `quote_items` [`Row`] joined with
/// its [`Quote`] currency.
fn item_from_row(row: &Row) -> Item {
    let currency = row.get("currency");
    let description = row.get("description");
    let quantity = row.get("quantity");
    let unit_price = money(row, "unit_price", currency);

    Item {
        id: row.get("id"),
        quote_id: row.get("quote_id"),
        position: row.get("position"),
        line: match row.get::<_, item::Kind>("kind") {
            item::Kind::Service => item::Line::Service {
                description,
                quantity,
                unit_price,
            },
            item::Kind::Material => item::Line::Material {
                material_id: row.get("material_id"),
                description,
                quantity,
                unit_price,
                usage_hours: row.get("usage_hours"),
            },
            item::Kind::Labor => item::Line::Labor {
                description,
                hours: quantity,
                hourly_rate: unit_price,
            },
        },
    }
}

impl<C> Database<Select<By<Vec<Item>, quote::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Item>, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let quote_id: quote::Id = by.into_inner();

        const SQL: &str = "\
            SELECT i.id, i.quote_id, i.position, i.kind, i.material_id, \
                   i.description, i.quantity, i.unit_price, i.usage_hours, \
                   q.currency \
            FROM quote_items AS i \
            INNER JOIN quotes AS q ON q.id = i.quote_id \
            WHERE i.quote_id = $1::UUID \
            ORDER BY i.position, i.id";
        Ok(self
            .query(SQL, &[&quote_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(item_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Item>, item::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Item>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Item>, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: item::Id = by.into_inner();

        const SQL: &str = "\
            SELECT i.id, i.quote_id, i.position, i.kind, i.material_id, \
                   i.description, i.quantity, i.unit_price, i.usage_hours, \
                   q.currency \
            FROM quote_items AS i \
            INNER JOIN quotes AS q ON q.id = i.quote_id \
            WHERE i.id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(item_from_row))
    }
}

impl<C> Database<Insert<Item>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Item>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<Item>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(item)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Item>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<Item>,
    ) -> Result<Self::Ok, Self::Err> {
        let kind = item.kind();
        let Item {
            id,
            quote_id,
            position,
            line,
        } = item;
        let unit_price = line.unit_price().amount;
        let quantity = line.quantity();
        let (material_id, usage_hours) = match &line {
            item::Line::Material {
                material_id,
                usage_hours,
                ..
            } => (*material_id, *usage_hours),
            item::Line::Service { .. } | item::Line::Labor { .. } => {
                (None, item::Quantity::ZERO)
            }
        };
        let description = line.description();

        const SQL: &str = "\
            INSERT INTO quote_items (\
                id, quote_id, position, kind, material_id, \
                description, quantity, unit_price, usage_hours\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::INT4, $4::INT2, $5::UUID, \
                $6::TEXT, $7::NUMERIC, $8::NUMERIC, $9::NUMERIC\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET position = EXCLUDED.position, \
                kind = EXCLUDED.kind, \
                material_id = EXCLUDED.material_id, \
                description = EXCLUDED.description, \
                quantity = EXCLUDED.quantity, \
                unit_price = EXCLUDED.unit_price, \
                usage_hours = EXCLUDED.usage_hours";
        self.exec(
            SQL,
            &[
                &id,
                &quote_id,
                &position,
                &kind,
                &material_id,
                description,
                &quantity,
                &unit_price,
                &usage_hours,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Item, item::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Item, item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: item::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM quote_items \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
