//! [`Notification`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{notification, user, Notification},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Notification>, notification::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Notification>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Notification>, notification::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: notification::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, title, message, kind, is_read, link, \
                   material_id, created_at \
            FROM notifications \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Notification {
                id: row.get("id"),
                user_id: row.get("user_id"),
                title: row.get("title"),
                message: row.get("message"),
                kind: row.get("kind"),
                is_read: row.get("is_read"),
                link: row.get("link"),
                material_id: row.get("material_id"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Notification>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<Notification>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(notification): Insert<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(notification))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Notification>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(notification): Update<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let Notification {
            id,
            user_id,
            title,
            message,
            kind,
            is_read,
            link,
            material_id,
            created_at,
        } = notification;

        const SQL: &str = "\
            INSERT INTO notifications (\
                id, user_id, title, message, kind, is_read, link, \
                material_id, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::TEXT, $5::INT2, \
                $6::BOOLEAN, $7::VARCHAR, $8::UUID, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET is_read = EXCLUDED.is_read";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &title,
                &message,
                &kind,
                &is_read,
                &link,
                &material_id,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<By<Notification, read::notification::UnreadOf>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Notification, read::notification::UnreadOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::notification::UnreadOf(user_id) = by.into_inner();

        const SQL: &str = "\
            UPDATE notifications \
            SET is_read = TRUE \
            WHERE user_id = $1::UUID \
              AND NOT is_read";
        self.exec(SQL, &[&user_id]).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Notification, notification::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Notification, notification::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: notification::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM notifications \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Notification, read::notification::UnreadAbout>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Notification, read::notification::UnreadAbout>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::notification::UnreadAbout(material_id) = by.into_inner();

        const SQL: &str = "\
            DELETE FROM notifications \
            WHERE material_id = $1::UUID \
              AND NOT is_read";
        self.exec(SQL, &[&material_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Notification, read::notification::ReadBefore>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Notification, read::notification::ReadBefore>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::notification::ReadBefore(before) = by.into_inner();

        const SQL: &str = "\
            DELETE FROM notifications \
            WHERE is_read \
              AND created_at < $1::TIMESTAMPTZ";
        self.exec(SQL, &[&before]).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<read::notification::UnreadCount, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::notification::UnreadCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::notification::UnreadCount, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM notifications \
            WHERE user_id = $1::UUID \
              AND NOT is_read";
        self.query_opt(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C>
    Database<
        Select<
            By<
                read::notification::list::Page,
                read::notification::list::Selector,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::notification::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::notification::list::Page,
                read::notification::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::notification::list::Selector {
            arguments,
            filter:
                read::notification::list::Filter {
                    user_id,
                    unread_only,
                },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &user_id];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM notifications \
             WHERE user_id = $2::UUID \
                   {unread_filtering} \
                   {cursor} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            unread_filtering = if unread_only { "AND NOT is_read" } else { "" },
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
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

        Ok(read::notification::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<
                read::notification::list::TotalCount,
                read::notification::list::Filter,
            >,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::notification::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::notification::list::TotalCount,
                read::notification::list::Filter,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::notification::list::Filter {
            user_id,
            unread_only,
        } = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM notifications \
            WHERE user_id = $1::UUID \
              AND (NOT $2::BOOL OR NOT is_read)";
        self.query_opt(SQL, &[&user_id, &unread_only])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
