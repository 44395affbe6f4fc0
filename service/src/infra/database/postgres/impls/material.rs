//! [`Material`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    DateTime, Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        material::{self, maintenance, MaintenanceSchedule},
        Material,
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

/// Reads a [`MaintenanceSchedule`] out of the provided `materials` [`Row`].
fn schedule_from_row(row: &Row) -> Option<MaintenanceSchedule> {
    let kind = row.get::<_, Option<maintenance::Kind>>("maintenance_kind")?;
    let interval = row
        .get::<_, Option<i32>>("maintenance_every")
        .and_then(|i| u32::try_from(i).ok())?;
    let alert = row
        .get::<_, Option<i32>>("maintenance_alert")
        .and_then(|a| u32::try_from(a).ok());

    Some(match kind {
        maintenance::Kind::Days => MaintenanceSchedule::ByDays {
            interval,
            last_performed_on: row.get("maintained_on"),
            alert,
        },
        maintenance::Kind::Hours => MaintenanceSchedule::ByHours {
            interval,
            accumulated: row
                .get::<_, Option<_>>("usage_hours")
                .unwrap_or_default(),
            alert,
        },
    })
}

impl<C, IDs> Database<Select<By<HashMap<material::Id, Material>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[material::Id]>,
{
    type Ok = HashMap<material::Id, Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<material::Id, Material>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[material::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        const SQL: &str = "\
            SELECT id, code, name, description, \
                   unit_price, currency, unit, category, is_active, \
                   maintenance_kind, maintenance_every, maintained_on, \
                   usage_hours, maintenance_alert, \
                   created_at, deleted_at \
            FROM materials \
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
                    Material {
                        id,
                        code: row.get("code"),
                        name: row.get("name"),
                        description: row.get("description"),
                        unit_price: Money::new(
                            row.get("unit_price"),
                            row.get("currency"),
                        ),
                        unit: row.get("unit"),
                        category: row.get("category"),
                        is_active: row.get("is_active"),
                        maintenance: schedule_from_row(&row),
                        created_at: row.get("created_at"),
                        deleted_at: row.get("deleted_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Material>, material::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<material::Id, Material>, [material::Id; 1]>>,
        Ok = HashMap<material::Id, Material>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Material>, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'c, C> Database<Select<By<Option<Material>, &'c material::Code>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Material>, material::Id>>,
        Ok = Option<Material>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Material>, &'c material::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM materials \
            WHERE code = $1::VARCHAR \
              AND deleted_at IS NULL \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&code])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get::<_, material::Id>("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Material>, read::material::Maintained>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<material::Id, Material>, Vec<material::Id>>>,
        Ok = HashMap<material::Id, Material>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Material>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Material>, read::material::Maintained>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id \
            FROM materials \
            WHERE deleted_at IS NULL \
              AND is_active \
              AND maintenance_kind IS NOT NULL \
            ORDER BY code";
        let ids = self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<material::Id>>();

        let mut materials = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| materials.remove(id)).collect())
    }
}

impl<C> Database<Insert<Material>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Material>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(material): Insert<Material>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(material))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Material>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(material): Update<Material>,
    ) -> Result<Self::Ok, Self::Err> {
        let Material {
            id,
            code,
            name,
            description,
            unit_price,
            unit,
            category,
            is_active,
            maintenance,
            created_at,
            deleted_at,
        } = material;

        let kind = maintenance.as_ref().map(MaintenanceSchedule::kind);
        let (every, maintained_on, usage_hours, alert) = match maintenance {
            Some(MaintenanceSchedule::ByDays {
                interval,
                last_performed_on,
                alert,
            }) => (Some(interval), last_performed_on, None, alert),
            Some(MaintenanceSchedule::ByHours {
                interval,
                accumulated,
                alert,
            }) => (Some(interval), None, Some(accumulated), alert),
            None => (None, None, None, None),
        };
        let every = every.map(|v| i32::try_from(v).unwrap_or(i32::MAX));
        let alert = alert.map(|v| i32::try_from(v).unwrap_or(i32::MAX));

        const SQL: &str = "\
            INSERT INTO materials (\
                id, code, name, description, \
                unit_price, currency, unit, category, is_active, \
                maintenance_kind, maintenance_every, maintained_on, \
                usage_hours, maintenance_alert, \
                created_at, deleted_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TEXT, \
                $5::NUMERIC, $6::INT2, $7::VARCHAR, $8::VARCHAR, \
                $9::BOOLEAN, \
                $10::INT2, $11::INT4, $12::DATE, \
                $13::NUMERIC, $14::INT4, \
                $15::TIMESTAMPTZ, $16::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET code = EXCLUDED.code, \
                name = EXCLUDED.name, \
                description = EXCLUDED.description, \
                unit_price = EXCLUDED.unit_price, \
                currency = EXCLUDED.currency, \
                unit = EXCLUDED.unit, \
                category = EXCLUDED.category, \
                is_active = EXCLUDED.is_active, \
                maintenance_kind = EXCLUDED.maintenance_kind, \
                maintenance_every = EXCLUDED.maintenance_every, \
                maintained_on = EXCLUDED.maintained_on, \
                usage_hours = EXCLUDED.usage_hours, \
                maintenance_alert = EXCLUDED.maintenance_alert, \
                created_at = EXCLUDED.created_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &code,
                &name,
                &description,
                &unit_price.amount,
                &unit_price.currency,
                &unit,
                &category,
                &is_active,
                &kind,
                &every,
                &maintained_on,
                &usage_hours,
                &alert,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Material, material::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Material, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: material::Id = by.into_inner();

        // The no-op update takes the row lock even if the row exists.
        const SQL: &str = "\
            INSERT INTO materials_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<Option<read::material::AlertedState>, material::Id>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::material::AlertedState>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::material::AlertedState>, material::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let material_id: material::Id = by.into_inner();

        const SQL: &str = "\
            SELECT fingerprint \
            FROM material_alerts \
            WHERE material_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&material_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::material::AlertedState {
                material_id,
                fingerprint: row.get("fingerprint"),
            }))
    }
}

impl<C> Database<Update<read::material::AlertedState>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(state): Update<read::material::AlertedState>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::material::AlertedState {
            material_id,
            fingerprint,
        } = state;
        let now = DateTime::now();

        const SQL: &str = "\
            INSERT INTO material_alerts (\
                material_id, fingerprint, alerted_at\
            ) \
            VALUES ($1::UUID, $2::INT8, $3::TIMESTAMPTZ) \
            ON CONFLICT (material_id) DO UPDATE \
            SET fingerprint = EXCLUDED.fingerprint, \
                alerted_at = EXCLUDED.alerted_at";
        self.exec(SQL, &[&material_id, &fingerprint, &now])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<read::material::AlertedState, material::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<read::material::AlertedState, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let material_id: material::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM material_alerts \
            WHERE material_id = $1::UUID";
        self.exec(SQL, &[&material_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::material::list::Page, read::material::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::material::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::material::list::Page, read::material::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::material::list::Selector {
            arguments,
            filter:
                read::material::list::Filter {
                    search,
                    category,
                    is_active,
                },
        } = by.into_inner();

        let limit =
            i32::try_from(arguments.limit()).unwrap_or(i32::MAX - 1) + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let category_idx = category.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let is_active_idx = is_active.as_ref().map(|a| {
            ps.push(a);
            ps.len()
        });

        let search_pattern =
            search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let search_pattern_idx = search_pattern.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM materials \
             WHERE deleted_at IS NULL \
                   {cursor} \
                   {category_filtering} \
                   {is_active_filtering} \
                   {search_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category = ${idx}::VARCHAR"))
                }),
            is_active_filtering =
                is_active_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND is_active = ${idx}::BOOLEAN"))
                }),
            search_filtering =
                search_pattern_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (LOWER(name) SIMILAR TO LOWER(${idx}::VARCHAR) \
                              OR LOWER(code) SIMILAR TO LOWER(${idx}::VARCHAR))"
                    ))
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

        Ok(read::material::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::material::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::material::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::material::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM materials \
            WHERE deleted_at IS NULL";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
