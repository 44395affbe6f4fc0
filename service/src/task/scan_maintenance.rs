//! [`ScanMaintenance`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Delete, Insert, Perform, Select, Start, Update},
    Date,
};
use derive_more::Display;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        material::{self, maintenance},
        user, Material, Notification,
    },
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`ScanMaintenance`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between [`Material`]s maintenance scans.
    pub interval: time::Duration,
}

/// [`Task`] alerting admins about the upcoming and overdue maintenance of
/// [`Material`]s.
///
/// Every maintenance state is alerted only once, until it changes.
#[derive(Clone, Copy, Debug)]
pub struct ScanMaintenance<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, M> Task<Start<By<ScanMaintenance<Self>, Config>>> for Service<Db, M>
where
    ScanMaintenance<Service<Db, M>>:
        Task<Perform<()>, Ok = Report, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ScanMaintenance<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ScanMaintenance {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(report) => log::debug!("`task::ScanMaintenance`: {report}"),
                Err(e) => log::error!("`task::ScanMaintenance` failed: {e}"),
            }
        }
    }
}

impl<Db, M> Task<Perform<()>> for ScanMaintenance<Service<Db, M>>
where
    Db: Database<
            Select<By<Vec<Material>, read::material::Maintained>>,
            Ok = Vec<Material>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<user::Id>, user::Role>>,
            Ok = Vec<user::Id>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<read::material::AlertedState>, material::Id>>,
            Ok = Option<read::material::AlertedState>,
            Err = Traced<database::Error>,
        > + Database<
            Update<read::material::AlertedState>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<read::material::AlertedState, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Notification, read::notification::UnreadAbout>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Notification>, Err = Traced<database::Error>>,
{
    type Ok = Report;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let db = self.service.database();

        let materials = db
            .execute(Select(By::<Vec<Material>, _>::new(
                read::material::Maintained,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;
        let admins = db
            .execute(Select(By::<Vec<user::Id>, _>::new(user::Role::Admin)))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        let today = Date::today();
        let mut report = Report::default();
        for material in materials {
            let Some(schedule) = material.maintenance else {
                continue;
            };
            let assessment = schedule.assess(today);
            report.scanned += 1;

            match assessment.status {
                maintenance::Status::Unknown => {}
                maintenance::Status::Ok => {
                    db.execute(Delete(By::<Notification, _>::new(
                        read::notification::UnreadAbout(material.id),
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!())
                    .map(drop)?;
                    db.execute(Delete(
                        By::<read::material::AlertedState, _>::new(material.id),
                    ))
                    .await
                    .map_err(tracerr::map_from_and_wrap!())
                    .map(drop)?;
                }
                maintenance::Status::Upcoming
                | maintenance::Status::Overdue => {
                    let fingerprint = assessment.fingerprint(material.id);
                    let alerted = db
                        .execute(Select(By::<
                            Option<read::material::AlertedState>,
                            _,
                        >::new(
                            material.id
                        )))
                        .await
                        .map_err(tracerr::map_from_and_wrap!())?;
                    if alerted.is_some_and(|s| s.fingerprint == fingerprint) {
                        continue;
                    }

                    // Previous alerts are outdated by the new state.
                    db.execute(Delete(By::<Notification, _>::new(
                        read::notification::UnreadAbout(material.id),
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!())
                    .map(drop)?;
                    for admin_id in &admins {
                        db.execute(Insert(Notification::maintenance_due(
                            *admin_id,
                            &material,
                            &assessment,
                        )))
                        .await
                        .map_err(tracerr::map_from_and_wrap!())
                        .map(drop)?;
                    }
                    db.execute(Update(read::material::AlertedState {
                        material_id: material.id,
                        fingerprint,
                    }))
                    .await
                    .map_err(tracerr::map_from_and_wrap!())
                    .map(drop)?;

                    log::info!(
                        "alerted {} admins about `{}` maintenance of \
                         `Material` {}",
                        admins.len(),
                        assessment.status,
                        material.code,
                    );
                    report.alerted += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Outcome of a single [`ScanMaintenance`] run.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
#[display("scanned {scanned} materials, alerted about {alerted}")]
pub struct Report {
    /// Number of [`Material`]s having been assessed.
    pub scanned: usize,

    /// Number of [`Material`]s the admins were alerted about.
    pub alerted: usize,
}

/// Error of [`ScanMaintenance`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use common::operations::Perform;
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            material::MaintenanceSchedule,
            user::{self, Role},
            Material,
        },
        fixture,
        infra::database::memory::Memory,
        Service, Task as _,
    };

    use super::{Report, ScanMaintenance};

    fn hours_used(accumulated: u32) -> Option<MaintenanceSchedule> {
        MaintenanceSchedule::by_hours(100, Decimal::from(accumulated), None)
    }

    /// Seeds an admin, a manager and a [`Material`] with the provided
    /// accumulated usage hours, returning the admin's ID along.
    fn seed(db: &Memory, accumulated: u32) -> (Material, user::Id) {
        let admin = fixture::user(Role::Admin);
        let manager = fixture::user(Role::Manager);
        let material = fixture::material(hours_used(accumulated));

        let mut state = db.state();
        _ = state.users.insert(admin.id, admin.clone());
        _ = state.users.insert(manager.id, manager);
        _ = state.materials.insert(material.id, material.clone());
        (material, admin.id)
    }

    fn task(db: &Memory) -> ScanMaintenance<Service<Memory, ()>> {
        ScanMaintenance {
            config: fixture::config().scan_maintenance,
            service: fixture::service(db.clone(), ()),
        }
    }

    fn set_accumulated(db: &Memory, material: &Material, accumulated: u32) {
        let mut state = db.state();
        let m = state.materials.get_mut(&material.id).unwrap();
        m.maintenance = hours_used(accumulated);
    }

    #[tokio::test]
    async fn alerts_admins_once_per_state() {
        let db = Memory::default();
        let (material, admin_id) = seed(&db, 80);
        let task = task(&db);

        let report = task.execute(Perform(())).await.unwrap();
        assert_eq!(
            report,
            Report {
                scanned: 1,
                alerted: 1,
            },
        );
        {
            let state = db.state();
            assert_eq!(state.notifications.len(), 1);
            assert_eq!(state.notifications[0].user_id, admin_id);
            assert_eq!(state.notifications[0].material_id, Some(material.id));
            assert!(state.alerted.contains_key(&material.id));
        }

        let report = task.execute(Perform(())).await.unwrap();
        assert_eq!(report.alerted, 0, "same state must not be re-alerted");
        assert_eq!(db.state().notifications.len(), 1);
    }

    #[tokio::test]
    async fn replaces_alert_on_state_change() {
        let db = Memory::default();
        let (material, _) = seed(&db, 80);
        let task = task(&db);

        _ = task.execute(Perform(())).await.unwrap();
        let upcoming = db.state().notifications[0].id;

        set_accumulated(&db, &material, 120);
        let report = task.execute(Perform(())).await.unwrap();

        assert_eq!(report.alerted, 1);
        let state = db.state();
        assert_eq!(state.notifications.len(), 1);
        assert_ne!(state.notifications[0].id, upcoming);
        assert!(state.notifications[0].title.as_ref().contains("overdue"));
    }

    #[tokio::test]
    async fn clears_alerts_once_maintained() {
        let db = Memory::default();
        let (material, _) = seed(&db, 120);
        let task = task(&db);

        _ = task.execute(Perform(())).await.unwrap();
        assert_eq!(db.state().notifications.len(), 1);

        set_accumulated(&db, &material, 0);
        let report = task.execute(Perform(())).await.unwrap();

        assert_eq!(report.alerted, 0);
        let state = db.state();
        assert!(state.notifications.is_empty());
        assert!(!state.alerted.contains_key(&material.id));
    }

    #[tokio::test]
    async fn keeps_read_alerts() {
        let db = Memory::default();
        let (material, _) = seed(&db, 80);
        let task = task(&db);

        _ = task.execute(Perform(())).await.unwrap();
        db.state().notifications[0].is_read = true;

        set_accumulated(&db, &material, 0);
        _ = task.execute(Perform(())).await.unwrap();

        assert_eq!(db.state().notifications.len(), 1);
    }
}
