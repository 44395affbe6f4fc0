//! [`CleanNotifications`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{notification, Notification},
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`CleanNotifications`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between old [`Notification`]s cleanups.
    pub interval: time::Duration,

    /// Age of read [`Notification`]s to be removed after.
    pub max_age: time::Duration,
}

/// [`Task`] removing old read [`Notification`]s.
#[derive(Clone, Copy, Debug)]
pub struct CleanNotifications<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, M> Task<Start<By<CleanNotifications<Self>, Config>>>
    for Service<Db, M>
where
    CleanNotifications<Service<Db, M>>:
        Task<Perform<()>, Ok = u64, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CleanNotifications<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = CleanNotifications {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("removed {n} old `Notification`s"),
                Err(e) => log::error!("`task::CleanNotifications` failed: {e}"),
            }
        }
    }
}

impl<Db, M> Task<Perform<()>> for CleanNotifications<Service<Db, M>>
where
    Db: Database<
        Delete<By<Notification, read::notification::ReadBefore>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = u64;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline =
            notification::CreationDateTime::now() - self.config.max_age;
        self.service
            .database()
            .execute(Delete(By::new(read::notification::ReadBefore(deadline))))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`CleanNotifications`] execution.
pub type ExecutionError = Traced<database::Error>;
