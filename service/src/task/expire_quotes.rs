//! [`ExpireQuotes`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{
        By, Commit, Insert, Lock, Perform, Select, Start, Transact, Transacted,
        Update,
    },
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{quote, Notification, Quote},
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`ExpireQuotes`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between overdue [`Quote`]s checks.
    pub interval: time::Duration,
}

/// [`Task`] expiring [`Quote`]s which haven't been responded to before their
/// due date.
#[derive(Clone, Copy, Debug)]
pub struct ExpireQuotes<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, M> Task<Start<By<ExpireQuotes<Self>, Config>>> for Service<Db, M>
where
    ExpireQuotes<Service<Db, M>>:
        Task<Perform<()>, Ok = usize, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpireQuotes<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = ExpireQuotes {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("expired {n} overdue `Quote`s"),
                Err(e) => log::error!("`task::ExpireQuotes` failed: {e}"),
            }
        }
    }
}

impl<Db, M> Task<Perform<()>> for ExpireQuotes<Service<Db, M>>
where
    Db: Database<
            Select<By<Vec<Quote>, read::quote::Overdue>>,
            Ok = Vec<Quote>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Insert<Notification>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let db = self.service.database();

        let overdue = db
            .execute(Select(By::<Vec<Quote>, _>::new(read::quote::Overdue {
                today: Date::today().coerce(),
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        let mut expired = 0;
        for Quote { id, .. } in overdue {
            let tx = db
                .execute(Transact)
                .await
                .map_err(tracerr::map_from_and_wrap!())?;
            tx.execute(Lock(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!())
                .map(drop)?;

            // The client might have responded meanwhile.
            let Some(mut quote) = tx
                .execute(Select(By::<Option<Quote>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!())?
            else {
                continue;
            };
            if !quote.transit(quote::Status::Expired) {
                continue;
            }

            tx.execute(Update(quote.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!())
                .map(drop)?;
            tx.execute(Insert(Notification::quote_expired(&quote)))
                .await
                .map_err(tracerr::map_from_and_wrap!())
                .map(drop)?;
            tx.execute(Commit)
                .await
                .map_err(tracerr::map_from_and_wrap!())
                .map(drop)?;

            log::debug!("`Quote` {} expired", quote.number);
            expired += 1;
        }

        Ok(expired)
    }
}

/// Error of [`ExpireQuotes`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use common::{operations::Perform, Date};

    use crate::{
        domain::{quote::Status, Quote},
        fixture,
        infra::database::memory::Memory,
        Service, Task as _,
    };

    use super::ExpireQuotes;

    /// Seeds a [`Quote`] in the provided [`Status`], due in the provided
    /// number of `days`.
    fn seed(db: &Memory, status: Status, days: i64) -> Quote {
        let mut quote = fixture::quote(status);
        quote.due_on = Some(Date::today().add_days(days).unwrap().coerce());
        _ = db.state().quotes.insert(quote.id, quote.clone());
        quote
    }

    fn task(db: &Memory) -> ExpireQuotes<Service<Memory, ()>> {
        ExpireQuotes {
            config: fixture::config().expire_quotes,
            service: fixture::service(db.clone(), ()),
        }
    }

    fn status(db: &Memory, quote: &Quote) -> Status {
        db.state().quotes[&quote.id].status
    }

    #[tokio::test]
    async fn expires_unanswered_overdue_quotes() {
        let db = Memory::default();
        let sent = seed(&db, Status::Sent, -1);
        let reviewed = seed(&db, Status::Reviewed, -3);

        let expired = task(&db).execute(Perform(())).await.unwrap();

        assert_eq!(expired, 2);
        assert_eq!(status(&db, &sent), Status::Expired);
        assert_eq!(status(&db, &reviewed), Status::Expired);
        let state = db.state();
        assert_eq!(state.notifications.len(), 2);
        assert!(state
            .notifications
            .iter()
            .all(|n| n.user_id == sent.created_by
                || n.user_id == reviewed.created_by));
    }

    #[tokio::test]
    async fn skips_answered_quotes() {
        let db = Memory::default();
        let approved = seed(&db, Status::Approved, -1);
        let rejected = seed(&db, Status::Rejected, -1);
        let changes = seed(&db, Status::ChangesRequested, -1);

        let expired = task(&db).execute(Perform(())).await.unwrap();

        assert_eq!(expired, 0);
        assert_eq!(status(&db, &approved), Status::Approved);
        assert_eq!(status(&db, &rejected), Status::Rejected);
        assert_eq!(status(&db, &changes), Status::ChangesRequested);
        assert!(db.state().notifications.is_empty());
    }

    #[tokio::test]
    async fn keeps_quotes_due_today() {
        let db = Memory::default();
        let today = seed(&db, Status::Sent, 0);
        let undated = fixture::quote(Status::Sent);
        _ = db.state().quotes.insert(undated.id, undated.clone());

        let expired = task(&db).execute(Perform(())).await.unwrap();

        assert_eq!(expired, 0);
        assert_eq!(status(&db, &today), Status::Sent);
        assert_eq!(status(&db, &undated), Status::Sent);
    }
}
