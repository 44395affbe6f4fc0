//! [`RequestFeedback`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Select, Send, Start, Update};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{quote, Quote},
    infra::{database, mailer, Database, Mailer},
    read, Service,
};

use super::Task;

/// Configuration for [`RequestFeedback`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between finalized [`Quote`]s checks.
    pub interval: time::Duration,

    /// Delay after a [`Quote`] finalization to request a feedback after.
    pub delay: time::Duration,
}

/// [`Task`] asking [`Client`]s by email for a feedback about their finalized
/// [`Quote`]s.
///
/// A feedback is requested once per [`Quote`]. Undelivered requests are
/// retried on the next run.
///
/// [`Client`]: crate::domain::Client
#[derive(Clone, Copy, Debug)]
pub struct RequestFeedback<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, M> Task<Start<By<RequestFeedback<Self>, Config>>> for Service<Db, M>
where
    RequestFeedback<Service<Db, M>>:
        Task<Perform<()>, Ok = usize, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<RequestFeedback<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = RequestFeedback {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("requested feedback on {n} `Quote`s"),
                Err(e) => log::error!("`task::RequestFeedback` failed: {e}"),
            }
        }
    }
}

impl<Db, M> Task<Perform<()>> for RequestFeedback<Service<Db, M>>
where
    Db: Database<
            Select<By<Vec<Quote>, read::quote::AwaitingFeedback>>,
            Ok = Vec<Quote>,
            Err = Traced<database::Error>,
        > + Database<Update<Quote>, Err = Traced<database::Error>>,
    M: Mailer<Send<mailer::Email>, Ok = (), Err = Traced<mailer::Error>>,
{
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let db = self.service.database();

        let finalized_before =
            quote::FinalizationDateTime::now() - self.config.delay;
        let quotes = db
            .execute(Select(By::<Vec<Quote>, _>::new(
                read::quote::AwaitingFeedback { finalized_before },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        let mut requested = 0;
        for mut quote in quotes {
            let Some(to) = quote.sent_to.clone() else {
                continue;
            };
            let email = mailer::Email::feedback_request(to, &quote);
            if let Err(e) = self.service.mailer().execute(Send(email)).await {
                log::warn!(
                    "failed to request feedback on `Quote` {}: {e}",
                    quote.number,
                );
                continue;
            }

            // Finalized `Quote`s are never modified anymore.
            quote.feedback_requested = true;
            db.execute(Update(quote))
                .await
                .map_err(tracerr::map_from_and_wrap!())
                .map(drop)?;
            requested += 1;
        }

        Ok(requested)
    }
}

/// Error of [`RequestFeedback`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(all(test, feature = "smtp"))]
mod spec {
    use std::time::Duration;

    use common::operations::Perform;

    use crate::{
        domain::{contact, quote, Quote},
        fixture,
        infra::{database::memory::Memory, mailer::outbox::Outbox},
        Service, Task as _,
    };

    use super::RequestFeedback;

    /// Seeds a [`quote::Status::Finalized`] [`Quote`], finalized the
    /// provided number of `days` ago.
    fn seed(db: &Memory, days: u64) -> Quote {
        let mut quote = fixture::quote(quote::Status::Finalized);
        quote.sent_to =
            Some(contact::Email::new("compras@canelos.cl").unwrap());
        quote.finalized_at = Some(
            quote::FinalizationDateTime::now()
                - Duration::from_secs(days * 24 * 60 * 60),
        );
        _ = db.state().quotes.insert(quote.id, quote.clone());
        quote
    }

    fn task(
        db: &Memory,
        mailer: Outbox,
    ) -> RequestFeedback<Service<Memory, Outbox>> {
        RequestFeedback {
            config: fixture::config().request_feedback,
            service: fixture::service(db.clone(), mailer),
        }
    }

    #[tokio::test]
    async fn requests_feedback_once() {
        let db = Memory::default();
        let quote = seed(&db, 4);
        let outbox = Outbox::default();
        let task = task(&db, outbox.clone());

        assert_eq!(task.execute(Perform(())).await.unwrap(), 1);
        assert_eq!(task.execute(Perform(())).await.unwrap(), 0);

        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(Some(&sent[0].to), quote.sent_to.as_ref());
        assert!(db.state().quotes[&quote.id].feedback_requested);
    }

    #[tokio::test]
    async fn waits_for_the_delay() {
        let db = Memory::default();
        let quote = seed(&db, 1);
        let outbox = Outbox::default();

        let requested =
            task(&db, outbox.clone()).execute(Perform(())).await.unwrap();

        assert_eq!(requested, 0);
        assert!(outbox.sent().is_empty());
        assert!(!db.state().quotes[&quote.id].feedback_requested);
    }

    #[tokio::test]
    async fn retries_undelivered_requests() {
        let db = Memory::default();
        let quote = seed(&db, 4);

        let requested = task(&db, Outbox::failing())
            .execute(Perform(()))
            .await
            .unwrap();

        assert_eq!(requested, 0);
        assert!(!db.state().quotes[&quote.id].feedback_requested);

        let outbox = Outbox::default();
        let requested =
            task(&db, outbox.clone()).execute(Perform(())).await.unwrap();

        assert_eq!(requested, 1);
        assert_eq!(outbox.sent().len(), 1);
        assert!(db.state().quotes[&quote.id].feedback_requested);
    }
}
