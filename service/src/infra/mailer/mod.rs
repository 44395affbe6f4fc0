//! [`Mailer`]-related implementations.

mod compose;
#[cfg(all(test, feature = "smtp"))]
pub(crate) mod outbox;
#[cfg(feature = "smtp")]
pub mod smtp;

use std::time::Duration;

use common::operations::Send;
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;
use tracing as log;

use crate::domain::contact;

#[cfg(feature = "smtp")]
pub use self::smtp::Smtp;

/// Email delivery operation.
pub use common::Handler as Mailer;

/// Outgoing email message.
#[derive(Clone, Debug)]
pub struct Email {
    /// Recipient of this [`Email`].
    pub to: contact::Email,

    /// Subject line of this [`Email`].
    pub subject: String,

    /// HTML body of this [`Email`].
    pub html: String,

    /// Plain text alternative of the [`Email::html`] body.
    pub text: String,
}

/// [`Mailer`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "smtp")]
    /// [`Smtp`] error.
    Smtp(smtp::Error),
}

/// [`Retry`] policy configuration.
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Maximum number of delivery attempts.
    pub attempts: u32,

    /// Delay before the second attempt, doubled on every next one.
    pub initial_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Returns the delay to wait after the provided failed `attempt`
    /// (counting from `0`).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

/// [`Mailer`] retrying failed deliveries of the inner one with an exponential
/// backoff.
#[derive(Clone, Debug)]
pub struct Retry<M> {
    /// [`RetryConfig`] of this [`Retry`].
    config: RetryConfig,

    /// Inner [`Mailer`] performing the actual delivery.
    mailer: M,
}

impl<M> Retry<M> {
    /// Wraps the provided `mailer` into a [`Retry`] policy.
    #[must_use]
    pub const fn new(mailer: M, config: RetryConfig) -> Self {
        Self { config, mailer }
    }
}

impl<M> Mailer<Send<Email>> for Retry<M>
where
    M: Mailer<Send<Email>, Ok = (), Err = Traced<Error>>,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Send(email): Send<Email>,
    ) -> Result<Self::Ok, Self::Err> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 0;
        loop {
            let err = match self.mailer.execute(Send(email.clone())).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            attempt += 1;
            if attempt >= attempts {
                log::error!(
                    "failed to send email to `{}` after {attempt} attempts: \
                     {err}",
                    email.to,
                );
                return Err(err).map_err(tracerr::wrap!());
            }

            let delay = self.config.delay(attempt - 1);
            log::warn!(
                "attempt {attempt} to send email to `{}` failed, retrying in \
                 {delay:?}: {err}",
                email.to,
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(all(test, feature = "smtp"))]
mod spec {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };

    use common::operations::Send;
    use tokio::time::Instant;
    use tracerr::Traced;

    use crate::domain::contact;

    use super::{smtp, Email, Error, Mailer, Retry, RetryConfig};

    /// [`Mailer`] double failing the first `failures` deliveries.
    #[derive(Debug, Default)]
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl Mailer<Send<Email>> for Flaky {
        type Ok = ();
        type Err = Traced<Error>;

        async fn execute(&self, _: Send<Email>) -> Result<(), Self::Err> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                let e = "not an address"
                    .parse::<lettre::Address>()
                    .unwrap_err();
                return Err(tracerr::new!(Error::Smtp(smtp::Error::from(e))));
            }
            Ok(())
        }
    }

    fn email() -> Email {
        Email {
            to: contact::Email::new("cliente@example.cl").unwrap(),
            subject: "Cotización 2024-0001".into(),
            html: "<p>Hola</p>".into(),
            text: "Hola".into(),
        }
    }

    fn config() -> RetryConfig {
        RetryConfig {
            attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }

    #[test]
    fn doubles_delay_per_attempt() {
        let config = config();

        assert_eq!(config.delay(0), Duration::from_secs(1));
        assert_eq!(config.delay(1), Duration::from_secs(2));
        assert_eq!(config.delay(2), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_after_transient_failures() {
        let mailer = Retry::new(
            Flaky {
                failures: 2,
                ..Flaky::default()
            },
            config(),
        );
        let started = Instant::now();

        mailer.execute(Send(email())).await.unwrap();

        assert_eq!(mailer.mailer.calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_all_attempts() {
        let mailer = Retry::new(
            Flaky {
                failures: 10,
                ..Flaky::default()
            },
            config(),
        );

        let res = mailer.execute(Send(email())).await;

        assert!(res.is_err());
        assert_eq!(mailer.mailer.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn sends_once_when_healthy() {
        let mailer = Retry::new(Flaky::default(), config());

        mailer.execute(Send(email())).await.unwrap();

        assert_eq!(mailer.mailer.calls.load(Ordering::SeqCst), 1);
    }
}
