//! [`Mailer`] collecting [`Email`]s instead of delivering them.

use std::sync::{Arc, Mutex, PoisonError};

use common::operations::Send;
use tracerr::Traced;

use super::{smtp, Email, Error, Mailer};

/// [`Mailer`] keeping the sent [`Email`]s, or refusing every delivery.
#[derive(Clone, Debug, Default)]
pub(crate) struct Outbox {
    /// Delivered [`Email`]s, shared between clones.
    sent: Arc<Mutex<Vec<Email>>>,

    /// Indicator whether every delivery fails.
    failing: bool,
}

impl Outbox {
    /// Creates a new [`Outbox`] failing every delivery.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Returns the [`Email`]s delivered so far.
    pub(crate) fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Mailer<Send<Email>> for Outbox {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Send(email): Send<Email>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.failing {
            let e = "not an address"
                .parse::<lettre::Address>()
                .expect_err("invalid address");
            return Err(tracerr::new!(Error::Smtp(smtp::Error::from(e))));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
        Ok(())
    }
}
