//! SMTP [`Mailer`] implementation.

use std::sync::Arc;

use common::operations::Send;
use derive_more::{Debug, Display, Error as StdError, From};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret as _, SecretString};
use tracerr::Traced;
use tracing as log;

use crate::infra::mailer;
#[cfg(doc)]
use crate::infra::Mailer;

use super::Email;

/// [`Smtp`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Indicator whether emails should be actually delivered.
    ///
    /// Disabled [`Smtp`] logs and drops every email.
    pub enabled: bool,

    /// Host of the SMTP relay.
    pub host: String,

    /// Port of the SMTP relay.
    pub port: u16,

    /// Username to authenticate on the SMTP relay with.
    pub username: Option<String>,

    /// Password to authenticate on the SMTP relay with.
    pub password: Option<SecretString>,

    /// Sender of the emails, either `address` or `Name <address>`.
    pub sender: String,
}

/// SMTP [`Mailer`] delivering emails through a STARTTLS relay.
#[derive(Clone, Debug)]
pub struct Smtp {
    /// Transport to deliver emails with.
    ///
    /// [`None`] if the [`Smtp`] is disabled.
    #[debug(skip)]
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,

    /// [`Mailbox`] to send emails from.
    sender: Mailbox,
}

impl Smtp {
    /// Creates a new [`Smtp`] [`Mailer`] with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the [`Config::sender`] is not a valid [`Mailbox`], or the relay
    /// cannot be set up.
    pub fn new(conf: &Config) -> Result<Self, Traced<mailer::Error>> {
        let sender = conf
            .sender
            .parse::<Mailbox>()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        if !conf.enabled {
            log::warn!("SMTP mailer is disabled, emails will be dropped");
            return Ok(Self {
                transport: None,
                sender,
            });
        }

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&conf.host)
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?
                .port(conf.port);
        if let (Some(user), Some(pass)) = (&conf.username, &conf.password) {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                pass.expose_secret().to_owned(),
            ));
        }

        Ok(Self {
            transport: Some(Arc::new(builder.build())),
            sender,
        })
    }

    /// Builds a multipart [`Message`] out of the provided [`Email`].
    fn message(&self, email: Email) -> Result<Message, Traced<Error>> {
        let Email {
            to,
            subject,
            html,
            text,
        } = email;

        let to = AsRef::<str>::as_ref(&to)
            .parse::<Mailbox>()
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl mailer::Mailer<Send<Email>> for Smtp {
    type Ok = ();
    type Err = Traced<mailer::Error>;

    async fn execute(
        &self,
        Send(email): Send<Email>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(transport) = &self.transport else {
            log::info!(
                "SMTP mailer is disabled, dropping email `{}` to `{}`",
                email.subject,
                email.to,
            );
            return Ok(());
        };

        let to = email.to.clone();
        let message = self.message(email).map_err(tracerr::map_from)?;
        drop(
            transport
                .send(message)
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?,
        );
        log::debug!("email delivered to `{to}`");

        Ok(())
    }
}

/// [`Smtp`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Invalid email address.
    #[display("Invalid email address: {_0}")]
    Address(lettre::address::AddressError),

    /// Failed to build a [`Message`].
    #[display("Failed to build email message: {_0}")]
    Message(lettre::error::Error),

    /// SMTP transport error.
    #[display("SMTP transport failed: {_0}")]
    Transport(lettre::transport::smtp::Error),
}
