//! [`Command`] for sending a [`Quote`] to its [`Client`].

use common::{
    operations::{By, Commit, Lock, Select, Send, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{client, contact, quote, Client, Quote},
    infra::{database, mailer, Database, Mailer},
    Service,
};

use super::Command;

/// [`Command`] for sending a [`Quote`] to its [`Client`] by email, along with
/// the public link to respond to it.
///
/// Issues a [`quote::Token`] on the first sending, and moves the [`Quote`]
/// into the [`quote::Status::Sent`] status. Both are committed before the
/// email is delivered, so a delivery failure leaves the [`Quote`] sent and
/// its link valid for a later resending.
#[derive(Clone, Debug)]
pub struct SendQuote {
    /// ID of the [`Quote`] to be sent.
    pub quote_id: quote::Id,

    /// Email address to send the [`Quote`] to.
    ///
    /// [`Client`]'s one is used if [`None`].
    pub to: Option<contact::Email>,
}

impl<Db, M> Command<SendQuote> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<quote::Item>, quote::Id>>,
            Ok = Vec<quote::Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    M: Mailer<Send<mailer::Email>, Ok = (), Err = Traced<mailer::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SendQuote) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendQuote { quote_id, to } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut quote = tx
            .execute(Select(By::<Option<Quote>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::QuoteNotExists(quote_id))
            .map_err(tracerr::wrap!())?;
        if !quote.status.can_become(quote::Status::Sent) {
            return Err(tracerr::new!(E::WrongStatus(quote.status)));
        }

        let items = tx
            .execute(Select(By::<Vec<quote::Item>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if items.is_empty() {
            return Err(tracerr::new!(E::NoItems(quote.number)));
        }

        let to = if let Some(to) = to {
            to
        } else {
            let client = match quote.client_id {
                Some(id) => tx
                    .execute(Select(By::<Option<Client>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
                None => None,
            };
            client
                .and_then(|c| c.email)
                .ok_or(E::NoRecipient)
                .map_err(tracerr::wrap!())?
        };

        let token = quote.token.get_or_insert_with(quote::Token::generate);
        let link = self.config().quotes.response_link(token);

        if !quote.transit(quote::Status::Sent) {
            return Err(tracerr::new!(E::WrongStatus(quote.status)));
        }
        quote.sent_at = Some(DateTime::now().coerce());
        quote.sent_to = Some(to.clone());

        tx.execute(Update(quote.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Retried delivery must not hold the `Quote` lock.
        self.mailer()
            .execute(Send(mailer::Email::quote_offer(
                to.clone(),
                &quote,
                &items,
                &link,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!("`Quote` {} sent to `{to}`", quote.number);

        Ok(quote)
    }
}

/// Error of [`SendQuote`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Mailer`] error, once the [`Quote`] is already marked as sent.
    #[display("Failed to send email: {_0}")]
    #[from]
    Mailer(mailer::Error),

    /// [`Quote`] has no [`quote::Item`]s to be sent.
    #[display("`Quote` {_0} has no items")]
    NoItems(#[error(not(source))] quote::Number),

    /// Neither an explicit email address is provided, nor the [`Client`] has
    /// one.
    #[display("No email address to send the `Quote` to")]
    NoRecipient,

    /// [`Quote`] doesn't exist.
    #[display("`Quote(id: {_0})` does not exist")]
    QuoteNotExists(#[error(not(source))] quote::Id),

    /// [`Quote`] cannot be sent in its current [`quote::Status`].
    #[display("`Quote` cannot be sent in `{_0}` status")]
    WrongStatus(#[error(not(source))] quote::Status),
}

#[cfg(all(test, feature = "smtp"))]
mod spec {
    use crate::{
        domain::{contact, material, quote::Status, Quote},
        fixture,
        infra::{database::memory::Memory, mailer::outbox::Outbox},
        Command as _,
    };

    use super::{ExecutionError, SendQuote};

    fn seed(db: &Memory) -> Quote {
        let quote = fixture::quote(Status::Draft);
        let mut state = db.state();
        state.items.push(fixture::material_item(
            quote.id,
            material::Id::new(),
            "0",
        ));
        _ = state.quotes.insert(quote.id, quote.clone());
        quote
    }

    fn recipient() -> contact::Email {
        contact::Email::new("compras@canelos.cl").unwrap()
    }

    #[tokio::test]
    async fn sends_response_link() {
        let db = Memory::default();
        let quote = seed(&db);
        let outbox = Outbox::default();
        let service = fixture::service(db.clone(), outbox.clone());

        let sent = service
            .execute(SendQuote {
                quote_id: quote.id,
                to: Some(recipient()),
            })
            .await
            .unwrap();

        assert_eq!(sent.status, Status::Sent);
        assert_eq!(sent.sent_to, Some(recipient()));
        let emails = outbox.sent();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to, recipient());
        let token = sent.token.unwrap();
        assert!(emails[0].html.contains(AsRef::<str>::as_ref(&token)));
    }

    #[tokio::test]
    async fn stays_sent_when_delivery_fails() {
        let db = Memory::default();
        let quote = seed(&db);
        let service = fixture::service(db.clone(), Outbox::failing());

        let err = service
            .execute(SendQuote {
                quote_id: quote.id,
                to: Some(recipient()),
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::Mailer(_)), "{err}");
        let state = db.state();
        let stored = &state.quotes[&quote.id];
        assert_eq!(stored.status, Status::Sent);
        assert_eq!(stored.sent_to, Some(recipient()));
        assert_eq!(stored.token, quote.token);
    }

    #[tokio::test]
    async fn refuses_quote_without_items() {
        let db = Memory::default();
        let quote = fixture::quote(Status::Draft);
        _ = db.state().quotes.insert(quote.id, quote.clone());
        let outbox = Outbox::default();
        let service = fixture::service(db.clone(), outbox.clone());

        let err = service
            .execute(SendQuote {
                quote_id: quote.id,
                to: Some(recipient()),
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::NoItems(_)), "{err}");
        assert!(outbox.sent().is_empty());
        assert_eq!(db.state().quotes[&quote.id].status, Status::Draft);
    }
}
