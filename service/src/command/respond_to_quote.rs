//! [`Command`] for a [`Client`] responding to a [`Quote`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{quote, Notification, Quote},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Client;

use super::Command;

/// [`Command`] for a [`Client`] responding to a [`Quote`] through its public
/// [`quote::Token`].
///
/// Notifies the creator of the [`Quote`] about the response.
#[derive(Clone, Debug)]
pub struct RespondToQuote {
    /// [`quote::Token`] of the [`Quote`] to respond to.
    pub token: quote::Token,

    /// [`quote::Response`] of the [`Client`].
    pub response: quote::Response,

    /// Optional [`quote::Comment`] of the [`Client`].
    pub comments: Option<quote::Comment>,
}

impl<Db, M> Command<RespondToQuote> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'t> Database<
            Select<By<Option<Quote>, &'t quote::Token>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Insert<Notification>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RespondToQuote,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RespondToQuote {
            token,
            response,
            comments,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let quote_id = tx
            .execute(Select(By::<Option<Quote>, _>::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvalidToken)
            .map_err(tracerr::wrap!())?
            .id;

        tx.execute(Lock(By::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Re-read under the lock, as the `Quote` might have changed.
        let mut quote = tx
            .execute(Select(By::<Option<Quote>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvalidToken)
            .map_err(tracerr::wrap!())?;
        if !quote.accepts_response() {
            return Err(tracerr::new!(E::NotAwaitingResponse(quote.status)));
        }
        if !quote.transit(response.status()) {
            return Err(tracerr::new!(E::NotAwaitingResponse(quote.status)));
        }

        quote.responded_at = Some(DateTime::now().coerce());
        quote.client_comments = comments;
        if let quote::Response::Reject(reason) = &response {
            quote.rejection_reason = Some(reason.clone());
        }

        tx.execute(Update(quote.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(Notification::quote_responded(&quote, &response)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("client {response} `Quote` {}", quote.number);

        Ok(quote)
    }
}

/// Error of [`RespondToQuote`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// No [`Quote`] has the provided [`quote::Token`].
    #[display("Invalid `Quote` token")]
    InvalidToken,

    /// [`Quote`] doesn't accept responses in its [`quote::Status`].
    #[display("`Quote` doesn't accept responses in `{_0}` status")]
    NotAwaitingResponse(#[error(not(source))] quote::Status),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            quote::{self, Response, Status},
            Quote,
        },
        fixture,
        infra::database::memory::Memory,
        Command as _,
    };

    use super::{ExecutionError, RespondToQuote};

    fn seed(db: &Memory, status: Status) -> Quote {
        let quote = fixture::quote(status);
        _ = db.state().quotes.insert(quote.id, quote.clone());
        quote
    }

    fn respond(quote: &Quote, response: Response) -> RespondToQuote {
        RespondToQuote {
            token: quote.token.clone().unwrap(),
            response,
            comments: None,
        }
    }

    #[tokio::test]
    async fn approves_sent_quote() {
        let db = Memory::default();
        let quote = seed(&db, Status::Sent);
        let service = fixture::service(db.clone(), ());

        let approved = service
            .execute(respond(&quote, Response::Approve))
            .await
            .unwrap();

        assert_eq!(approved.status, Status::Approved);
        assert!(approved.responded_at.is_some());
        let state = db.state();
        assert_eq!(state.quotes[&quote.id].status, Status::Approved);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].user_id, quote.created_by);
    }

    #[tokio::test]
    async fn rejects_reviewed_quote_with_reason() {
        let db = Memory::default();
        let quote = seed(&db, Status::Reviewed);
        let service = fixture::service(db.clone(), ());
        let reason = quote::Comment::new("Excede el presupuesto").unwrap();

        let rejected = service
            .execute(respond(&quote, Response::Reject(reason.clone())))
            .await
            .unwrap();

        assert_eq!(rejected.status, Status::Rejected);
        assert_eq!(rejected.rejection_reason, Some(reason));
    }

    #[tokio::test]
    async fn refuses_responses_outside_sent_or_reviewed() {
        for status in Status::ALL
            .iter()
            .copied()
            .filter(|s| !s.accepts_response())
        {
            let db = Memory::default();
            let quote = seed(&db, status);
            let service = fixture::service(db.clone(), ());

            let err = service
                .execute(respond(&quote, Response::Approve))
                .await
                .unwrap_err()
                .into_inner();

            assert!(
                matches!(
                    err,
                    ExecutionError::NotAwaitingResponse(s) if s == status,
                ),
                "{status}: {err}",
            );
            let state = db.state();
            assert_eq!(state.quotes[&quote.id].status, status);
            assert!(state.quotes[&quote.id].responded_at.is_none());
            assert!(state.notifications.is_empty());
        }
    }

    #[tokio::test]
    async fn refuses_unknown_token() {
        let db = Memory::default();
        _ = seed(&db, Status::Sent);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(RespondToQuote {
                token: quote::Token::generate(),
                response: Response::Approve,
                comments: None,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::InvalidToken), "{err}");
    }
}
