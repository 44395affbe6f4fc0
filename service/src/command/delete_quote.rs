//! [`Command`] for deleting a draft [`Quote`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{quote, Quote},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a draft [`Quote`] along with its
/// [`quote::Item`]s.
#[derive(Clone, Copy, Debug)]
pub struct DeleteQuote {
    /// ID of the [`Quote`] to be deleted.
    pub quote_id: quote::Id,
}

impl<Db, M> Command<DeleteQuote> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Delete<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteQuote) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteQuote { quote_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let quote = tx
            .execute(Select(By::<Option<Quote>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::QuoteNotExists(quote_id))
            .map_err(tracerr::wrap!())?;
        if !quote.status.is_editable() {
            return Err(tracerr::new!(E::NotDraft(quote.status)));
        }

        tx.execute(Delete(By::<Quote, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(quote)
    }
}

/// Error of [`DeleteQuote`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Quote`] is not a draft.
    #[display("Only draft `Quote`s can be deleted, this one is `{_0}`")]
    NotDraft(#[error(not(source))] quote::Status),

    /// [`Quote`] doesn't exist.
    #[display("`Quote(id: {_0})` does not exist")]
    QuoteNotExists(#[error(not(source))] quote::Id),
}
