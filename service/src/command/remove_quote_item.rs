//! [`Command`] for removing a [`quote::Item`] from a [`Quote`].

use common::{
    operations::{
        By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        quote::{self, item},
        Quote,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`quote::Item`] from a draft [`Quote`].
///
/// Recomputes the [`quote::Totals`] of the [`Quote`].
#[derive(Clone, Copy, Debug)]
pub struct RemoveQuoteItem {
    /// ID of the [`quote::Item`] to be removed.
    pub item_id: item::Id,
}

impl<Db, M> Command<RemoveQuoteItem> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<quote::Item>, item::Id>>,
            Ok = Option<quote::Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<quote::Item>, quote::Id>>,
            Ok = Vec<quote::Item>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<
            Delete<By<quote::Item, item::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveQuoteItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveQuoteItem { item_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let quote_id = tx
            .execute(Select(By::<Option<quote::Item>, _>::new(item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?
            .quote_id;

        tx.execute(Lock(By::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut quote = tx
            .execute(Select(By::<Option<Quote>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;
        if !quote.status.is_editable() {
            return Err(tracerr::new!(E::NotEditable(quote.status)));
        }

        let items = tx
            .execute(Select(By::<Vec<quote::Item>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let remaining = items.iter().filter(|i| i.id != item_id);
        // Removing can only lower the amount of currencies involved.
        _ = quote.recompute(remaining, self.config().quotes.vat_rate);
        quote.updated_at = DateTime::now().coerce();

        tx.execute(Delete(By::<quote::Item, _>::new(item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(quote.clone()))
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

/// Error of [`RemoveQuoteItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`quote::Item`] doesn't exist.
    #[display("`quote::Item(id: {_0})` does not exist")]
    ItemNotExists(#[error(not(source))] item::Id),

    /// [`Quote`] is not a draft anymore.
    #[display("`Quote` cannot be edited in `{_0}` status")]
    NotEditable(#[error(not(source))] quote::Status),
}
