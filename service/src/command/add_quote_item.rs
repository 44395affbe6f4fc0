//! [`Command`] for adding a new [`quote::Item`] to a [`Quote`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        material,
        quote::{self, item},
        Material, Quote,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for appending a new [`quote::Item`] to a draft [`Quote`].
///
/// Recomputes the [`quote::Totals`] of the [`Quote`].
#[derive(Clone, Debug)]
pub struct AddQuoteItem {
    /// ID of the [`Quote`] to add the [`quote::Item`] to.
    pub quote_id: quote::Id,

    /// [`item::Line`] of the new [`quote::Item`].
    pub line: item::Line,
}

/// Output of [`AddQuoteItem`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Updated [`Quote`].
    pub quote: Quote,

    /// Added [`quote::Item`].
    pub item: quote::Item,
}

impl<Db, M> Command<AddQuoteItem> for Service<Db, M>
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
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Insert<quote::Item>, Err = Traced<database::Error>>
        + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddQuoteItem) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddQuoteItem { quote_id, line } = cmd;

        if line.unit_price().is_negative() {
            return Err(tracerr::new!(E::NegativePrice(line.unit_price())));
        }

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
        if !quote.status.is_editable() {
            return Err(tracerr::new!(E::NotEditable(quote.status)));
        }
        if line.unit_price().currency != quote.currency {
            return Err(tracerr::new!(E::CurrencyMismatch(line.unit_price())));
        }

        if let item::Line::Material {
            material_id: Some(id),
            ..
        } = &line
        {
            let material = tx
                .execute(Select(By::<Option<Material>, _>::new(*id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if material.is_none() {
                return Err(tracerr::new!(E::MaterialNotExists(*id)));
            }
        }

        let mut items = tx
            .execute(Select(By::<Vec<quote::Item>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let item = quote::Item {
            id: item::Id::new(),
            quote_id,
            position: items
                .iter()
                .map(|i| i.position)
                .max()
                .map_or_else(|| item::Position::from(1), item::Position::next),
            line,
        };
        items.push(item.clone());

        if !quote.recompute(&items, self.config().quotes.vat_rate) {
            return Err(tracerr::new!(E::CurrencyMismatch(
                item.line.unit_price()
            )));
        }
        quote.updated_at = DateTime::now().coerce();

        tx.execute(Insert(item.clone()))
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

        Ok(Output { quote, item })
    }
}

/// Error of [`AddQuoteItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Price is not in the currency of the [`Quote`].
    #[display("`{_0}` is not in the `Quote` currency")]
    CurrencyMismatch(#[error(not(source))] Money),

    /// [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// Unit price is negative.
    #[display("Unit price cannot be negative: {_0}")]
    NegativePrice(#[error(not(source))] Money),

    /// [`Quote`] is not a draft anymore.
    #[display("`Quote` cannot be edited in `{_0}` status")]
    NotEditable(#[error(not(source))] quote::Status),

    /// [`Quote`] doesn't exist.
    #[display("`Quote(id: {_0})` does not exist")]
    QuoteNotExists(#[error(not(source))] quote::Id),
}
