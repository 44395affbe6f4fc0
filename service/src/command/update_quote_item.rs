//! [`Command`] for updating a [`quote::Item`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
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

use super::{add_quote_item::Output, Command};

/// [`Command`] for updating a [`quote::Item`] of a draft [`Quote`].
///
/// Recomputes the [`quote::Totals`] of the [`Quote`].
#[derive(Clone, Debug)]
pub struct UpdateQuoteItem {
    /// ID of the [`quote::Item`] to be updated.
    pub item_id: item::Id,

    /// New [`item::Line`] of the [`quote::Item`].
    pub line: Option<item::Line>,

    /// New [`item::Position`] of the [`quote::Item`].
    pub position: Option<item::Position>,
}

impl<Db, M> Command<UpdateQuoteItem> for Service<Db, M>
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
        > + Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Update<quote::Item>, Err = Traced<database::Error>>
        + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateQuoteItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateQuoteItem {
            item_id,
            line,
            position,
        } = cmd;

        if let Some(price) =
            line.as_ref().map(item::Line::unit_price).filter(Money::is_negative)
        {
            return Err(tracerr::new!(E::NegativePrice(price)));
        }

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

        let mut items = tx
            .execute(Select(By::<Vec<quote::Item>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;

        if let Some(line) = line {
            if line.unit_price().currency != quote.currency {
                return Err(tracerr::new!(E::CurrencyMismatch(
                    line.unit_price()
                )));
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
            item.line = line;
        }
        if let Some(position) = position {
            item.position = position;
        }
        let item = item.clone();

        if !quote.recompute(&items, self.config().quotes.vat_rate) {
            return Err(tracerr::new!(E::CurrencyMismatch(
                item.line.unit_price()
            )));
        }
        quote.updated_at = DateTime::now().coerce();

        tx.execute(Update(item.clone()))
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

/// Error of [`UpdateQuoteItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Price is not in the currency of the [`Quote`].
    #[display("`{_0}` is not in the `Quote` currency")]
    CurrencyMismatch(#[error(not(source))] Money),

    /// [`quote::Item`] doesn't exist.
    #[display("`quote::Item(id: {_0})` does not exist")]
    ItemNotExists(#[error(not(source))] item::Id),

    /// [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// Unit price is negative.
    #[display("Unit price cannot be negative: {_0}")]
    NegativePrice(#[error(not(source))] Money),

    /// [`Quote`] is not a draft anymore.
    #[display("`Quote` cannot be edited in `{_0}` status")]
    NotEditable(#[error(not(source))] quote::Status),
}
