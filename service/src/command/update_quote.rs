//! [`Command`] for updating a draft [`Quote`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        client::{self, representative, Representative},
        quote, Client, Quote,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the header of a draft [`Quote`].
///
/// [`None`] fields are left untouched, while `Some(None)` ones are cleared.
#[derive(Clone, Debug)]
pub struct UpdateQuote {
    /// ID of the [`Quote`] to be updated.
    pub quote_id: quote::Id,

    /// ID of the new [`Client`] of the [`Quote`].
    ///
    /// Changing the [`Client`] clears the [`Representative`], unless a new
    /// one is provided as well.
    pub client_id: Option<client::Id>,

    /// ID of the new [`Representative`] the [`Quote`] is addressed to.
    pub representative_id: Option<Option<representative::Id>>,

    /// New [`quote::Reference`] of the [`Quote`].
    pub reference: Option<quote::Reference>,

    /// New [`quote::Location`] of the [`Quote`].
    pub location: Option<quote::Location>,

    /// New [`quote::DueDate`] of the [`Quote`].
    pub due_on: Option<Option<quote::DueDate>>,

    /// New travel expenses of the [`Quote`].
    pub travel_expenses: Option<Money>,

    /// New internal [`quote::Notes`] on the [`Quote`].
    pub notes: Option<Option<quote::Notes>>,
}

impl<Db, M> Command<UpdateQuote> for Service<Db, M>
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
        > + Database<
            Select<By<Option<Representative>, representative::Id>>,
            Ok = Option<Representative>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateQuote) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateQuote {
            quote_id,
            client_id,
            representative_id,
            reference,
            location,
            due_on,
            travel_expenses,
            notes,
        } = cmd;

        if let Some(money) = travel_expenses.filter(Money::is_negative) {
            return Err(tracerr::new!(E::NegativeTravelExpenses(money)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent modifications of the same `Quote`.
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

        if let Some(id) = client_id.filter(|id| quote.client_id != Some(*id)) {
            let client = tx
                .execute(Select(By::<Option<Client>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .filter(|c| c.deleted_at.is_none())
                .ok_or(E::ClientNotExists(id))
                .map_err(tracerr::wrap!())?;
            quote.client_id = Some(client.id);
            quote.client_name = client.name;
            quote.address_to(None);
        }
        match representative_id {
            Some(Some(id)) => {
                let representative = tx
                    .execute(Select(By::<Option<Representative>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .filter(|r| Some(r.client_id) == quote.client_id)
                    .ok_or(E::RepresentativeNotExists(id))
                    .map_err(tracerr::wrap!())?;
                quote.address_to(Some(&representative));
            }
            Some(None) => quote.address_to(None),
            None => {}
        }
        if let Some(reference) = reference {
            quote.reference = reference;
        }
        if let Some(location) = location {
            quote.location = location;
        }
        if let Some(due_on) = due_on {
            quote.due_on = due_on;
        }
        if let Some(notes) = notes {
            quote.notes = notes;
        }
        if let Some(money) = travel_expenses {
            quote.travel_expenses = money;

            let items = tx
                .execute(Select(By::<Vec<quote::Item>, _>::new(quote_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if !quote.recompute(&items, self.config().quotes.vat_rate) {
                return Err(tracerr::new!(E::CurrencyMismatch(money)));
            }
        }
        quote.updated_at = DateTime::now().coerce();

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

/// Error of [`UpdateQuote`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Client`] doesn't exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),

    /// Amount is not in the currency of the [`Quote`].
    #[display("`{_0}` is not in the `Quote` currency")]
    CurrencyMismatch(#[error(not(source))] Money),

    /// Travel expenses are negative.
    #[display("Travel expenses cannot be negative: {_0}")]
    NegativeTravelExpenses(#[error(not(source))] Money),

    /// [`Quote`] is not a draft anymore.
    #[display("`Quote` cannot be edited in `{_0}` status")]
    NotEditable(#[error(not(source))] quote::Status),

    /// [`Quote`] doesn't exist.
    #[display("`Quote(id: {_0})` does not exist")]
    QuoteNotExists(#[error(not(source))] quote::Id),

    /// [`Representative`] doesn't exist or represents another [`Client`].
    #[display("`Representative(id: {_0})` of the `Client` does not exist")]
    RepresentativeNotExists(#[error(not(source))] representative::Id),
}
