//! [`Command`] for creating a new [`Quote`].

use common::{
    money::Currency,
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        client::{self, representative, Representative},
        quote, user, Client, Quote,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for creating a new draft [`Quote`].
///
/// The [`quote::Number`] is issued as the next one in the current year.
#[derive(Clone, Debug)]
pub struct CreateQuote {
    /// ID of the [`Client`] the [`Quote`] is addressed to.
    pub client_id: client::Id,

    /// ID of the [`Representative`] of the [`Client`] the [`Quote`] is
    /// addressed to.
    pub representative_id: Option<representative::Id>,

    /// [`quote::Reference`] of the work being quoted.
    pub reference: quote::Reference,

    /// [`quote::Location`] of the work being quoted.
    pub location: quote::Location,

    /// [`quote::DueDate`] of the [`Quote`].
    pub due_on: Option<quote::DueDate>,

    /// [`Currency`] of the [`Quote`].
    ///
    /// Configured default one is used if [`None`].
    pub currency: Option<Currency>,

    /// Travel expenses of the [`Quote`].
    pub travel_expenses: Option<Money>,

    /// Internal [`quote::Notes`] on the [`Quote`].
    pub notes: Option<quote::Notes>,

    /// ID of the [`User`] creating the [`Quote`].
    ///
    /// [`User`]: crate::domain::User
    pub initiator_id: user::Id,
}

impl<Db, M> Command<CreateQuote> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Representative>, representative::Id>>,
            Ok = Option<Representative>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Quote, read::quote::Year>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<quote::Number>, read::quote::Year>>,
            Ok = Option<quote::Number>,
            Err = Traced<database::Error>,
        > + Database<Insert<Quote>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateQuote) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateQuote {
            client_id,
            representative_id,
            reference,
            location,
            due_on,
            currency,
            travel_expenses,
            notes,
            initiator_id,
        } = cmd;

        let currency =
            currency.unwrap_or(self.config().quotes.default_currency);
        let travel_expenses =
            travel_expenses.unwrap_or_else(|| Money::zero(currency));
        if travel_expenses.currency != currency {
            return Err(tracerr::new!(E::CurrencyMismatch(travel_expenses)));
        }
        if travel_expenses.is_negative() {
            return Err(tracerr::new!(E::NegativeTravelExpenses(
                travel_expenses
            )));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.deleted_at.is_none())
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        let representative = match representative_id {
            Some(id) => Some(
                tx.execute(Select(By::<Option<Representative>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .filter(|r| r.client_id == client.id)
                    .ok_or(E::RepresentativeNotExists(id))
                    .map_err(tracerr::wrap!())?,
            ),
            None => None,
        };

        let now = DateTime::now();
        let year = read::quote::Year(now.year());

        // Serialize numbering of `Quote`s within the same year.
        tx.execute(Lock(By::<Quote, _>::new(year)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        let last = tx
            .execute(Select(By::<Option<quote::Number>, _>::new(year)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut quote = Quote {
            id: quote::Id::new(),
            number: quote::Number::next(year.0, last.as_ref()),
            client_id: Some(client.id),
            client_name: client.name,
            representative_id: None,
            representative_name: None,
            reference,
            location,
            status: quote::Status::Draft,
            due_on,
            currency,
            travel_expenses,
            totals: quote::Totals::zero(currency),
            notes,
            created_by: initiator_id,
            token: None,
            sent_at: None,
            sent_to: None,
            responded_at: None,
            rejection_reason: None,
            client_comments: None,
            finalized_at: None,
            feedback_requested: false,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        quote.address_to(representative.as_ref());
        if !quote.recompute([], self.config().quotes.vat_rate) {
            return Err(tracerr::new!(E::CurrencyMismatch(travel_expenses)));
        }

        tx.execute(Insert(quote.clone()))
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

/// Error of [`CreateQuote`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Client`] doesn't exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),

    /// Amount is not in the [`Currency`] of the [`Quote`].
    #[display("`{_0}` is not in the `Quote` currency")]
    CurrencyMismatch(#[error(not(source))] Money),

    /// Travel expenses are negative.
    #[display("Travel expenses cannot be negative: {_0}")]
    NegativeTravelExpenses(#[error(not(source))] Money),

    /// [`Representative`] doesn't exist or represents another [`Client`].
    #[display("`Representative(id: {_0})` of the `Client` does not exist")]
    RepresentativeNotExists(#[error(not(source))] representative::Id),
}
