//! [`Command`] for updating a [`Loan`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{loan, material, Loan, Material},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an active [`Loan`].
///
/// [`None`] fields are left untouched, while `Some(None)` ones are cleared.
#[derive(Clone, Debug)]
pub struct UpdateLoan {
    /// ID of the [`Loan`] to be updated.
    pub loan_id: loan::Id,

    /// New [`loan::Borrower`] of the lent [`Material`].
    pub borrower: Option<loan::Borrower>,

    /// New due [`Date`] of the [`Loan`].
    ///
    /// [`Date`]: common::Date
    pub due_on: Option<loan::DueDate>,

    /// New [`loan::Notes`] on the [`Loan`].
    pub notes: Option<Option<loan::Notes>>,
}

impl<Db, M> Command<UpdateLoan> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Loan>, loan::Id>>,
            Ok = Option<Loan>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Loan>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Loan;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateLoan) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateLoan {
            loan_id,
            borrower,
            due_on,
            notes,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let material_id = tx
            .execute(Select(By::<Option<Loan>, _>::new(loan_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LoanNotExists(loan_id))
            .map_err(tracerr::wrap!())?
            .material_id;

        tx.execute(Lock(By::<Material, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Re-read under the lock, as the `Loan` might have been returned.
        let mut loan = tx
            .execute(Select(By::<Option<Loan>, _>::new(loan_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LoanNotExists(loan_id))
            .map_err(tracerr::wrap!())?;

        if let Some(borrower) = borrower {
            loan.borrower = borrower;
        }
        if let Some(due_on) = due_on {
            if !Loan::is_period_valid(loan.issued_on, due_on) {
                return Err(tracerr::new!(E::InvalidPeriod));
            }
            loan.due_on = due_on;
        }
        if let Some(notes) = notes {
            loan.notes = notes;
        }
        loan.updated_at = DateTime::now().coerce();

        tx.execute(Update(loan.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(loan)
    }
}

/// Error of [`UpdateLoan`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Due date is before the issue one.
    #[display("`Loan` cannot be due before being issued")]
    InvalidPeriod,

    /// [`Loan`] doesn't exist.
    #[display("`Loan(id: {_0})` does not exist")]
    LoanNotExists(#[error(not(source))] loan::Id),
}
