//! [`Command`] for returning a lent [`Material`].

use common::{
    operations::{
        By, Commit, Delete, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{loan, material, user, Loan, Material},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for returning a lent [`Material`].
///
/// Appends a [`loan::Record`] to the lending history, reactivates the
/// [`Material`] and removes the [`Loan`].
#[derive(Clone, Debug)]
pub struct ReturnLoan {
    /// ID of the [`Loan`] to be closed.
    pub loan_id: loan::Id,

    /// [`Date`] when the [`Material`] was returned.
    ///
    /// Today if [`None`].
    pub returned_on: Option<loan::record::ReturnDate>,

    /// [`loan::Notes`] on the return.
    ///
    /// [`Loan`]'s ones are kept if [`None`].
    pub notes: Option<loan::Notes>,

    /// ID of the [`User`] registering the return.
    ///
    /// [`User`]: crate::domain::User
    pub initiator_id: user::Id,
}

impl<Db, M> Command<ReturnLoan> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Loan>, loan::Id>>,
            Ok = Option<Loan>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<loan::Record>, Err = Traced<database::Error>>
        + Database<Update<Material>, Err = Traced<database::Error>>
        + Database<Delete<By<Loan, loan::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = loan::Record;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ReturnLoan) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReturnLoan {
            loan_id,
            returned_on,
            notes,
            initiator_id,
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

        let loan = tx
            .execute(Select(By::<Option<Loan>, _>::new(loan_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LoanNotExists(loan_id))
            .map_err(tracerr::wrap!())?;
        let mut material = tx
            .execute(Select(By::<Option<Material>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MaterialNotExists(material_id))
            .map_err(tracerr::wrap!())?;

        let returned_on =
            returned_on.unwrap_or_else(|| Date::today().coerce());
        if loan.issued_on.days_until(&returned_on) < 0 {
            return Err(tracerr::new!(E::ReturnedBeforeIssued));
        }

        let record = loan::Record {
            id: loan::record::Id::new(),
            material_id: Some(material_id),
            material_code: material.code.clone(),
            material_name: material.name.clone(),
            borrower: loan.borrower,
            issued_on: loan.issued_on,
            due_on: loan.due_on,
            returned_on,
            notes: notes.or(loan.notes),
            registered_by: initiator_id,
            created_at: DateTime::now().coerce(),
        };
        material.is_active = true;

        tx.execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(material))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Delete(By::<Loan, _>::new(loan_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(record)
    }
}

/// Error of [`ReturnLoan`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Loan`] doesn't exist.
    #[display("`Loan(id: {_0})` does not exist")]
    LoanNotExists(#[error(not(source))] loan::Id),

    /// Lent [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// Return [`Date`] is before the issue one.
    #[display("`Material` cannot be returned before being lent")]
    ReturnedBeforeIssued,
}
