//! [`Command`] for lending a [`Material`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for lending a [`Material`] to a third party.
///
/// The lent [`Material`] becomes inactive until returned.
#[derive(Clone, Debug)]
pub struct CreateLoan {
    /// ID of the [`Material`] to be lent.
    pub material_id: material::Id,

    /// [`loan::Borrower`] of the [`Material`].
    pub borrower: loan::Borrower,

    /// [`Date`] when the [`Material`] is lent.
    ///
    /// Today if [`None`].
    pub issued_on: Option<loan::IssueDate>,

    /// [`Date`] when the [`Material`] is expected back.
    pub due_on: loan::DueDate,

    /// [`loan::Notes`] on the [`Loan`].
    pub notes: Option<loan::Notes>,

    /// ID of the [`User`] registering the [`Loan`].
    ///
    /// [`User`]: crate::domain::User
    pub initiator_id: user::Id,
}

impl<Db, M> Command<CreateLoan> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Loan>, material::Id>>,
            Ok = Option<Loan>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Loan>, Err = Traced<database::Error>>
        + Database<Update<Material>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Loan;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateLoan) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLoan {
            material_id,
            borrower,
            issued_on,
            due_on,
            notes,
            initiator_id,
        } = cmd;

        let issued_on = issued_on.unwrap_or_else(|| Date::today().coerce());
        if !Loan::is_period_valid(issued_on, due_on) {
            return Err(tracerr::new!(E::InvalidPeriod));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // `Loan`s are serialized by the lent `Material`.
        tx.execute(Lock(By::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut material = tx
            .execute(Select(By::<Option<Material>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MaterialNotExists(material_id))
            .map_err(tracerr::wrap!())?;

        let lent = tx
            .execute(Select(By::<Option<Loan>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(loan) = lent {
            return Err(tracerr::new!(E::AlreadyLent(loan.id)));
        }
        if !material.is_active {
            return Err(tracerr::new!(E::MaterialInactive(material.code)));
        }

        let now = DateTime::now();
        let loan = Loan {
            id: loan::Id::new(),
            material_id,
            borrower,
            issued_on,
            due_on,
            notes,
            registered_by: initiator_id,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        material.is_active = false;

        tx.execute(Insert(loan.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(material))
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

/// Error of [`CreateLoan`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] is already lent.
    #[display("`Material` is already lent by `Loan(id: {_0})`")]
    AlreadyLent(#[error(not(source))] loan::Id),

    /// Due [`Date`] is before the issue one.
    #[display("`Loan` cannot be due before being issued")]
    InvalidPeriod,

    /// [`Material`] is inactive.
    #[display("`Material` {_0} is inactive")]
    MaterialInactive(#[error(not(source))] material::Code),

    /// [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::{
        domain::{loan, user, Material},
        fixture,
        infra::database::memory::Memory,
        Command as _,
    };

    use super::{CreateLoan, ExecutionError};

    fn seed(db: &Memory, is_active: bool) -> Material {
        let mut material = fixture::material(None);
        material.is_active = is_active;
        _ = db.state().materials.insert(material.id, material.clone());
        material
    }

    fn lend(material: &Material) -> CreateLoan {
        CreateLoan {
            material_id: material.id,
            borrower: loan::Borrower::new("Constructora Rahue").unwrap(),
            issued_on: None,
            due_on: Date::today().add_days(7).unwrap().coerce(),
            notes: None,
            initiator_id: user::Id::new(),
        }
    }

    #[tokio::test]
    async fn deactivates_lent_material() {
        let db = Memory::default();
        let material = seed(&db, true);
        let service = fixture::service(db.clone(), ());

        let loan = service.execute(lend(&material)).await.unwrap();

        assert_eq!(loan.material_id, material.id);
        assert!(loan.issued_on == Date::today().coerce());
        let state = db.state();
        assert_eq!(state.loans.len(), 1);
        assert!(!state.materials[&material.id].is_active);
    }

    #[tokio::test]
    async fn rejects_already_lent_material() {
        let db = Memory::default();
        let material = seed(&db, true);
        let service = fixture::service(db.clone(), ());
        let first = service.execute(lend(&material)).await.unwrap();

        let err = service
            .execute(lend(&material))
            .await
            .unwrap_err()
            .into_inner();

        assert!(
            matches!(err, ExecutionError::AlreadyLent(id) if id == first.id),
            "{err}",
        );
        assert_eq!(db.state().loans.len(), 1);
    }

    #[tokio::test]
    async fn rejects_inactive_material() {
        let db = Memory::default();
        let material = seed(&db, false);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(lend(&material))
            .await
            .unwrap_err()
            .into_inner();

        assert!(
            matches!(
                &err,
                ExecutionError::MaterialInactive(code)
                    if *code == material.code,
            ),
            "{err}",
        );
        assert!(db.state().loans.is_empty());
    }

    #[tokio::test]
    async fn rejects_due_date_before_issue() {
        let db = Memory::default();
        let material = seed(&db, true);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(CreateLoan {
                due_on: Date::today().add_days(-1).unwrap().coerce(),
                ..lend(&material)
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::InvalidPeriod), "{err}");
        assert!(db.state().materials[&material.id].is_active);
    }
}
