//! [`Command`] for assigning an employee to a labor [`quote::Item`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        job,
        quote::{self, item},
        user, Job, Notification, Quote, User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for assigning an employee [`User`] to a labor [`quote::Item`]
/// of an approved [`Quote`].
///
/// The assigned employee is notified.
#[derive(Clone, Copy, Debug)]
pub struct AssignJob {
    /// ID of the labor [`quote::Item`] to assign the employee to.
    pub item_id: item::Id,

    /// ID of the employee [`User`] to be assigned.
    pub employee_id: user::Id,

    /// ID of the [`User`] assigning the [`Job`].
    pub initiator_id: user::Id,
}

impl<Db, M> Command<AssignJob> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<quote::Item>, item::Id>>,
            Ok = Option<quote::Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Job>, (user::Id, item::Id)>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<Insert<Job>, Err = Traced<database::Error>>
        + Database<Insert<Notification>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AssignJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignJob {
            item_id,
            employee_id,
            initiator_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let item = tx
            .execute(Select(By::<Option<quote::Item>, _>::new(item_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;
        let &item::Line::Labor { hours, .. } = &item.line else {
            return Err(tracerr::new!(E::NotLabor(item.kind())));
        };

        // Keeps the `Quote` approved while the `Job` is assigned.
        tx.execute(Lock(By::new(item.quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let quote = tx
            .execute(Select(By::<Option<Quote>, _>::new(item.quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;
        if quote.status != quote::Status::Approved {
            return Err(tracerr::new!(E::QuoteNotApproved(quote.status)));
        }

        let employee = tx
            .execute(Select(By::<Option<User>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if employee.is_none() {
            return Err(tracerr::new!(E::UserNotExists(employee_id)));
        }

        let existing = tx
            .execute(Select(By::<Option<Job>, _>::new((employee_id, item_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(job) = existing {
            return Err(tracerr::new!(E::AlreadyAssigned(job.id)));
        }

        let now = DateTime::now();
        let job = Job {
            id: job::Id::new(),
            quote_id: quote.id,
            item_id,
            employee_id,
            status: job::Status::Pending,
            estimated_hours: hours,
            worked_hours: item::Quantity::ZERO,
            notes: None,
            assigned_by: initiator_id,
            started_at: None,
            finished_at: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        tx.execute(Insert(job.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(Notification::job_assigned(&job, &quote)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(job)
    }
}

/// Error of [`AssignJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Employee is already assigned to the [`quote::Item`].
    #[display("Employee is already assigned by `Job(id: {_0})`")]
    AlreadyAssigned(#[error(not(source))] job::Id),

    /// [`quote::Item`] doesn't exist.
    #[display("`quote::Item(id: {_0})` does not exist")]
    ItemNotExists(#[error(not(source))] item::Id),

    /// [`quote::Item`] is not a labor one.
    #[display("`Job`s can be assigned on labor items only, not `{_0}`")]
    NotLabor(#[error(not(source))] item::Kind),

    /// [`Quote`] is not approved.
    #[display("`Job`s can be assigned on approved `Quote`s only, not `{_0}`")]
    QuoteNotApproved(#[error(not(source))] quote::Status),

    /// Employee [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
