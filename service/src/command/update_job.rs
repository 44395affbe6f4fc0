//! [`Command`] for updating the progress of a [`Job`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{job, quote::item, user, Job, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the progress of a [`Job`].
///
/// Employees may update only the [`Job`]s assigned to them, while
/// supervisors and higher may update any.
#[derive(Clone, Debug)]
pub struct UpdateJob {
    /// ID of the [`Job`] to be updated.
    pub job_id: job::Id,

    /// New [`job::Status`] of the [`Job`].
    pub status: Option<job::Status>,

    /// New number of hours actually worked.
    pub worked_hours: Option<item::Quantity>,

    /// New [`job::Notes`] of the [`Job`].
    pub notes: Option<Option<job::Notes>>,

    /// ID of the [`User`] updating the [`Job`].
    pub initiator_id: user::Id,
}

impl<Db, M> Command<UpdateJob> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Update<Job>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateJob {
            job_id,
            status,
            worked_hours,
            notes,
            initiator_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut job = tx
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::JobNotExists(job_id))
            .map_err(tracerr::wrap!())?;

        let initiator = tx
            .execute(Select(By::<Option<User>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if job.employee_id != initiator.id
            && !initiator.role.is_at_least(user::Role::Supervisor)
        {
            return Err(tracerr::new!(E::NotAllowed));
        }

        if let Some(status) = status {
            let from = job.status;
            if !job.transit(status) {
                return Err(tracerr::new!(E::WrongTransition {
                    from,
                    to: status,
                }));
            }
        }
        if let Some(hours) = worked_hours {
            job.worked_hours = hours;
        }
        if let Some(notes) = notes {
            job.notes = notes;
        }
        job.updated_at = DateTime::now().coerce();

        tx.execute(Update(job.clone()))
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

/// Error of [`UpdateJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] doesn't exist.
    #[display("`Job(id: {_0})` does not exist")]
    JobNotExists(#[error(not(source))] job::Id),

    /// Initiator is not allowed to update the [`Job`].
    #[display("Not allowed to update another employee's `Job`")]
    NotAllowed,

    /// Initiator [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`job::Status`] transition is not allowed.
    #[display("`Job` cannot move from `{from}` to `{to}`")]
    WrongTransition {
        /// Current [`job::Status`] of the [`Job`].
        from: job::Status,

        /// Requested [`job::Status`].
        to: job::Status,
    },
}
