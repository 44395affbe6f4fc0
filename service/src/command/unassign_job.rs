//! [`Command`] for unassigning a [`Job`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{job, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for unassigning an employee from a [`Job`].
#[derive(Clone, Copy, Debug)]
pub struct UnassignJob {
    /// ID of the [`Job`] to be removed.
    pub job_id: job::Id,
}

impl<Db, M> Command<UnassignJob> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Delete<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UnassignJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignJob { job_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let job = tx
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::JobNotExists(job_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Job, _>::new(job_id)))
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

/// Error of [`UnassignJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] doesn't exist.
    #[display("`Job(id: {_0})` does not exist")]
    JobNotExists(#[error(not(source))] job::Id),
}
