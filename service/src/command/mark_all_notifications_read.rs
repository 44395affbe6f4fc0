//! [`Command`] for marking every [`Notification`] of a [`User`] as read.

use common::operations::{By, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, Notification},
    infra::{database, Database},
    read, Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for marking every unread [`Notification`] of a [`User`] as
/// read.
#[derive(Clone, Copy, Debug)]
pub struct MarkAllNotificationsRead {
    /// ID of the [`User`] whose [`Notification`]s are marked.
    pub initiator_id: user::Id,
}

impl<Db, M> Command<MarkAllNotificationsRead> for Service<Db, M>
where
    Db: Database<
        Update<By<Notification, read::notification::UnreadOf>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    /// Number of the marked [`Notification`]s.
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkAllNotificationsRead,
    ) -> Result<Self::Ok, Self::Err> {
        let MarkAllNotificationsRead { initiator_id } = cmd;

        self.database()
            .execute(Update(By::new(read::notification::UnreadOf(
                initiator_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`MarkAllNotificationsRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
