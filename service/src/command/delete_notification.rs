//! [`Command`] for deleting a [`Notification`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{notification, user, Notification},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for deleting a [`Notification`] of a [`User`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteNotification {
    /// ID of the [`Notification`] to be deleted.
    pub notification_id: notification::Id,

    /// ID of the [`User`] the [`Notification`] must belong to.
    pub initiator_id: user::Id,
}

impl<Db, M> Command<DeleteNotification> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Notification>, notification::Id>>,
            Ok = Option<Notification>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Notification, notification::Id>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Notification;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteNotification,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteNotification {
            notification_id,
            initiator_id,
        } = cmd;

        let notification = self
            .database()
            .execute(Select(By::<Option<Notification>, _>::new(
                notification_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|n| n.user_id == initiator_id)
            .ok_or(E::NotificationNotExists(notification_id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(By::<Notification, _>::new(notification_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(notification)
    }
}

/// Error of [`DeleteNotification`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Notification`] doesn't exist or belongs to another [`User`].
    #[display("`Notification(id: {_0})` does not exist")]
    NotificationNotExists(#[error(not(source))] notification::Id),
}
