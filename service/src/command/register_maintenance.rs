//! [`Command`] for registering a performed maintenance of a [`Material`].

use common::{
    operations::{
        By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
    },
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::material::MaintenanceSchedule;
use crate::{
    domain::{material, Material, Notification},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for registering a maintenance of a [`Material`] performed
/// today.
///
/// Restarts the [`MaintenanceSchedule`] and withdraws the unread maintenance
/// [`Notification`]s about the [`Material`].
#[derive(Clone, Copy, Debug)]
pub struct RegisterMaintenance {
    /// ID of the maintained [`Material`].
    pub material_id: material::Id,
}

impl<Db, M> Command<RegisterMaintenance> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Material>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Notification, read::notification::UnreadAbout>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<read::material::AlertedState, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Material;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterMaintenance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterMaintenance { material_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Material`.
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

        material
            .maintenance
            .as_mut()
            .ok_or(E::NoSchedule(material_id))
            .map_err(tracerr::wrap!())?
            .register(Date::today());

        tx.execute(Update(material.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Delete(By::new(read::notification::UnreadAbout(
            material_id,
        ))))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;
        tx.execute(Delete(By::<read::material::AlertedState, _>::new(
            material_id,
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(material)
    }
}

/// Error of [`RegisterMaintenance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// [`Material`] has no [`MaintenanceSchedule`].
    #[display("`Material(id: {_0})` has no maintenance schedule")]
    NoSchedule(#[error(not(source))] material::Id),
}
