//! [`Command`] for deleting a [`Material`].

use common::{
    operations::{
        By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{material, Loan, Material, Notification},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Material`].
///
/// A lent [`Material`] cannot be deleted until its [`Loan`] is returned.
#[derive(Clone, Copy, Debug)]
pub struct DeleteMaterial {
    /// ID of the [`Material`] to be deleted.
    pub material_id: material::Id,
}

impl<Db, M> Command<DeleteMaterial> for Service<Db, M>
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
        cmd: DeleteMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteMaterial { material_id } = cmd;

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

        let loan = tx
            .execute(Select(By::<Option<Loan>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if loan.is_some() {
            return Err(tracerr::new!(E::MaterialLent(material_id)));
        }

        material.deleted_at = Some(DateTime::now().coerce());
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

/// Error of [`DeleteMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] is currently lent.
    #[display("`Material(id: {_0})` is lent")]
    MaterialLent(#[error(not(source))] material::Id),

    /// [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),
}
