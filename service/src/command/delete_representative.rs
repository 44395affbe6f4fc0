//! [`Command`] for deleting a [`Representative`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Quote;
use crate::{
    domain::{
        client::{self, representative, Representative},
        Client,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Representative`].
///
/// [`Quote`]s addressed to the [`Representative`] keep the backup of its
/// name.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRepresentative {
    /// ID of the [`Representative`] to be deleted.
    pub representative_id: representative::Id,
}

impl<Db, M> Command<DeleteRepresentative> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Representative>, representative::Id>>,
            Ok = Option<Representative>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Representative>, representative::Id>>,
            Ok = Option<Representative>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Representative, representative::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Representative;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteRepresentative,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRepresentative { representative_id } = cmd;

        let client_id = self
            .database()
            .execute(Select(By::<Option<Representative>, _>::new(
                representative_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RepresentativeNotExists(representative_id))
            .map_err(tracerr::wrap!())?
            .client_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let representative = tx
            .execute(Select(By::<Option<Representative>, _>::new(
                representative_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RepresentativeNotExists(representative_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Representative, _>::new(representative.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(representative)
    }
}

/// Error of [`DeleteRepresentative`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Representative`] doesn't exist.
    #[display("`Representative(id: {_0})` does not exist")]
    #[from(ignore)]
    RepresentativeNotExists(#[error(not(source))] representative::Id),
}
