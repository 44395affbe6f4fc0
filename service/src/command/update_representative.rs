//! [`Command`] for updating a [`Representative`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for renaming or repositioning a [`Representative`].
///
/// Already addressed [`Quote`]s keep the former name.
#[derive(Clone, Debug)]
pub struct UpdateRepresentative {
    /// ID of the [`Representative`] to be updated.
    pub representative_id: representative::Id,

    /// New full name of the [`Representative`].
    pub name: Option<client::Name>,

    /// New [`representative::Position`] of the [`Representative`].
    pub position: Option<representative::Position>,
}

impl<Db, M> Command<UpdateRepresentative> for Service<Db, M>
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
        >
        + Database<Update<Representative>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Representative;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRepresentative,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRepresentative {
            representative_id,
            name,
            position,
        } = cmd;

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

        // Re-read under the lock, as it might be deleted meanwhile.
        let mut representative = tx
            .execute(Select(By::<Option<Representative>, _>::new(
                representative_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RepresentativeNotExists(representative_id))
            .map_err(tracerr::wrap!())?;

        if let Some(name) = name {
            representative.name = name;
        }
        if let Some(position) = position {
            representative.position = position;
        }

        tx.execute(Update(representative.clone()))
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

/// Error of [`UpdateRepresentative`] [`Command`] execution.
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
