//! [`Command`] for adding a [`Representative`] to a [`Client`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        client::{self, representative, Representative},
        Client,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Representative`] to a [`Client`].
#[derive(Clone, Debug)]
pub struct CreateRepresentative {
    /// ID of the [`Client`] the [`Representative`] belongs to.
    pub client_id: client::Id,

    /// Full name of the [`Representative`].
    pub name: client::Name,

    /// [`representative::Position`] of the [`Representative`].
    ///
    /// Goes after the existing ones if [`None`].
    pub position: Option<representative::Position>,
}

impl<Db, M> Command<CreateRepresentative> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Representative>, client::Id>>,
            Ok = Vec<Representative>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        >
        + Database<Insert<Representative>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Representative;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRepresentative,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRepresentative {
            client_id,
            name,
            position,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Representatives are positioned relative to each other.
        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.deleted_at.is_none())
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        let position = match position {
            Some(p) => p,
            None => tx
                .execute(Select(By::<Vec<Representative>, _>::new(client.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .iter()
                .map(|r| i32::from(r.position).saturating_add(1))
                .max()
                .unwrap_or_default()
                .into(),
        };

        let representative = Representative {
            id: representative::Id::new(),
            client_id: client.id,
            name,
            position,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(representative.clone()))
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

/// Error of [`CreateRepresentative`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Client`] doesn't exist.
    #[display("`Client(id: {_0})` does not exist")]
    #[from(ignore)]
    ClientNotExists(#[error(not(source))] client::Id),
}
