//! [`Command`] for creating a new [`Client`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Client`].
#[derive(Clone, Debug)]
pub struct CreateClient {
    /// [`client::Name`] of a new [`Client`].
    pub name: client::Name,

    /// [`client::Rut`] of a new [`Client`].
    pub rut: Option<client::Rut>,

    /// [`client::Address`] of a new [`Client`].
    pub address: Option<client::Address>,

    /// [`client::Phone`] of a new [`Client`].
    pub phone: Option<client::Phone>,

    /// [`client::Email`] of a new [`Client`].
    pub email: Option<client::Email>,
}

impl<Db, M> Command<CreateClient> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Client>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateClient {
            name,
            rut,
            address,
            phone,
            email,
        } = cmd;

        let client = Client {
            id: client::Id::new(),
            name,
            rut,
            address,
            phone,
            email,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(client)
    }
}

/// Error of [`CreateClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
