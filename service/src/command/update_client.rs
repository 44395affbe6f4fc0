//! [`Command`] for updating a [`Client`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{client, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Client`].
///
/// [`None`] fields are left untouched, while `Some(None)` ones are cleared.
#[derive(Clone, Debug)]
pub struct UpdateClient {
    /// ID of the [`Client`] to be updated.
    pub client_id: client::Id,

    /// New [`client::Name`] of the [`Client`].
    pub name: Option<client::Name>,

    /// New [`client::Rut`] of the [`Client`].
    pub rut: Option<Option<client::Rut>>,

    /// New [`client::Address`] of the [`Client`].
    pub address: Option<Option<client::Address>>,

    /// New [`client::Phone`] of the [`Client`].
    pub phone: Option<Option<client::Phone>>,

    /// New [`client::Email`] of the [`Client`].
    pub email: Option<Option<client::Email>>,
}

impl<Db, M> Command<UpdateClient> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        >
        + Database<Update<Client>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateClient) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateClient {
            client_id,
            name,
            rut,
            address,
            phone,
            email,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Client`.
        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        if let Some(name) = name {
            client.name = name;
        }
        if let Some(rut) = rut {
            client.rut = rut;
        }
        if let Some(address) = address {
            client.address = address;
        }
        if let Some(phone) = phone {
            client.phone = phone;
        }
        if let Some(email) = email {
            client.email = email;
        }

        tx.execute(Update(client.clone()))
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

/// Error of [`UpdateClient`] [`Command`] execution.
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
