//! [`Tx`] client definitions.

use std::{mem, sync::Arc};

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{connection, Connection},
};

use super::NonTx;

/// Transactional Postgres database client.
///
/// The underlying [`connection::Transaction`] is begun lazily on the first
/// statement, so a [`Tx`] which never touched the database costs nothing.
/// Clones share the same [`connection::Transaction`].
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client to check a connection out of.
    origin: NonTx,

    /// [`State`] of the shared [`connection::Transaction`].
    state: Arc<RwLock<State>>,
}

/// State of the [`connection::Transaction`] behind a [`Tx`] client.
#[derive(Debug, Default)]
enum State {
    /// No statement has been run yet.
    #[default]
    Idle,

    /// [`connection::Transaction`] is open.
    Open(connection::Transaction),
}

impl Tx {
    /// Creates a new [`Tx`] client on top of the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(origin: NonTx) -> Self {
        Self {
            origin,
            state: Arc::default(),
        }
    }

    /// Returns the open [`connection::Transaction`], beginning it if needed.
    async fn transaction(
        &self,
    ) -> Result<
        RwLockReadGuard<'_, connection::Transaction>,
        Traced<database::Error>,
    > {
        let guard = match RwLockReadGuard::try_map(
            self.state.read().await,
            |s| match s {
                State::Open(tx) => Some(tx),
                State::Idle => None,
            },
        ) {
            Ok(tx) => return Ok(tx),
            Err(guard) => guard,
        };
        drop(guard);

        let mut state = self.state.write().await;
        if matches!(*state, State::Idle) {
            let conn =
                self.origin.checkout().await.map_err(tracerr::wrap!())?;
            *state = State::Open(
                connection::Transaction::begin(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(RwLockReadGuard::map(state.downgrade(), |s| match s {
            State::Open(tx) => tx,
            State::Idle => unreachable!("just begun"),
        }))
    }

    /// Commits the [`connection::Transaction`] of this [`Tx`] client, if it
    /// was begun at all.
    ///
    /// Any statement run afterwards begins a new [`connection::Transaction`].
    ///
    /// # Errors
    ///
    /// If Postgres fails to commit.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let state = mem::take(&mut *self.state.write().await);
        match state {
            State::Open(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            State::Idle => Ok(()),
        }
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.transaction()
            .await
            .map_err(tracerr::wrap!())?
            .query(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.transaction()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        self.transaction()
            .await
            .map_err(tracerr::wrap!())?
            .exec(stmt, params)
            .await
            .map_err(tracerr::wrap!())
    }
}
