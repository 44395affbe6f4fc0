//! Background environment running periodic [`Task`]s.

use std::{
    error::Error as StdError,
    future::{Future, IntoFuture},
};

use derive_more::Display;
use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Background environment running [`Task`]s on the current thread.
///
/// Resolves once any of the spawned [`Task`]s stops with an [`Error`].
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are run within.
    set: task::LocalSet,

    /// Named handles of the spawned [`Task`]s.
    handles: Vec<(&'static str, Handle)>,
}

/// Handle of a spawned [`Task`].
type Handle = task::JoinHandle<Result<(), Box<dyn StdError>>>;

impl Background {
    /// Spawns a new [`Task`] with the provided `name` inside this
    /// [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: StdError + 'static,
    {
        log::debug!("spawning `{name}` background task");
        let handle = self
            .set
            .spawn_local(future.map_err(|e| -> Box<dyn StdError> { Box::new(e) }));
        self.handles.push((name, handle));
    }

    /// Returns the names of the spawned [`Task`]s.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handles.iter().map(|(name, _)| *name)
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Error>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;

        let all = future::try_join_all(handles.into_iter().map(
            |(task, handle)| {
                handle.map(move |res| match res {
                    Ok(res) => res.map_err(|cause| Error { task, cause }),
                    Err(e) => Err(Error {
                        task,
                        cause: Box::new(e),
                    }),
                })
            },
        ));
        async move { set.run_until(all).await.map(drop) }.boxed_local()
    }
}

/// Error of a [`Task`] stopped in a [`Background`].
#[derive(Debug, Display, derive_more::Error)]
#[display("`{task}` background task stopped: {cause}")]
pub struct Error {
    /// Name of the stopped [`Task`].
    #[error(not(source))]
    pub task: &'static str,

    /// Cause of the [`Task`] being stopped.
    #[error(not(source))]
    pub cause: Box<dyn StdError>,
}

#[cfg(test)]
mod spec {
    use std::{convert::Infallible, future};

    use derive_more::{Display, Error};

    use super::Background;

    #[derive(Debug, Display, Error)]
    #[display("boom")]
    struct Boom;

    #[tokio::test]
    async fn resolves_with_the_failed_task() {
        let mut bg = Background::default();
        bg.spawn("forever", future::pending::<Result<(), Infallible>>());
        bg.spawn("failing", async { Err(Boom) });

        assert_eq!(bg.names().collect::<Vec<_>>(), ["forever", "failing"]);

        let err = bg.await.unwrap_err();
        assert_eq!(err.task, "failing");
        assert_eq!(err.to_string(), "`failing` background task stopped: boom");
    }
}
