//! [`Database`]-related implementations.

#[cfg(test)]
pub(crate) mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Returns the name of the unique constraint violated by a concurrent
    /// insertion of a duplicate, if this [`Error`] is caused by one.
    #[must_use]
    pub fn duplicated_constraint(&self) -> Option<&str> {
        match *self {
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.violated_unique_constraint(),
        }
    }
}
