//! [`Query`] collection related to a single [`Client`].

use common::operations::By;

use crate::domain::{
    client::{self, representative, Representative},
    Client,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Client`] by its [`client::Id`].
pub type ById = DatabaseQuery<By<Option<Client>, client::Id>>;

/// Queries all the [`Representative`]s of a [`Client`] by its [`client::Id`],
/// in their display order.
pub type Representatives = DatabaseQuery<By<Vec<Representative>, client::Id>>;

/// Queries a [`Representative`] by its [`representative::Id`].
pub type RepresentativeById =
    DatabaseQuery<By<Option<Representative>, representative::Id>>;
