//! [`Query`] collection related to the multiple [`User`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{user, User},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`User`]s by their [`user::Id`]s.
pub type ByIds = DatabaseQuery<By<HashMap<user::Id, User>, Vec<user::Id>>>;

/// Queries IDs of every [`User`] having exactly the provided [`user::Role`].
pub type IdsByRole = DatabaseQuery<By<Vec<user::Id>, user::Role>>;

/// Queries a list of [`User`]s.
pub type List =
    DatabaseQuery<By<read::user::list::Page, read::user::list::Selector>>;

/// Queries total count of active [`User`]s.
pub type TotalCount = DatabaseQuery<By<read::user::list::TotalCount, ()>>;
