//! [`Query`] collection related to the multiple [`Client`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{client, Client},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Client`]s by their [`client::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<client::Id, Client>, Vec<client::Id>>>;

/// Queries a list of [`Client`]s.
pub type List =
    DatabaseQuery<By<read::client::list::Page, read::client::list::Selector>>;

/// Queries total count of [`Client`]s.
pub type TotalCount = DatabaseQuery<By<read::client::list::TotalCount, ()>>;
