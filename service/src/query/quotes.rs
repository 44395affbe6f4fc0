//! [`Query`] collection related to the multiple [`Quote`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{quote, Quote},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Quote`]s by their [`quote::Id`]s.
pub type ByIds = DatabaseQuery<By<HashMap<quote::Id, Quote>, Vec<quote::Id>>>;

/// Queries a list of [`Quote`]s.
pub type List =
    DatabaseQuery<By<read::quote::list::Page, read::quote::list::Selector>>;

/// Queries total count of [`Quote`]s matching a [`read::quote::list::Filter`].
pub type TotalCount = DatabaseQuery<
    By<read::quote::list::TotalCount, read::quote::list::Filter>,
>;
