//! [`Query`] collection related to the multiple [`Job`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{quote, Job},
    read,
};

use super::DatabaseQuery;

/// Queries every [`Job`] of a [`Quote`].
///
/// [`Quote`]: crate::domain::Quote
pub type ByQuote = DatabaseQuery<By<Vec<Job>, quote::Id>>;

/// Queries a list of [`Job`]s.
pub type List =
    DatabaseQuery<By<read::job::list::Page, read::job::list::Selector>>;

/// Queries total count of [`Job`]s matching a [`read::job::list::Filter`].
pub type TotalCount =
    DatabaseQuery<By<read::job::list::TotalCount, read::job::list::Filter>>;
