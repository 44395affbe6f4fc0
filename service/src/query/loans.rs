//! [`Query`] collection related to the multiple [`Loan`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{
    domain::{loan, Loan},
    Query,
};

use super::DatabaseQuery;

/// Queries a list of active [`Loan`]s.
pub type List =
    DatabaseQuery<By<read::loan::list::Page, read::loan::list::Selector>>;

/// Queries total count of active [`Loan`]s.
pub type TotalCount =
    DatabaseQuery<By<read::loan::list::TotalCount, read::loan::list::Filter>>;

/// Queries the lending history of returned [`Loan`]s as [`loan::Record`]s.
pub type History = DatabaseQuery<
    By<read::loan::history::Page, read::loan::history::Selector>,
>;

/// Queries total count of [`loan::Record`]s in the lending history.
pub type HistoryTotalCount = DatabaseQuery<
    By<read::loan::history::TotalCount, read::loan::history::Filter>,
>;
