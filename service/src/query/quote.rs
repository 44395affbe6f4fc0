//! [`Query`] collection related to a single [`Quote`].

use common::operations::By;

use crate::domain::{quote, Quote};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Quote`] by its [`quote::Id`].
pub type ById = DatabaseQuery<By<Option<Quote>, quote::Id>>;

/// Queries a [`Quote`] by its [`quote::Number`].
pub type ByNumber<'n> = DatabaseQuery<By<Option<Quote>, &'n quote::Number>>;

/// Queries a [`Quote`] by its public [`quote::Token`].
pub type ByToken<'t> = DatabaseQuery<By<Option<Quote>, &'t quote::Token>>;

/// Queries [`quote::Item`]s of a [`Quote`], ordered by their positions.
pub type Items = DatabaseQuery<By<Vec<quote::Item>, quote::Id>>;

/// Queries a [`quote::Item`] by its [`quote::item::Id`].
pub type ItemById = DatabaseQuery<By<Option<quote::Item>, quote::item::Id>>;
