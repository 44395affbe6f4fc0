//! [`Query`] collection related to a single [`Notification`].

use common::operations::By;

use crate::domain::{notification, Notification};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Notification`] by its [`notification::Id`].
pub type ById = DatabaseQuery<By<Option<Notification>, notification::Id>>;
