//! [`Query`] collection related to [`Notification`]s.

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{
    domain::{Notification, User},
    Query,
};

use super::DatabaseQuery;

/// Queries a list of [`Notification`]s of a [`User`].
pub type List = DatabaseQuery<
    By<read::notification::list::Page, read::notification::list::Selector>,
>;

/// Queries the number of unread [`Notification`]s of a [`User`].
pub type UnreadCount =
    DatabaseQuery<By<read::notification::UnreadCount, user::Id>>;

/// Queries total count of [`Notification`]s matching a
/// [`read::notification::list::Filter`].
pub type TotalCount = DatabaseQuery<
    By<
        read::notification::list::TotalCount,
        read::notification::list::Filter,
    >,
>;
