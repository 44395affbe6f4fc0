//! [`Notification`]-related read definitions.

use derive_more::{From, Into};

use crate::domain::{material, notification, user};
#[cfg(doc)]
use crate::domain::{Material, Notification, User};

/// Number of unread [`Notification`]s of a [`User`].
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct UnreadCount(i32);

/// Selector of every unread [`Notification`] of a [`User`].
#[derive(Clone, Copy, Debug)]
pub struct UnreadOf(pub user::Id);

/// Selector of unread maintenance [`Notification`]s about a [`Material`].
#[derive(Clone, Copy, Debug)]
pub struct UnreadAbout(pub material::Id);

/// Selector of read [`Notification`]s created before the provided moment.
#[derive(Clone, Copy, Debug)]
pub struct ReadBefore(pub notification::CreationDateTime);

pub mod list {
    //! [`Notification`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{notification, user};
    #[cfg(doc)]
    use crate::domain::{Notification, User};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = notification::Id;

    /// Cursor pointing to a specific [`Notification`] in a list.
    pub type Cursor = notification::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug)]
    pub struct Filter {
        /// ID of the [`User`] the listed [`Notification`]s belong to.
        pub user_id: user::Id,

        /// Whether only unread [`Notification`]s are listed.
        pub unread_only: bool,
    }

    /// Total count of [`Notification`]s matching a [`Filter`].
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
