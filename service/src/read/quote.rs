//! [`Quote`]-related read definitions.

use derive_more::{From, Into};

use crate::domain::quote;
#[cfg(doc)]
use crate::domain::Quote;

/// Year the [`quote::Number`]s are sequenced within.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct Year(pub i32);

/// Selector of [`Quote`]s awaiting a response past their due date.
#[derive(Clone, Copy, Debug)]
pub struct Overdue {
    /// [`Quote`]s due strictly before this date are selected.
    pub today: quote::DueDate,
}

/// Selector of finalized [`Quote`]s the [`Client`] wasn't asked for a
/// feedback about yet.
///
/// [`Client`]: crate::domain::Client
#[derive(Clone, Copy, Debug)]
pub struct AwaitingFeedback {
    /// [`Quote`]s finalized at or before this moment are selected.
    pub finalized_before: quote::FinalizationDateTime,
}

pub mod list {
    //! [`Quote`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{client, quote};
    #[cfg(doc)]
    use crate::domain::{Client, Quote};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = quote::Id;

    /// Cursor pointing to a specific [`Quote`] in a list.
    pub type Cursor = quote::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`quote::Status`] of the listed [`Quote`]s.
        pub status: Option<quote::Status>,

        /// ID of the [`Client`] the listed [`Quote`]s are addressed to.
        pub client_id: Option<client::Id>,
    }

    /// Total count of [`Quote`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
