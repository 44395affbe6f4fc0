//! [`Job`] read model definition.
//!
//! [`Job`]: crate::domain::Job

pub mod list {
    //! [`Job`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{job, user};
    #[cfg(doc)]
    use crate::domain::{Job, User};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = job::Id;

    /// Cursor pointing to a specific [`Job`] in a list.
    pub type Cursor = job::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the employee [`User`] the listed [`Job`]s are assigned to.
        pub employee_id: Option<user::Id>,

        /// [`job::Status`] of the listed [`Job`]s.
        pub status: Option<job::Status>,
    }

    /// Total count of [`Job`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
