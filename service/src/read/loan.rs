//! [`Loan`] read model definitions.
//!
//! [`Loan`]: crate::domain::Loan

pub mod list {
    //! Active [`Loan`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::loan;
    #[cfg(doc)]
    use crate::domain::Loan;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = loan::Id;

    /// Cursor pointing to a specific [`Loan`] in a list.
    pub type Cursor = loan::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Whether only overdue [`Loan`]s are listed.
        pub overdue_only: bool,
    }

    /// Total count of active [`Loan`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}

pub mod history {
    //! [`loan::Record`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{loan, material};
    #[cfg(doc)]
    use crate::domain::Material;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = loan::record::Id;

    /// Cursor pointing to a specific [`loan::Record`] in a list.
    pub type Cursor = loan::record::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Material`] the listed [`loan::Record`]s are about.
        pub material_id: Option<material::Id>,
    }

    /// Total count of [`loan::Record`]s matching a [`Filter`].
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
