//! [`Material`]-related read definitions.

use crate::domain::material::{self, maintenance};
#[cfg(doc)]
use crate::domain::Material;

/// Selector of every active [`Material`] having a maintenance schedule.
#[derive(Clone, Copy, Debug, Default)]
pub struct Maintained;

/// Maintenance state of a [`Material`] the admins were last alerted about.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AlertedState {
    /// ID of the [`Material`].
    pub material_id: material::Id,

    /// [`maintenance::Fingerprint`] of the alerted state.
    pub fingerprint: maintenance::Fingerprint,
}

pub mod list {
    //! [`Material`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::material;
    #[cfg(doc)]
    use crate::domain::Material;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = material::Id;

    /// Cursor pointing to a specific [`Material`] in a list.
    pub type Cursor = material::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Text to fuzzy search for in [`material::Name`]s and
        /// [`material::Code`]s.
        pub search: Option<material::Name>,

        /// [`material::Category`] of the listed [`Material`]s.
        pub category: Option<material::Category>,

        /// Whether only active (or only inactive) [`Material`]s are listed.
        pub is_active: Option<bool>,
    }

    /// Total count of [`Material`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
