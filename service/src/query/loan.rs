//! [`Query`] collection related to a single [`Loan`].

use common::operations::By;

use crate::domain::{loan, material, Loan};
#[cfg(doc)]
use crate::{domain::Material, Query};

use super::DatabaseQuery;

/// Queries a [`Loan`] by its [`loan::Id`].
pub type ById = DatabaseQuery<By<Option<Loan>, loan::Id>>;

/// Queries the active [`Loan`] of a [`Material`].
pub type ByMaterial = DatabaseQuery<By<Option<Loan>, material::Id>>;

/// Queries a [`loan::Record`] by its [`loan::record::Id`].
pub type RecordById = DatabaseQuery<By<Option<loan::Record>, loan::record::Id>>;
