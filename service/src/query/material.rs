//! [`Query`] collection related to a single [`Material`].

use common::operations::By;

use crate::domain::{material, Material};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Material`] by its [`material::Id`].
pub type ById = DatabaseQuery<By<Option<Material>, material::Id>>;

/// Queries a [`Material`] by its [`material::Code`].
pub type ByCode<'c> = DatabaseQuery<By<Option<Material>, &'c material::Code>>;
