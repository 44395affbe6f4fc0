//! [`Query`] collection related to the multiple [`Material`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{material, Material},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Material`]s by their [`material::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<material::Id, Material>, Vec<material::Id>>>;

/// Queries every active [`Material`] having a maintenance schedule.
pub type Maintained =
    DatabaseQuery<By<Vec<Material>, read::material::Maintained>>;

/// Queries a list of [`Material`]s.
pub type List = DatabaseQuery<
    By<read::material::list::Page, read::material::list::Selector>,
>;

/// Queries total count of [`Material`]s.
pub type TotalCount = DatabaseQuery<By<read::material::list::TotalCount, ()>>;
