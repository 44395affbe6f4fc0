//! [`Representative`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::client;
#[cfg(doc)]
use crate::domain::{Client, Quote};

/// Contact person of a [`Client`] a [`Quote`] may be addressed to.
#[derive(Clone, Debug)]
pub struct Representative {
    /// ID of this [`Representative`].
    pub id: Id,

    /// ID of the [`Client`] this [`Representative`] belongs to.
    pub client_id: client::Id,

    /// Full name of this [`Representative`].
    pub name: client::Name,

    /// [`Position`] of this [`Representative`] among the other ones of the
    /// same [`Client`].
    pub position: Position,

    /// [`DateTime`] when this [`Representative`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Representative`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Display position of a [`Representative`] within its [`Client`].
///
/// Lower ones go first, ties are ordered by name.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Position(i32);

/// [`DateTime`] when a [`Representative`] was created.
pub type CreationDateTime = DateTimeOf<(Representative, unit::Creation)>;
