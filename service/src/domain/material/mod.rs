//! [`Material`] definitions.

pub mod maintenance;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::maintenance::Schedule as MaintenanceSchedule;

/// Material or tool the company quotes, uses and lends.
#[derive(Clone, Debug)]
pub struct Material {
    /// ID of this [`Material`].
    pub id: Id,

    /// [`Code`] of this [`Material`].
    pub code: Code,

    /// [`Name`] of this [`Material`].
    pub name: Name,

    /// [`Description`] of this [`Material`].
    pub description: Option<Description>,

    /// Price of a single [`Unit`] of this [`Material`].
    pub unit_price: Money,

    /// [`Unit`] this [`Material`] is measured in.
    pub unit: Unit,

    /// [`Category`] of this [`Material`].
    pub category: Option<Category>,

    /// Indicator whether this [`Material`] is available for use.
    ///
    /// [`Material`]s are inactive while lent.
    pub is_active: bool,

    /// [`MaintenanceSchedule`] of this [`Material`], if it requires any.
    pub maintenance: Option<MaintenanceSchedule>,

    /// [`DateTime`] when this [`Material`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Material`] was deleted.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Material`].
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

/// Inventory code of a [`Material`], unique among non-deleted ones.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Code(String);

impl Code {
    /// Creates a new [`Code`] if the given `code` is valid.
    ///
    /// The `code` is upper-cased.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Option<Self> {
        let code = code.as_ref();
        (code.trim() == code
            && !code.is_empty()
            && code.len() <= 50
            && !code.chars().any(char::is_whitespace))
        .then(|| Self(code.to_uppercase()))
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Code`")
    }
}

/// Name of a [`Material`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (name.trim() == name && !name.is_empty() && name.len() <= 200)
            .then_some(Self(name))
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Free-form description of a [`Material`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is not blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (!text.is_empty() && text.len() <= 4096).then(|| Self(text.to_owned()))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Unit of measurement of a [`Material`] (`UND`, `MT`, `KG`, etc).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Unit(String);

impl Unit {
    /// Creates a new [`Unit`] if the given `unit` is valid.
    #[must_use]
    pub fn new(unit: impl Into<String>) -> Option<Self> {
        let unit = unit.into();
        (unit.trim() == unit && !unit.is_empty() && unit.len() <= 50)
            .then_some(Self(unit))
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self("UND".into())
    }
}

impl FromStr for Unit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Unit`")
    }
}

/// Category grouping [`Material`]s in listings.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Category(String);

impl Category {
    /// Creates a new [`Category`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (name.trim() == name && !name.is_empty() && name.len() <= 100)
            .then_some(Self(name))
    }
}

impl FromStr for Category {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Category`")
    }
}

/// [`DateTime`] when a [`Material`] was created.
pub type CreationDateTime = DateTimeOf<(Material, unit::Creation)>;

/// [`DateTime`] when a [`Material`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Material, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::{Code, Unit};

    #[test]
    fn upper_cases_codes() {
        assert_eq!(Code::new("bmb-0012").unwrap().as_ref(), "BMB-0012");
        assert!(Code::new("").is_none());
        assert!(Code::new("BMB 12").is_none());
        assert!(Code::new(" BMB").is_none());
    }

    #[test]
    fn defaults_to_piece_unit() {
        assert_eq!(Unit::default().as_ref(), "UND");
    }
}
