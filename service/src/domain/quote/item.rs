//! [`Item`] definitions.

use common::{define_kind, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{material, quote};
#[cfg(doc)]
use crate::domain::{Material, Quote};

/// Line of a [`Quote`].
#[derive(Clone, Debug)]
pub struct Item {
    /// ID of this [`Item`].
    pub id: Id,

    /// ID of the [`Quote`] this [`Item`] belongs to.
    pub quote_id: quote::Id,

    /// Display position of this [`Item`] within its [`Quote`].
    pub position: Position,

    /// [`Line`] contents of this [`Item`].
    pub line: Line,
}

impl Item {
    /// Returns the [`Kind`] of this [`Item`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.line.kind()
    }

    /// Returns the subtotal of this [`Item`], rounded to [`Money::SCALE`].
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Money> {
        self.line.subtotal()
    }
}

/// Priced contents of an [`Item`].
#[derive(Clone, Debug)]
pub enum Line {
    /// Service provided by the company.
    Service {
        /// [`Description`] of the service.
        description: Description,

        /// [`Quantity`] of the service units.
        quantity: Quantity,

        /// Price of a single unit.
        unit_price: Money,
    },

    /// [`Material`] supplied or used during the work.
    Material {
        /// ID of the used [`Material`], if it's still registered.
        material_id: Option<material::Id>,

        /// [`Description`] of the [`Material`].
        description: Description,

        /// [`Quantity`] of the [`Material`] units.
        quantity: Quantity,

        /// Price of a single unit.
        unit_price: Money,

        /// Hours the [`Material`] is going to be used for.
        ///
        /// Accumulated into hours-based maintenance once the [`Quote`] is
        /// finalized.
        usage_hours: Quantity,
    },

    /// Labor of the company employees.
    Labor {
        /// [`Description`] of the labor.
        description: Description,

        /// Estimated [`Quantity`] of hours.
        hours: Quantity,

        /// Price of a single hour.
        hourly_rate: Money,
    },
}

impl Line {
    /// Returns the [`Kind`] of this [`Line`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Service { .. } => Kind::Service,
            Self::Material { .. } => Kind::Material,
            Self::Labor { .. } => Kind::Labor,
        }
    }

    /// Returns the [`Description`] of this [`Line`].
    #[must_use]
    pub const fn description(&self) -> &Description {
        match self {
            Self::Service { description, .. }
            | Self::Material { description, .. }
            | Self::Labor { description, .. } => description,
        }
    }

    /// Returns the price of a single unit (or hour) of this [`Line`].
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        match self {
            Self::Service { unit_price, .. }
            | Self::Material { unit_price, .. } => *unit_price,
            Self::Labor { hourly_rate, .. } => *hourly_rate,
        }
    }

    /// Returns the [`Quantity`] of units (or hours) of this [`Line`].
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        match self {
            Self::Service { quantity, .. }
            | Self::Material { quantity, .. } => *quantity,
            Self::Labor { hours, .. } => *hours,
        }
    }

    /// Returns the subtotal of this [`Line`], rounded to [`Money::SCALE`].
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price()
            .checked_times(self.quantity().into())
            .map(Money::round)
    }
}

define_kind! {
    #[doc = "Kind of a [`Quote`] [`Item`]."]
    enum Kind {
        #[doc = "Service provided by the company."]
        Service = 1,

        #[doc = "[`Material`] supplied or used."]
        Material = 2,

        #[doc = "Labor of the company employees."]
        Labor = 3,
    }
}

/// ID of an [`Item`].
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

/// Display position of an [`Item`] within its [`Quote`].
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

impl Position {
    /// Returns the [`Position`] following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Description of an [`Item`].
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

/// Non-negative decimal quantity (units or hours) with up to
/// [`Quantity::SCALE`] decimal places.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Quantity(Decimal);

impl Quantity {
    /// Zero [`Quantity`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Number of decimal places a [`Quantity`] may have.
    pub const SCALE: u32 = 2;

    /// Maximum [`Quantity`] value.
    pub const MAX: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

    /// Creates a new [`Quantity`] if the given `value` is not negative, does
    /// not exceed [`Quantity::MAX`] and has no more than [`Quantity::SCALE`]
    /// decimal places.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        let value = value.normalize();
        let is_negative = value.is_sign_negative() && !value.is_zero();
        (!is_negative && value <= Self::MAX && value.scale() <= Self::SCALE)
            .then_some(Self(value))
    }

    /// Indicates whether this [`Quantity`] is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }
}

impl FromStr for Quantity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Quantity`")
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;

    use super::{Description, Line, Quantity};

    fn qty(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    fn clp(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Clp)
    }

    fn description() -> Description {
        Description::new("Mantención bomba").unwrap()
    }

    #[test]
    fn computes_subtotal_per_kind() {
        let service = Line::Service {
            description: description(),
            quantity: qty("3"),
            unit_price: clp("15000"),
        };
        assert_eq!(service.subtotal(), Some(clp("45000")));

        let material = Line::Material {
            material_id: None,
            description: description(),
            quantity: qty("2.5"),
            unit_price: clp("1999.99"),
            usage_hours: qty("4"),
        };
        assert_eq!(material.subtotal(), Some(clp("4999.98")));

        let labor = Line::Labor {
            description: description(),
            hours: qty("1.5"),
            hourly_rate: clp("12000"),
        };
        assert_eq!(labor.subtotal(), Some(clp("18000")));
    }

    #[test]
    fn rounds_subtotal_half_away_from_zero() {
        let line = Line::Service {
            description: description(),
            quantity: qty("0.5"),
            unit_price: clp("0.05"),
        };
        assert_eq!(line.subtotal(), Some(clp("0.03")));
    }

    #[test]
    fn rejects_negative_quantity() {
        assert!(Quantity::new(Decimal::NEGATIVE_ONE).is_none());
        assert!("-0.1".parse::<Quantity>().is_err());
        assert!(!qty("0").is_positive());
        assert!(qty("0.1").is_positive());
    }

    #[test]
    fn rejects_sub_cent_quantity() {
        assert!("0.333".parse::<Quantity>().is_err());
        assert_eq!(qty("0.330").to_string(), "0.33");
        assert_eq!(qty("-0").to_string(), "0");
    }

    #[test]
    fn rejects_huge_quantity() {
        assert!(Quantity::new(Quantity::MAX).is_some());
        assert!(Quantity::new(Quantity::MAX + Decimal::ONE).is_none());
    }

    #[test]
    fn overflowing_subtotal_is_none() {
        let line = Line::Service {
            description: description(),
            quantity: qty("2"),
            unit_price: Money::new(Decimal::MAX, Currency::Clp),
        };
        assert_eq!(line.subtotal(), None);
    }

    #[test]
    fn trims_description() {
        assert_eq!(Description::new("  Cable  ").unwrap().as_ref(), "Cable");
        assert!(Description::new("   ").is_none());
    }
}
