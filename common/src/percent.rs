//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Decimal percentage in the `0..=100` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided value is within
    /// the `0..=100` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be within the `0..=100` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Returns the underlying [`Decimal`] value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Calculates this [`Percent`] of the provided `amount`.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Option<Decimal> {
        amount
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Decimal percentage in the `0..=100` range.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(m: &Percent) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer};

    use super::Percent;

    impl<'de> Deserialize<'de> for Percent {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = <Decimal as Deserialize>::deserialize(deserializer)?;
            Self::new(value).ok_or_else(|| {
                de::Error::custom("percent must be within `0..=100` range")
            })
        }
    }

    #[cfg(test)]
    mod spec {
        use serde::{
            de::value::{Error, StrDeserializer},
            Deserialize as _,
        };

        use super::Percent;

        fn parse(s: &str) -> Result<Percent, Error> {
            Percent::deserialize(StrDeserializer::<Error>::new(s))
        }

        #[test]
        fn deserializes_within_range() {
            assert_eq!(parse("19").unwrap().to_string(), "19");
            assert_eq!(parse("0").unwrap().to_string(), "0");
            assert!(parse("120").is_err());
            assert!(parse("-1").is_err());
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn checks_range() {
        assert!(Percent::new(decimal("0")).is_some());
        assert!(Percent::new(decimal("19")).is_some());
        assert!(Percent::new(decimal("100")).is_some());
        assert!(Percent::new(decimal("-0.1")).is_none());
        assert!(Percent::new(decimal("100.01")).is_none());

        assert!("19.5".parse::<Percent>().is_ok());
        assert!("abc".parse::<Percent>().is_err());
    }

    #[test]
    fn calculates_share_of_amount() {
        let vat = "19".parse::<Percent>().unwrap();

        assert_eq!(vat.of(decimal("100000")), Some(decimal("19000")));
        assert_eq!(vat.of(decimal("1050")), Some(decimal("199.5")));
        assert_eq!(vat.of(Decimal::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn share_overflow_is_none() {
        let vat = "19".parse::<Percent>().unwrap();

        assert_eq!(vat.of(Decimal::MAX), None);
    }
}
