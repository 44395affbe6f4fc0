//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Number of decimal places [`Money`] amounts are rounded to.
    pub const SCALE: u32 = 2;

    /// Creates a new [`Money`] amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Indicates whether this [`Money`] amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Indicates whether this [`Money`] amount has no more than
    /// [`Money::SCALE`] significant decimal places.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.amount.normalize().scale() <= Self::SCALE
    }

    /// Multiplies this [`Money`] by the provided `factor` (a quantity, a number
    /// of hours, etc).
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_times(self, factor: Decimal) -> Option<Self> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Self::new(amount, self.currency))
    }

    /// Adds the `other` [`Money`] to this one.
    ///
    /// [`None`] is returned if the [`Currency`]s differ or on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency)
            .then(|| self.amount.checked_add(other.amount))
            .flatten()
            .map(|amount| Self::new(amount, self.currency))
    }

    /// Rounds this [`Money`] to [`Money::SCALE`] decimal places, with
    /// midpoints rounded away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self::new(
            self.amount.round_dp_with_strategy(
                Self::SCALE,
                RoundingStrategy::MidpointAwayFromZero,
            ),
            self.currency,
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(int) => write!(f, "{int}{currency}"),
            None => write!(f, "{}{currency}", amount.normalize()),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        let money = Self { amount, currency };
        money.is_exact().then_some(money).ok_or("too many decimal places")
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Chilean Peso."]
        Clp = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Clp
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer of up to 2 digits;
    /// - `currency` is a three-letter currency code (`CLP`, `USD` or `EUR`).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn clp(s: &str) -> Money {
        Money::new(decimal(s), Currency::Clp)
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("15000CLP").unwrap(), clp("15000"));
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money::new(decimal("123.45"), Currency::Usd),
        );
        assert_eq!(
            Money::from_str("0.5EUR").unwrap(),
            Money::new(decimal("0.5"), Currency::Eur),
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Cl").is_err());
        assert!(Money::from_str("123.45RUB").is_err());
        assert!(Money::from_str("CLP").is_err());
        assert!(Money::from_str("12ñCLP").is_err());
        assert!(Money::from_str("0.333CLP").is_err());
        assert!(Money::from_str("1.500USD").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(clp("15000").to_string(), "15000CLP");
        assert_eq!(clp("15000.00").to_string(), "15000CLP");
        assert_eq!(clp("1234.50").to_string(), "1234.5CLP");
        assert_eq!(
            Money::new(decimal("0.19"), Currency::Usd).to_string(),
            "0.19USD",
        );
    }

    #[test]
    fn multiplies_by_factor() {
        assert_eq!(
            clp("2500").checked_times(decimal("3")),
            Some(clp("7500")),
        );
        assert_eq!(
            clp("1000").checked_times(decimal("1.5")),
            Some(clp("1500")),
        );
        assert_eq!(clp("1000").checked_times(Decimal::ZERO), Some(clp("0")));
    }

    #[test]
    fn multiplication_overflow_is_none() {
        let max = Money::new(Decimal::MAX, Currency::Clp);

        assert_eq!(max.checked_times(decimal("2")), None);
        assert_eq!(max.checked_times(Decimal::ONE), Some(max));
    }

    #[test]
    fn adds_only_same_currency() {
        assert_eq!(clp("100").checked_add(clp("50.5")), Some(clp("150.5")));
        assert_eq!(
            clp("100")
                .checked_add(Money::new(decimal("1"), Currency::Usd)),
            None,
        );
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(clp("10.005").round(), clp("10.01"));
        assert_eq!(clp("10.004").round(), clp("10.00"));
        assert_eq!(clp("-10.005").round(), clp("-10.01"));
    }

    #[test]
    fn detects_negative_amounts() {
        assert!(clp("-1").is_negative());
        assert!(!clp("0").is_negative());
        assert!(!clp("-0").is_negative());
        assert!(!clp("1").is_negative());
    }

    #[test]
    fn defaults_to_chilean_peso() {
        assert_eq!(Currency::default(), Currency::Clp);
        assert_eq!(Currency::Clp.to_string(), "CLP");
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
    }
}
