//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute.
///
/// Uses [`FromStr`]/[`Display`] impls of `As` type to convert the target type
/// to/from GraphQL scalar.
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Convert the target type into scalar [`Value`] by using [`Display`] impl
    /// of `As` type.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Constructs the target type from scalar [`Value`] by using [`FromStr`]
    /// impl of `As` type.
    ///
    /// Numeric input values are accepted as well, so decimal scalars may be
    /// written both as `"1.5"` and `1.5`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the input value is neither a string nor a number;
    /// - the input value cannot be parsed into `As` type;
    /// - the parsed value cannot be converted into the target type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr + fmt::Display,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).expect("always has a name");
        let s = input
            .as_string_value()
            .map(ToOwned::to_owned)
            .or_else(|| input.as_int_value().map(|i| i.to_string()))
            .or_else(|| input.as_float_value().map(|f| f.to_string()))
            .ok_or_else(|| {
                format!(
                    "Cannot parse input scalar `{name}`: expected string or \
                     numeric input value, found: {input}",
                )
            })?;
        s.parse::<As>()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{name}` from \"{s}\": {e}",
                )
            })?
            .try_into()
            .map_err(|e| format!("Cannot parse input scalar `{name}`: {e}"))
    }

    /// Parse the provided [`ScalarToken`].
    ///
    /// Numeric tokens are kept in their literal form, so no precision is
    /// lost before parsing them into `As` type.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be parsed as [`String`].
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        match value {
            ScalarToken::Int(lit) | ScalarToken::Float(lit) => {
                Ok(S::from(lit.to_owned()))
            }
            ScalarToken::String(_) => {
                <String as ParseScalarValue<S>>::from_str(value)
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};
    use service::domain;

    use crate::api::{client::Rut, quote::Quantity};

    use super::Via;

    type S = DefaultScalarValue;

    #[test]
    fn normalizes_rut() {
        let input = InputValue::<S>::scalar("123456785".to_owned());

        let rut: Rut = Via::<domain::Rut>::from_input(&input).unwrap();

        assert_eq!(
            Via::<domain::Rut>::to_output::<_, S>(&rut),
            Value::scalar("12.345.678-5".to_owned()),
        );
    }

    #[test]
    fn rejects_invalid_rut() {
        let input = InputValue::<S>::scalar("12.345.678-9".to_owned());

        let err = Via::<domain::Rut>::from_input::<Rut, S>(&input)
            .unwrap_err();

        assert!(err.contains("`Rut`"), "unexpected error: {err}");
    }

    #[test]
    fn accepts_numeric_quantity() {
        use domain::quote::item;

        for input in [
            InputValue::<S>::scalar(3),
            InputValue::<S>::scalar(3.0),
            InputValue::<S>::scalar("3".to_owned()),
        ] {
            let qty: Quantity =
                Via::<item::Quantity>::from_input(&input).unwrap();

            assert_eq!(qty.to_string(), "3");
        }
    }

    #[test]
    fn rejects_non_scalar_input() {
        let input = InputValue::<S>::list(vec![]);

        let err = Via::<domain::Rut>::from_input::<Rut, S>(&input)
            .unwrap_err();

        assert!(err.contains("expected string or numeric"));
    }
}
