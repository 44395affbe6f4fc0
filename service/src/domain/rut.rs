//! [`Rut`] definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Chilean national tax ID (Rol Único Tributario).
///
/// Always kept in the `12.345.678-9` notation.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rut(String);

impl Rut {
    /// Creates a new [`Rut`] without checking its check digit.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `rut` is a valid formatted
    /// [`Rut`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(rut: impl Into<String>) -> Self {
        Self(rut.into())
    }

    /// Parses a new [`Rut`] out of the provided `input`, if it's valid.
    ///
    /// Dots and dashes are ignored, so `12.345.678-5`, `12345678-5` and
    /// `123456785` are the same [`Rut`].
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let cleaned = input
            .as_ref()
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | '-'))
            .map(|c| c.to_ascii_uppercase())
            .collect::<String>();

        let (body, dv) =
            cleaned.split_at_checked(cleaned.len().checked_sub(1)?)?;
        if !(7..=8).contains(&body.len())
            || !body.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let dv = dv.chars().next()?;
        if Self::check_digit(body)? != dv {
            return None;
        }

        Some(Self(Self::format(body, dv)))
    }

    /// Computes the mod-11 check digit of the provided numeric `body`.
    ///
    /// [`None`] is returned if the `body` contains non-digit characters.
    #[must_use]
    pub fn check_digit(body: &str) -> Option<char> {
        let mut sum = 0;
        for (d, weight) in body.chars().rev().zip((2..=7).cycle()) {
            sum += d.to_digit(10)? * weight;
        }
        Some(match 11 - sum % 11 {
            11 => '0',
            10 => 'K',
            n => char::from_digit(n, 10)?,
        })
    }

    /// Formats the provided `body` and `dv` with thousands separators.
    fn format(body: &str, dv: char) -> String {
        let mut out = String::with_capacity(body.len() + body.len() / 3 + 2);
        for (i, c) in body.chars().enumerate() {
            if i > 0 && (body.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(c);
        }
        out.push('-');
        out.push(dv);
        out
    }
}

impl FromStr for Rut {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Rut`")
    }
}

#[cfg(test)]
mod spec {
    use super::Rut;

    #[test]
    fn computes_check_digit() {
        assert_eq!(Rut::check_digit("12345678"), Some('5'));
        assert_eq!(Rut::check_digit("11111111"), Some('1'));
        assert_eq!(Rut::check_digit("10000013"), Some('K'));
        assert_eq!(Rut::check_digit("1000005"), Some('K'));
        assert_eq!(Rut::check_digit("12a"), None);
    }

    #[test]
    fn normalizes_any_notation() {
        for input in
            ["12.345.678-5", "12345678-5", "123456785", " 12345678-5 "]
        {
            assert_eq!(
                Rut::new(input).map(|r| r.to_string()).as_deref(),
                Some("12.345.678-5"),
                "input: {input}",
            );
        }
        assert_eq!(
            Rut::new("1.000.005-k").map(|r| r.to_string()).as_deref(),
            Some("1.000.005-K"),
        );
    }

    #[test]
    fn rejects_wrong_check_digit() {
        assert!(Rut::new("12.345.678-9").is_none());
        assert!(Rut::new("10000013-0").is_none());
    }

    #[test]
    fn rejects_malformed_input() {
        for input in
            ["", "-", "123456-0", "123456789-0", "12.3a5.678-5", "K"]
        {
            assert!(Rut::new(input).is_none(), "accepted: {input}");
        }
    }
}
