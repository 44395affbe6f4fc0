//! Contact details shared by [`User`]s and [`Client`]s.
//!
//! [`Client`]: crate::domain::Client
//! [`User`]: crate::domain::User

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;

/// Email address.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// The `address` is trimmed before being checked.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into().trim().to_owned();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number.
///
/// Local (`9-76193683`) and international (`+56 9 7619 3683`) notations are
/// both accepted.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[+]?\d(?:[\s-]?\d){5,14}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, Phone};

    #[test]
    fn accepts_valid_emails() {
        for input in
            ["j_alvarado33@hotmail.com", "  ops@example.cl ", "a.b+c@d.co"]
        {
            assert!(Email::new(input).is_some(), "rejected: {input}");
        }
        assert_eq!(
            AsRef::<str>::as_ref(&Email::new(" ops@example.cl ").unwrap()),
            "ops@example.cl",
        );
    }

    #[test]
    fn rejects_invalid_emails() {
        for input in
            ["", "plain", "no@tld", "two@@example.com", "sp ace@x.cl"]
        {
            assert!(Email::new(input).is_none(), "accepted: {input}");
        }
    }

    #[test]
    fn accepts_local_and_international_phones() {
        for input in
            ["9-76193683", "+56 9 7619 3683", "642231234", "+56912345678"]
        {
            assert!(Phone::new(input).is_some(), "rejected: {input}");
        }
    }

    #[test]
    fn rejects_malformed_phones() {
        for input in
            ["", "12345", "phone", "+56 9 7619 3683 ext 2", "9--7619"]
        {
            assert!(Phone::new(input).is_none(), "accepted: {input}");
        }
    }
}
