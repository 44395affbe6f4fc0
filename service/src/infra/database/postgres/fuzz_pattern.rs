//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern matching any of the words of a search input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Characters having a special meaning in `SIMILAR TO` patterns.
    const SPECIAL: &'static [char] = &[
        '\\', '%', '_', '|', '*', '+', '?', '{', '}', '(', ')', '[', ']',
    ];

    /// Creates a new [`FuzzPattern`] out of the given search `input`.
    ///
    /// Every whitespace-separated word becomes a `%word%` alternative.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let alternatives = input
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .format_with("", |c, f| {
                        if Self::SPECIAL.contains(&c) {
                            f(&format_args!("\\{c}"))
                        } else {
                            f(&c)
                        }
                    })
                    .to_string()
            })
            .format_with("|", |word, f| f(&format_args!("%{word}%")));
        Self(format!("({alternatives})"))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn matches_any_word() {
        assert_eq!(
            FuzzPattern::new("bomba  sumergible").to_string(),
            "(%bomba%|%sumergible%)",
        );
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            FuzzPattern::new("50% (1_2)").to_string(),
            r"(%50\%%|%\(1\_2\)%)",
        );
    }
}
