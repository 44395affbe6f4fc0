//! [`Quote`] definitions.

pub mod item;
pub mod totals;

use std::fmt;

#[cfg(doc)]
use common::{Date, DateTime};
use common::{
    define_kind, money::Currency, unit, DateOf, DateTimeOf, Money, Percent,
};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rand::{distributions::Alphanumeric, Rng as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{client, contact, user};
#[cfg(doc)]
use crate::domain::{client::Representative, Client, User};

pub use self::{item::Item, totals::Totals};

/// Priced proposal sent to a [`Client`], covering services, materials and
/// labor.
#[derive(Clone, Debug)]
pub struct Quote {
    /// ID of this [`Quote`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Quote`].
    pub number: Number,

    /// ID of the [`Client`] this [`Quote`] is addressed to.
    ///
    /// [`None`] if the [`Client`] has been deleted.
    pub client_id: Option<client::Id>,

    /// Name of the [`Client`] this [`Quote`] is addressed to, kept in case
    /// the [`Client`] is deleted.
    pub client_name: client::Name,

    /// ID of the [`Representative`] this [`Quote`] is addressed to.
    ///
    /// [`None`] if not chosen, or the [`Representative`] has been deleted.
    pub representative_id: Option<client::representative::Id>,

    /// Name of the [`Representative`] this [`Quote`] is addressed to, kept in
    /// case the [`Representative`] is deleted.
    pub representative_name: Option<client::Name>,

    /// [`Reference`] describing the work being quoted.
    pub reference: Reference,

    /// [`Location`] where the work is to be done.
    pub location: Location,

    /// [`Status`] of this [`Quote`].
    pub status: Status,

    /// [`Date`] after which this [`Quote`] expires, if any.
    pub due_on: Option<DueDate>,

    /// [`Currency`] of every amount in this [`Quote`].
    pub currency: Currency,

    /// Travel expenses added to the net value.
    pub travel_expenses: Money,

    /// Cached [`Totals`] of this [`Quote`].
    pub totals: Totals,

    /// Internal [`Notes`] on this [`Quote`].
    pub notes: Option<Notes>,

    /// ID of the [`User`] who created this [`Quote`].
    pub created_by: user::Id,

    /// [`Token`] granting the [`Client`] access to respond to this [`Quote`].
    pub token: Option<Token>,

    /// [`DateTime`] when this [`Quote`] was last sent to the [`Client`].
    pub sent_at: Option<SendingDateTime>,

    /// Email address this [`Quote`] was last sent to.
    pub sent_to: Option<contact::Email>,

    /// [`DateTime`] when the [`Client`] responded to this [`Quote`].
    pub responded_at: Option<ResponseDateTime>,

    /// Reason the [`Client`] rejected this [`Quote`] with.
    pub rejection_reason: Option<Comment>,

    /// Comments left by the [`Client`] along with the response.
    pub client_comments: Option<Comment>,

    /// [`DateTime`] when this [`Quote`] was finalized.
    pub finalized_at: Option<FinalizationDateTime>,

    /// Indicator whether the [`Client`] has been asked for a feedback.
    pub feedback_requested: bool,

    /// [`DateTime`] when this [`Quote`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Quote`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Quote {
    /// Addresses this [`Quote`] to the provided [`Representative`], or to
    /// nobody in particular if [`None`].
    pub fn address_to(
        &mut self,
        representative: Option<&client::Representative>,
    ) {
        self.representative_id = representative.map(|r| r.id);
        self.representative_name = representative.map(|r| r.name.clone());
    }

    /// Moves this [`Quote`] into the provided [`Status`], stamping the
    /// related [`DateTime`]s.
    ///
    /// Returns `false` if the transition isn't allowed.
    #[must_use]
    pub fn transit(&mut self, to: Status) -> bool {
        if !self.status.can_become(to) {
            return false;
        }

        let now = DateTimeOf::<()>::now();
        if to == Status::Finalized {
            self.finalized_at = Some(now.coerce());
        }
        self.status = to;
        self.updated_at = now.coerce();
        true
    }

    /// Indicates whether the [`Client`] may respond to this [`Quote`].
    #[must_use]
    pub const fn accepts_response(&self) -> bool {
        self.status.accepts_response()
    }

    /// Recomputes the cached [`Totals`] of this [`Quote`] out of its `items`.
    ///
    /// Returns `false` (leaving the [`Totals`] untouched) if any amount is
    /// not in the [`Currency`] of this [`Quote`].
    #[must_use]
    pub fn recompute<'i>(
        &mut self,
        items: impl IntoIterator<Item = &'i Item>,
        vat_rate: Percent,
    ) -> bool {
        if self.travel_expenses.currency != self.currency {
            return false;
        }
        match Totals::compute(items, self.travel_expenses, vat_rate) {
            Some(totals) => {
                self.totals = totals;
                true
            }
            None => false,
        }
    }
}

/// ID of a [`Quote`].
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

/// Yearly sequential number of a [`Quote`] in the `YYYY-NNNN` format.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] out of the provided `year` and `sequence`.
    #[must_use]
    pub fn new(year: i32, sequence: u32) -> Self {
        Self(format!("{year}-{sequence:04}"))
    }

    /// Returns the [`Number`] following the `last` one issued in the provided
    /// `year`.
    ///
    /// Sequences start at `1` every year.
    #[must_use]
    pub fn next(year: i32, last: Option<&Self>) -> Self {
        let sequence = last
            .filter(|n| n.year() == Some(year))
            .and_then(Self::sequence)
            .map_or(1, |s| s + 1);
        Self::new(year, sequence)
    }

    /// Returns the year this [`Number`] was issued in.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.0.split_once('-')?.0.parse().ok()
    }

    /// Returns the sequence part of this [`Number`].
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        self.0.rsplit_once('-')?.1.parse().ok()
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = Self(s.to_owned());
        match (n.year(), n.sequence()) {
            (Some(_), Some(_)) => Ok(n),
            _ => Err("invalid `Number`"),
        }
    }
}

/// Secret token granting a [`Client`] access to respond to a [`Quote`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Token(String);

impl Token {
    /// Length of a [`Token`].
    pub const LENGTH: usize = 64;

    /// Generates a new random [`Token`].
    #[must_use]
    pub fn generate() -> Self {
        Self(
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(Self::LENGTH)
                .map(char::from)
                .collect(),
        )
    }
}

impl FromStr for Token {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == Self::LENGTH
            && s.bytes().all(|b| b.is_ascii_alphanumeric());
        valid
            .then(|| Self(s.to_owned()))
            .ok_or("invalid `Token`")
    }
}

/// Reference describing the work a [`Quote`] is about.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Reference(String);

impl Reference {
    /// Creates a new [`Reference`] if the given `text` is not blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (!text.is_empty() && text.len() <= 4096).then(|| Self(text.to_owned()))
    }
}

impl FromStr for Reference {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reference`")
    }
}

/// Place where the work of a [`Quote`] is to be done.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`] if the given `place` is valid.
    #[must_use]
    pub fn new(place: impl Into<String>) -> Option<Self> {
        let place = place.into();
        let place = place.trim();
        (!place.is_empty() && place.len() <= 200)
            .then(|| Self(place.to_owned()))
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Internal notes on a [`Quote`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

impl Notes {
    /// Creates new [`Notes`] if the given `text` is not blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (!text.is_empty()).then(|| Self(text.to_owned()))
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

/// Comment left by a [`Client`] responding to a [`Quote`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`] if the given `text` is not blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (!text.is_empty() && text.len() <= 4096).then(|| Self(text.to_owned()))
    }
}

impl FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

define_kind! {
    #[doc = "Status of a [`Quote`] in its lifecycle."]
    enum Status {
        #[doc = "Being prepared, editable."]
        Draft = 1,

        #[doc = "Sent to the [`Client`]."]
        Sent = 2,

        #[doc = "Reviewed internally after being sent."]
        Reviewed = 3,

        #[doc = "Approved by the [`Client`]."]
        Approved = 4,

        #[doc = "Rejected by the [`Client`]."]
        Rejected = 5,

        #[doc = "[`Client`] requested changes."]
        ChangesRequested = 6,

        #[doc = "Due date passed without a response."]
        Expired = 7,

        #[doc = "Work is done."]
        Finalized = 8,
    }
}

impl Status {
    /// Indicates whether a [`Quote`] may move from this [`Status`] into the
    /// `next` one.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        use Status as S;

        matches!(
            (self, next),
            (S::Draft | S::Sent, S::Sent)
                | (S::Sent, S::Reviewed)
                | (
                    S::Sent | S::Reviewed,
                    S::Approved
                        | S::Rejected
                        | S::ChangesRequested
                        | S::Expired,
                )
                | (S::Approved, S::Finalized | S::ChangesRequested)
                | (S::ChangesRequested, S::Draft)
        )
    }

    /// Indicates whether a [`Quote`] in this [`Status`] may be edited.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Indicates whether a [`Client`] may respond to a [`Quote`] in this
    /// [`Status`].
    #[must_use]
    pub const fn accepts_response(self) -> bool {
        matches!(self, Self::Sent | Self::Reviewed)
    }

    /// Indicates whether this [`Status`] is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Expired | Self::Finalized)
    }
}

/// Response of a [`Client`] to a [`Quote`].
#[derive(Clone, Debug)]
pub enum Response {
    /// [`Quote`] is approved.
    Approve,

    /// [`Quote`] is rejected for the provided reason.
    Reject(Comment),

    /// [`Client`] asks for changes.
    RequestChanges,
}

impl Response {
    /// Returns the [`Status`] a [`Quote`] moves into on this [`Response`].
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Approve => Status::Approved,
            Self::Reject(_) => Status::Rejected,
            Self::RequestChanges => Status::ChangesRequested,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approved",
            Self::Reject(_) => "rejected",
            Self::RequestChanges => "requested changes to",
        })
    }
}

/// [`Date`] after which a [`Quote`] expires.
pub type DueDate = DateOf<(Quote, unit::Expiration)>;

/// [`DateTime`] when a [`Quote`] was created.
pub type CreationDateTime = DateTimeOf<(Quote, unit::Creation)>;

/// [`DateTime`] when a [`Quote`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Quote, unit::Modification)>;

/// [`DateTime`] when a [`Quote`] was sent.
pub type SendingDateTime = DateTimeOf<(Quote, unit::Sending)>;

/// [`DateTime`] when a [`Client`] responded to a [`Quote`].
pub type ResponseDateTime = DateTimeOf<(Quote, unit::Response)>;

/// [`DateTime`] when a [`Quote`] was finalized.
pub type FinalizationDateTime = DateTimeOf<(Quote, unit::Finalization)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::client::{self, representative, Representative};

    use super::{Number, Status, Token};

    #[test]
    fn numbers_quotes_per_year() {
        assert_eq!(Number::next(2024, None).as_ref(), "2024-0001");

        let last = "2024-0041".parse::<Number>().unwrap();
        assert_eq!(Number::next(2024, Some(&last)).as_ref(), "2024-0042");
        assert_eq!(Number::next(2025, Some(&last)).as_ref(), "2025-0001");

        let last = "2024-9999".parse::<Number>().unwrap();
        assert_eq!(Number::next(2024, Some(&last)).as_ref(), "2024-10000");
    }

    #[test]
    fn parses_numbers() {
        let n = "2023-0007".parse::<Number>().unwrap();
        assert_eq!(n.year(), Some(2023));
        assert_eq!(n.sequence(), Some(7));

        assert!("2023".parse::<Number>().is_err());
        assert!("abcd-0001".parse::<Number>().is_err());
    }

    #[test]
    fn generates_unique_tokens() {
        let a = Token::generate();
        let b = Token::generate();

        assert_eq!(a.as_ref().len(), Token::LENGTH);
        assert_ne!(a, b);
        assert_eq!(a.as_ref().parse::<Token>().unwrap(), a);
        assert!("short".parse::<Token>().is_err());
    }

    #[test]
    fn allows_lifecycle_transitions() {
        use Status as S;

        for (from, to) in [
            (S::Draft, S::Sent),
            (S::Sent, S::Sent),
            (S::Sent, S::Reviewed),
            (S::Sent, S::Approved),
            (S::Reviewed, S::Rejected),
            (S::Reviewed, S::ChangesRequested),
            (S::Sent, S::Expired),
            (S::Approved, S::Finalized),
            (S::Approved, S::ChangesRequested),
            (S::ChangesRequested, S::Draft),
        ] {
            assert!(from.can_become(to), "{from} -> {to}");
        }
    }

    #[test]
    fn forbids_other_transitions() {
        use Status as S;

        for (from, to) in [
            (S::Draft, S::Approved),
            (S::Draft, S::Finalized),
            (S::Reviewed, S::Reviewed),
            (S::Reviewed, S::Sent),
            (S::Approved, S::Draft),
            (S::ChangesRequested, S::Sent),
        ] {
            assert!(!from.can_become(to), "{from} -> {to}");
        }
        for terminal in [S::Rejected, S::Expired, S::Finalized] {
            assert!(terminal.is_terminal());
            for to in S::ALL {
                assert!(!terminal.can_become(*to), "{terminal} -> {to}");
            }
        }
    }

    #[test]
    fn accepts_responses_only_when_sent() {
        for s in Status::ALL {
            assert_eq!(
                s.accepts_response(),
                matches!(s, Status::Sent | Status::Reviewed),
                "{s}",
            );
        }
        assert!(Status::Draft.is_editable());
        assert!(!Status::Sent.is_editable());
    }

    #[test]
    fn keeps_representative_name_backup() {
        let representative = Representative {
            id: representative::Id::new(),
            client_id: client::Id::new(),
            name: "Pedro Ñancupil".parse().unwrap(),
            position: representative::Position::default(),
            created_at: DateTime::now().coerce(),
        };
        let mut quote = crate::fixture::quote(Status::Draft);

        quote.address_to(Some(&representative));
        assert!(quote.representative_id == Some(representative.id));
        assert_eq!(
            quote.representative_name.as_ref().map(AsRef::<str>::as_ref),
            Some("Pedro Ñancupil"),
        );

        quote.address_to(None);
        assert!(quote.representative_id.is_none());
        assert!(quote.representative_name.is_none());
    }
}
