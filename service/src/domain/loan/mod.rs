//! [`Loan`] definitions.

pub mod record;

#[cfg(doc)]
use common::{Date, DateTime};
use common::{define_kind, unit, DateOf, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{material, user};
#[cfg(doc)]
use crate::domain::{Material, User};

pub use self::record::Record;

/// [`Material`] lent to a third party until a due [`Date`].
#[derive(Clone, Debug)]
pub struct Loan {
    /// ID of this [`Loan`].
    pub id: Id,

    /// ID of the lent [`Material`].
    pub material_id: material::Id,

    /// [`Borrower`] of the [`Material`].
    pub borrower: Borrower,

    /// [`Date`] when the [`Material`] was lent.
    pub issued_on: IssueDate,

    /// [`Date`] when the [`Material`] is expected back.
    pub due_on: DueDate,

    /// [`Notes`] on this [`Loan`].
    pub notes: Option<Notes>,

    /// ID of the [`User`] who registered this [`Loan`].
    pub registered_by: user::Id,

    /// [`DateTime`] when this [`Loan`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Loan`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Loan {
    /// Checks whether the provided `due_on` [`Date`] is not before the
    /// `issued_on` one.
    #[must_use]
    pub fn is_period_valid(issued_on: IssueDate, due_on: DueDate) -> bool {
        issued_on.days_until(&due_on) >= 0
    }

    /// Returns the number of days left until this [`Loan`] is due, counting
    /// from `today`.
    ///
    /// Negative once the [`Loan`] is overdue.
    #[must_use]
    pub fn days_remaining<T: ?Sized>(&self, today: DateOf<T>) -> i64 {
        today.days_until(&self.due_on)
    }

    /// Returns the [`Status`] of this [`Loan`] as of `today`.
    #[must_use]
    pub fn status<T: ?Sized>(&self, today: DateOf<T>) -> Status {
        match self.days_remaining(today) {
            ..0 => Status::Overdue,
            0..=Status::DUE_SOON_DAYS => Status::DueSoon,
            _ => Status::OnTime,
        }
    }
}

/// ID of a [`Loan`].
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

/// Person or company a [`Material`] is lent to.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Borrower(String);

impl Borrower {
    /// Creates a new [`Borrower`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let name = name.trim();
        (!name.is_empty() && name.len() <= 200).then(|| Self(name.to_owned()))
    }
}

impl FromStr for Borrower {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Borrower`")
    }
}

/// Free-form notes on a [`Loan`].
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

define_kind! {
    #[doc = "Status of a [`Loan`] relative to its due [`Date`]."]
    enum Status {
        #[doc = "Due in more than a few days."]
        OnTime = 1,

        #[doc = "Due in a few days or today."]
        DueSoon = 2,

        #[doc = "Due [`Date`] has passed."]
        Overdue = 3,
    }
}

impl Status {
    /// Number of days before the due [`Date`] a [`Loan`] is considered
    /// [`Status::DueSoon`].
    pub const DUE_SOON_DAYS: i64 = 3;
}

/// [`Date`] when a [`Material`] was lent.
pub type IssueDate = DateOf<(Loan, unit::Start)>;

/// [`Date`] when a lent [`Material`] is expected back.
pub type DueDate = DateOf<(Loan, unit::Expiration)>;

/// [`DateTime`] when a [`Loan`] was created.
pub type CreationDateTime = DateTimeOf<(Loan, unit::Creation)>;

/// [`DateTime`] when a [`Loan`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Loan, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTimeOf};

    use crate::domain::{material, user};

    use super::{Borrower, Id, Loan, Status};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::from_calendar(y, m, d).unwrap()
    }

    fn loan(due: Date) -> Loan {
        let now = DateTimeOf::<()>::now();
        Loan {
            id: Id::new(),
            material_id: material::Id::new(),
            borrower: Borrower::new("Constructora Sur").unwrap(),
            issued_on: date(2024, 3, 1).coerce(),
            due_on: due.coerce(),
            notes: None,
            registered_by: user::Id::new(),
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn reports_status_by_remaining_days() {
        let loan = loan(date(2024, 3, 10));

        assert_eq!(loan.status(date(2024, 3, 1)), Status::OnTime);
        assert_eq!(loan.status(date(2024, 3, 6)), Status::OnTime);
        assert_eq!(loan.status(date(2024, 3, 7)), Status::DueSoon);
        assert_eq!(loan.status(date(2024, 3, 10)), Status::DueSoon);
        assert_eq!(loan.status(date(2024, 3, 11)), Status::Overdue);
        assert_eq!(loan.days_remaining(date(2024, 3, 12)), -2);
    }

    #[test]
    fn validates_period() {
        let issued = date(2024, 3, 1).coerce();

        assert!(Loan::is_period_valid(issued, date(2024, 3, 1).coerce()));
        assert!(Loan::is_period_valid(issued, date(2024, 4, 1).coerce()));
        assert!(!Loan::is_period_valid(issued, date(2024, 2, 29).coerce()));
    }

    #[test]
    fn trims_borrower() {
        assert_eq!(
            Borrower::new(" Juan Pérez ").unwrap().as_ref(),
            "Juan Pérez",
        );
        assert!(Borrower::new("").is_none());
    }
}
