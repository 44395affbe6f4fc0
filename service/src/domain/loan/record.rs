//! [`Record`] definitions.

#[cfg(doc)]
use common::{Date, DateTime};
use common::{unit, DateOf, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Borrower, DueDate, IssueDate, Notes};
use crate::domain::{material, user};
#[cfg(doc)]
use crate::domain::{Loan, Material, User};

/// Append-only history entry of a returned [`Loan`].
#[derive(Clone, Debug)]
pub struct Record {
    /// ID of this [`Record`].
    pub id: Id,

    /// ID of the lent [`Material`], if it's still registered.
    pub material_id: Option<material::Id>,

    /// [`material::Code`] of the lent [`Material`] at the time of return.
    pub material_code: material::Code,

    /// [`material::Name`] of the lent [`Material`] at the time of return.
    pub material_name: material::Name,

    /// [`Borrower`] of the [`Material`].
    pub borrower: Borrower,

    /// [`Date`] when the [`Material`] was lent.
    pub issued_on: IssueDate,

    /// [`Date`] when the [`Material`] was expected back.
    pub due_on: DueDate,

    /// [`Date`] when the [`Material`] was actually returned.
    pub returned_on: ReturnDate,

    /// [`Notes`] on the returned [`Loan`].
    pub notes: Option<Notes>,

    /// ID of the [`User`] who registered the return.
    pub registered_by: user::Id,

    /// [`DateTime`] when this [`Record`] was created.
    pub created_at: CreationDateTime,
}

impl Record {
    /// Returns the number of days the [`Material`] was lent for.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        self.issued_on.days_until(&self.returned_on)
    }

    /// Returns the number of days the [`Material`] was returned late.
    ///
    /// Zero if returned on time.
    #[must_use]
    pub fn days_late(&self) -> i64 {
        self.due_on.days_until(&self.returned_on).max(0)
    }

    /// Indicates whether the [`Material`] was returned after its due [`Date`].
    #[must_use]
    pub fn was_late(&self) -> bool {
        self.days_late() > 0
    }
}

/// ID of a [`Record`].
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

/// [`Date`] when a lent [`Material`] was returned.
pub type ReturnDate = DateOf<(Record, unit::Return)>;

/// [`DateTime`] when a [`Record`] was created.
pub type CreationDateTime = DateTimeOf<(Record, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTimeOf};

    use crate::domain::{loan::Borrower, material, user};

    use super::{Id, Record};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::from_calendar(y, m, d).unwrap()
    }

    fn record(returned: Date) -> Record {
        Record {
            id: Id::new(),
            material_id: None,
            material_code: material::Code::new("TAL-001").unwrap(),
            material_name: material::Name::new("Taladro").unwrap(),
            borrower: Borrower::new("Pedro Soto").unwrap(),
            issued_on: date(2024, 5, 1).coerce(),
            due_on: date(2024, 5, 10).coerce(),
            returned_on: returned.coerce(),
            notes: None,
            registered_by: user::Id::new(),
            created_at: DateTimeOf::now(),
        }
    }

    #[test]
    fn measures_duration() {
        assert_eq!(record(date(2024, 5, 8)).duration_days(), 7);
        assert_eq!(record(date(2024, 5, 1)).duration_days(), 0);
    }

    #[test]
    fn measures_lateness() {
        let on_time = record(date(2024, 5, 10));
        assert_eq!(on_time.days_late(), 0);
        assert!(!on_time.was_late());

        let late = record(date(2024, 5, 13));
        assert_eq!(late.days_late(), 3);
        assert!(late.was_late());
    }
}
