//! [`Job`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    quote::{self, item::Quantity},
    user,
};
#[cfg(doc)]
use crate::domain::{quote::Item, Quote, User};

/// Assignment of an employee to a labor [`Item`] of an approved [`Quote`].
#[derive(Clone, Debug)]
pub struct Job {
    /// ID of this [`Job`].
    pub id: Id,

    /// ID of the [`Quote`] this [`Job`] is part of.
    pub quote_id: quote::Id,

    /// ID of the labor [`Item`] this [`Job`] is about.
    pub item_id: quote::item::Id,

    /// ID of the assigned employee.
    pub employee_id: user::Id,

    /// [`Status`] of this [`Job`].
    pub status: Status,

    /// Hours estimated by the labor [`Item`].
    pub estimated_hours: Quantity,

    /// Hours actually worked.
    pub worked_hours: Quantity,

    /// [`Notes`] of the employee.
    pub notes: Option<Notes>,

    /// ID of the [`User`] who assigned this [`Job`].
    pub assigned_by: user::Id,

    /// [`DateTime`] when this [`Job`] was first started.
    pub started_at: Option<StartDateTime>,

    /// [`DateTime`] when this [`Job`] was completed.
    pub finished_at: Option<FinishDateTime>,

    /// [`DateTime`] when this [`Job`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Job`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Job {
    /// Moves this [`Job`] into the provided [`Status`].
    ///
    /// Returns `false` if the transition isn't allowed.
    #[must_use]
    pub fn transit(&mut self, to: Status) -> bool {
        if self.status == to {
            return true;
        }
        if !self.status.can_become(to) {
            return false;
        }

        let now = DateTimeOf::<()>::now();
        match to {
            Status::InProgress => {
                if self.started_at.is_none() {
                    self.started_at = Some(now.coerce());
                }
                self.finished_at = None;
            }
            Status::Completed => self.finished_at = Some(now.coerce()),
            Status::Pending | Status::Suspended => {}
        }
        self.status = to;
        self.updated_at = now.coerce();
        true
    }
}

/// ID of a [`Job`].
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

/// Notes of an employee on a [`Job`].
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
    #[doc = "Status of a [`Job`]."]
    enum Status {
        #[doc = "Assigned, not started yet."]
        Pending = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Done."]
        Completed = 3,

        #[doc = "Put on hold."]
        Suspended = 4,
    }
}

impl Status {
    /// Indicates whether a [`Job`] may move from this [`Status`] into the
    /// `next` one.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        use Status as S;

        matches!(
            (self, next),
            (S::Pending, S::InProgress | S::Suspended)
                | (S::InProgress, S::Completed | S::Suspended)
                | (S::Suspended, S::InProgress | S::Pending)
                | (S::Completed, S::InProgress)
        )
    }
}

/// [`DateTime`] when a [`Job`] was created.
pub type CreationDateTime = DateTimeOf<(Job, unit::Creation)>;

/// [`DateTime`] when a [`Job`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Job, unit::Modification)>;

/// [`DateTime`] when a [`Job`] was first started.
pub type StartDateTime = DateTimeOf<(Job, unit::Start)>;

/// [`DateTime`] when a [`Job`] was completed.
pub type FinishDateTime = DateTimeOf<(Job, unit::Finish)>;

#[cfg(test)]
mod spec {
    use common::DateTimeOf;

    use crate::domain::{quote, user};

    use super::{Id, Job, Status};

    fn job() -> Job {
        let now = DateTimeOf::<()>::now();
        Job {
            id: Id::new(),
            quote_id: quote::Id::new(),
            item_id: quote::item::Id::new(),
            employee_id: user::Id::new(),
            status: Status::Pending,
            estimated_hours: "8".parse().unwrap(),
            worked_hours: "0".parse().unwrap(),
            notes: None,
            assigned_by: user::Id::new(),
            started_at: None,
            finished_at: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn follows_allowed_transitions() {
        use Status as S;

        assert!(S::Pending.can_become(S::InProgress));
        assert!(S::Pending.can_become(S::Suspended));
        assert!(S::InProgress.can_become(S::Completed));
        assert!(S::Suspended.can_become(S::Pending));
        assert!(S::Completed.can_become(S::InProgress));

        assert!(!S::Pending.can_become(S::Completed));
        assert!(!S::Completed.can_become(S::Pending));
        assert!(!S::Completed.can_become(S::Suspended));
        assert!(!S::InProgress.can_become(S::Pending));
    }

    #[test]
    fn stamps_start_only_once() {
        let mut job = job();

        assert!(job.transit(Status::InProgress));
        let started = job.started_at.unwrap();

        assert!(job.transit(Status::Suspended));
        assert!(job.transit(Status::InProgress));
        assert_eq!(job.started_at, Some(started));
    }

    #[test]
    fn clears_finish_when_reopened() {
        let mut job = job();

        assert!(job.transit(Status::InProgress));
        assert!(job.transit(Status::Completed));
        assert!(job.finished_at.is_some());

        assert!(job.transit(Status::InProgress));
        assert!(job.finished_at.is_none());
    }

    #[test]
    fn refuses_forbidden_transition() {
        let mut job = job();

        assert!(!job.transit(Status::Completed));
        assert_eq!(job.status, Status::Pending);
        assert!(job.finished_at.is_none());
    }
}
