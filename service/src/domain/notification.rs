//! [`Notification`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    job,
    material::{self, maintenance},
    quote, user, Job, Material, Quote,
};
#[cfg(doc)]
use crate::domain::User;

/// In-app message addressed to a [`User`].
#[derive(Clone, Debug)]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// ID of the [`User`] this [`Notification`] is addressed to.
    pub user_id: user::Id,

    /// [`Title`] of this [`Notification`].
    pub title: Title,

    /// [`Message`] of this [`Notification`].
    pub message: Message,

    /// [`Kind`] of this [`Notification`].
    pub kind: Kind,

    /// Indicator whether this [`Notification`] has been read.
    pub is_read: bool,

    /// [`Link`] to the subject of this [`Notification`].
    pub link: Option<Link>,

    /// ID of the [`Material`] this [`Notification`] warns about the
    /// maintenance of.
    pub material_id: Option<material::Id>,

    /// [`DateTime`] when this [`Notification`] was created.
    pub created_at: CreationDateTime,
}

impl Notification {
    /// Creates a new unread [`Notification`] for the provided [`User`].
    #[must_use]
    pub fn new(
        user_id: user::Id,
        kind: Kind,
        title: Title,
        message: Message,
    ) -> Self {
        Self {
            id: Id::new(),
            user_id,
            title,
            message,
            kind,
            is_read: false,
            link: None,
            material_id: None,
            created_at: DateTimeOf::now(),
        }
    }

    /// Attaches the provided [`Link`] to this [`Notification`].
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    /// Marks this [`Notification`] as a maintenance warning about the
    /// provided [`Material`].
    #[must_use]
    pub const fn about_material(mut self, id: material::Id) -> Self {
        self.material_id = Some(id);
        self
    }
}

/// Well-known [`Notification`]s.
impl Notification {
    /// Creates a [`Notification`] for the creator of the provided [`Quote`]
    /// about the [`quote::Response`] of its [`Client`].
    ///
    /// [`Client`]: crate::domain::Client
    #[must_use]
    pub fn quote_responded(quote: &Quote, response: &quote::Response) -> Self {
        let kind = match response {
            quote::Response::Approve => Kind::Success,
            quote::Response::Reject(_) => Kind::Danger,
            quote::Response::RequestChanges => Kind::Warning,
        };
        Self::new(
            quote.created_by,
            kind,
            Title(format!("Quote {} {}", quote.number, response.status())),
            Message(format!(
                "{} {response} the quote {} ({}).",
                quote.client_name, quote.number, quote.reference,
            )),
        )
        .with_link(Link::to_quote(quote.id))
    }

    /// Creates a [`Notification`] for the creator of the provided [`Quote`]
    /// about changes being requested to it.
    #[must_use]
    pub fn quote_changes_requested(quote: &Quote) -> Self {
        Self::new(
            quote.created_by,
            Kind::Warning,
            Title(format!("Changes requested to quote {}", quote.number)),
            Message(format!(
                "The quote {} ({}) needs changes before being sent again.",
                quote.number, quote.reference,
            )),
        )
        .with_link(Link::to_quote(quote.id))
    }

    /// Creates a [`Notification`] for the creator of the provided [`Quote`]
    /// about it being expired.
    #[must_use]
    pub fn quote_expired(quote: &Quote) -> Self {
        Self::new(
            quote.created_by,
            Kind::Warning,
            Title(format!("Quote {} expired", quote.number)),
            Message(format!(
                "{} didn't respond to the quote {} ({}) in time.",
                quote.client_name, quote.number, quote.reference,
            )),
        )
        .with_link(Link::to_quote(quote.id))
    }

    /// Creates a [`Notification`] for the employee the provided [`Job`] is
    /// assigned to.
    #[must_use]
    pub fn job_assigned(job: &Job, quote: &Quote) -> Self {
        Self::new(
            job.employee_id,
            Kind::Info,
            Title(format!("New job on quote {}", quote.number)),
            Message(format!(
                "You were assigned {} estimated hours on {} ({}).",
                job.estimated_hours, quote.reference, quote.location,
            )),
        )
        .with_link(Link::to_job(job.id))
    }

    /// Creates a maintenance warning about the provided [`Material`] for the
    /// [`User`] with the provided ID.
    #[must_use]
    pub fn maintenance_due(
        user_id: user::Id,
        material: &Material,
        assessment: &maintenance::Assessment,
    ) -> Self {
        let (kind, state) = if assessment.status == maintenance::Status::Overdue
        {
            (Kind::Danger, "overdue")
        } else {
            (Kind::Warning, "upcoming")
        };
        let remaining = assessment
            .remaining
            .map(|r| format!(" ({r} remaining)"))
            .unwrap_or_default();
        let origin = match assessment.threshold.origin {
            maintenance::ThresholdOrigin::Manual => "manual",
            maintenance::ThresholdOrigin::Automatic => "automatic",
        };
        Self::new(
            user_id,
            kind,
            Title(format!("Maintenance {state}: {}", material.code)),
            Message(format!(
                "Maintenance of {} [{}] is {state}{remaining}. \
                 Alert margin ({origin}): {}.",
                material.name, material.code, assessment.threshold.value,
            )),
        )
        .with_link(Link::to_material(material.id))
        .about_material(material.id)
    }
}

/// ID of a [`Notification`].
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

/// Short title of a [`Notification`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`], truncating it to 200 characters.
    ///
    /// [`None`] is returned if the given `text` is blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (!text.is_empty()).then(|| Self(text.chars().take(200).collect()))
    }
}

/// Body of a [`Notification`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`] if the given `text` is not blank.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (!text.is_empty()).then(|| Self(text.to_owned()))
    }
}

/// Relative link to the subject of a [`Notification`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Link(String);

impl Link {
    /// Creates a new [`Link`] if the given `path` is an absolute path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        (path.starts_with('/') && path.len() <= 500).then_some(Self(path))
    }

    /// Creates a new [`Link`] to the [`Quote`] with the provided ID.
    #[must_use]
    pub fn to_quote(id: quote::Id) -> Self {
        Self(format!("/quotes/{id}"))
    }

    /// Creates a new [`Link`] to the [`Job`] with the provided ID.
    #[must_use]
    pub fn to_job(id: job::Id) -> Self {
        Self(format!("/jobs/{id}"))
    }

    /// Creates a new [`Link`] to the [`Material`] with the provided ID.
    #[must_use]
    pub fn to_material(id: material::Id) -> Self {
        Self(format!("/materials/{id}"))
    }
}

define_kind! {
    #[doc = "Severity of a [`Notification`]."]
    enum Kind {
        #[doc = "Informational message."]
        Info = 1,

        #[doc = "Something went well."]
        Success = 2,

        #[doc = "Something needs attention soon."]
        Warning = 3,

        #[doc = "Something needs attention right now."]
        Danger = 4,
    }
}

/// [`DateTime`] when a [`Notification`] was created.
pub type CreationDateTime = DateTimeOf<(Notification, unit::Creation)>;

#[cfg(test)]
mod spec {
    use crate::domain::{material, user};

    use super::{Kind, Link, Message, Notification, Title};

    #[test]
    fn creates_unread() {
        let material = material::Id::new();
        let n = Notification::new(
            user::Id::new(),
            Kind::Warning,
            Title::new("Mantenimiento próximo").unwrap(),
            Message::new("Quedan 3 días").unwrap(),
        )
        .about_material(material);

        assert!(!n.is_read);
        assert_eq!(n.material_id, Some(material));
        assert!(n.link.is_none());
    }

    #[test]
    fn truncates_long_title() {
        let title = Title::new("x".repeat(300)).unwrap();

        assert_eq!(title.as_ref().chars().count(), 200);
        assert!(Title::new("  ").is_none());
    }

    #[test]
    fn accepts_only_absolute_links() {
        assert!(Link::new("/quotes/2024-0001").is_some());
        assert!(Link::new("https://example.com").is_none());
    }
}
