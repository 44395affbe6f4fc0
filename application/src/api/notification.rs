//! [`Notification`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// In-app message addressed to the current [`api::User`].
#[derive(Clone, Debug)]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// [`domain::Notification`] representing this [`Notification`].
    notification: OnceCell<domain::Notification>,
}

impl From<domain::Notification> for Notification {
    fn from(notification: domain::Notification) -> Self {
        Self {
            id: notification.id.into(),
            notification: OnceCell::new_with(Some(notification)),
        }
    }
}

impl Notification {
    /// Creates a new [`Notification`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Notification`] with the provided ID exists,
    /// otherwise accessing this [`Notification`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            notification: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Notification`] representing this
    /// [`Notification`].
    ///
    /// # Errors
    ///
    /// Errors if the [`Notification`] doesn't exist or is addressed to
    /// another [`api::User`].
    async fn notification(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Notification, Error> {
        let id = self.id.into();
        self.notification
            .get_or_try_init(|| async move {
                let my_id = ctx.current_session().await?.user_id;
                ctx.service()
                    .execute(query::notification::ById::by(id))
                    .await
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())?
                    .filter(|n| api::user::Id::from(n.user_id) == my_id)
                    .ok_or_else(|| {
                        api::query::NotificationError::NotExists.into()
                    })
                    .map_err(ctx.error())
            })
            .await
    }
}

/// In-app message addressed to the current `User`.
#[graphql_object(context = Context)]
impl Notification {
    /// Unique identifier of this `Notification`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Notification.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Short title of this `Notification`.
    pub async fn title(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.notification(ctx).await?.title.to_string())
    }

    /// Body of this `Notification`.
    pub async fn message(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.notification(ctx).await?.message.to_string())
    }

    /// `NotificationKind` of this `Notification`.
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.notification(ctx).await?.kind.into())
    }

    /// Indicator whether this `Notification` has been read.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Notification.isRead",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_read(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.notification(ctx).await?.is_read)
    }

    /// Relative link to the subject of this `Notification`.
    pub async fn link(&self, ctx: &Context) -> Result<Option<String>, Error> {
        Ok(self.notification(ctx).await?.link.as_ref().map(|l| l.to_string()))
    }

    /// `Material` this `Notification` warns about the maintenance of.
    pub async fn material(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Material>, Error> {
        let id = self.notification(ctx).await?.material_id;
        #[expect(
            unsafe_code,
            reason = "`Notification` references existing `Material` only"
        )]
        let material = id.map(|id| unsafe { api::Material::new_unchecked(id) });
        Ok(material)
    }

    /// `DateTime` when this `Notification` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.notification(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Notification`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::notification::Id)]
#[into(domain::notification::Id)]
#[graphql(name = "NotificationId", transparent)]
pub struct Id(Uuid);

/// Severity of a `Notification`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "NotificationKind")]
pub enum Kind {
    /// Informational message.
    Info,

    /// Something went well.
    Success,

    /// Something needs attention soon.
    Warning,

    /// Something needs attention right now.
    Danger,
}

impl From<domain::notification::Kind> for Kind {
    fn from(kind: domain::notification::Kind) -> Self {
        use domain::notification::Kind as K;

        match kind {
            K::Info => Self::Info,
            K::Success => Self::Success,
            K::Warning => Self::Warning,
            K::Danger => Self::Danger,
        }
    }
}

pub mod list {
    //! Definitions related to [`Notification`] list.

    use service::{query, read};

    use super::{Id, Notification};

    define_list! {
        id = Id,
        node = Notification,
        read = read::notification::list,
        names = (
            "NotificationListCursor",
            "NotificationListEdge",
            "NotificationListConnection",
            "NotificationListPageInfo",
        ),
        total_count = query::notifications::TotalCount,
        count_by = read::notification::list::Filter,
    }
}
