//! [`Job`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// Assignment of an employee to a labor [`api::quote::Item`].
#[derive(Clone, Debug)]
pub struct Job {
    /// ID of this [`Job`].
    pub id: Id,

    /// [`domain::Job`] representing this [`Job`].
    job: OnceCell<domain::Job>,
}

impl From<domain::Job> for Job {
    fn from(job: domain::Job) -> Self {
        Self {
            id: job.id.into(),
            job: OnceCell::new_with(Some(job)),
        }
    }
}

impl Job {
    /// Creates a new [`Job`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Job`] with the provided ID exists,
    /// otherwise accessing this [`Job`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            job: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Job`] representing this [`Job`].
    async fn job(&self, ctx: &Context) -> Result<&domain::Job, Error> {
        let id = self.id.into();
        self.job
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::job::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|j| {
                        future::ready(j.ok_or_else(|| {
                            api::query::JobError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Assignment of an employee to a labor `QuoteItem`.
#[graphql_object(context = Context)]
impl Job {
    /// Unique identifier of this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Quote` this `Job` is part of.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.quote",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn quote(&self, ctx: &Context) -> Result<api::Quote, Error> {
        let id = self.job(ctx).await?.quote_id;
        #[expect(unsafe_code, reason = "`Job` is removed along its `Quote`")]
        let quote = unsafe { api::Quote::new_unchecked(id) };
        Ok(quote)
    }

    /// Labor `QuoteItem` this `Job` is about.
    pub async fn item(
        &self,
        ctx: &Context,
    ) -> Result<api::quote::Item, Error> {
        let id = self.job(ctx).await?.item_id;
        ctx.service()
            .execute(query::quote::ItemById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::QuoteError::ItemNotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Employee assigned to this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.employee",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn employee(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.job(ctx).await?.employee_id;
        #[expect(unsafe_code, reason = "`User`s are never removed")]
        let user = unsafe { api::User::new_unchecked(id) };
        Ok(user)
    }

    /// `JobStatus` of this `Job`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Job.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.job(ctx).await?.status.into())
    }

    /// Hours estimated by the labor `QuoteItem`.
    pub async fn estimated_hours(
        &self,
        ctx: &Context,
    ) -> Result<api::quote::Quantity, Error> {
        Ok(self.job(ctx).await?.estimated_hours.into())
    }

    /// Hours actually worked.
    pub async fn worked_hours(
        &self,
        ctx: &Context,
    ) -> Result<api::quote::Quantity, Error> {
        Ok(self.job(ctx).await?.worked_hours.into())
    }

    /// Notes of the employee.
    pub async fn notes(&self, ctx: &Context) -> Result<Option<Notes>, Error> {
        Ok(self.job(ctx).await?.notes.clone().map(Into::into))
    }

    /// `User` who assigned this `Job`.
    pub async fn assigned_by(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.job(ctx).await?.assigned_by;
        #[expect(unsafe_code, reason = "`User`s are never removed")]
        let user = unsafe { api::User::new_unchecked(id) };
        Ok(user)
    }

    /// `DateTime` when this `Job` was first started.
    pub async fn started_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.job(ctx).await?.started_at.map(|d| d.coerce()))
    }

    /// `DateTime` when this `Job` was completed.
    pub async fn finished_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.job(ctx).await?.finished_at.map(|d| d.coerce()))
    }

    /// `DateTime` when this `Job` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.job(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Job` was last modified.
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.job(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Job`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::job::Id)]
#[into(domain::job::Id)]
#[graphql(name = "JobId", transparent)]
pub struct Id(Uuid);

/// Notes of an employee on a `Job`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "JobNotes", with = scalar::Via::<domain::job::Notes>)]
pub struct Notes(domain::job::Notes);

/// Status of a `Job`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "JobStatus")]
pub enum Status {
    /// Assigned, not started yet.
    Pending,

    /// Being worked on.
    InProgress,

    /// Done.
    Completed,

    /// Put on hold.
    Suspended,
}

impl From<domain::job::Status> for Status {
    fn from(status: domain::job::Status) -> Self {
        use domain::job::Status as S;

        match status {
            S::Pending => Self::Pending,
            S::InProgress => Self::InProgress,
            S::Completed => Self::Completed,
            S::Suspended => Self::Suspended,
        }
    }
}

impl From<Status> for domain::job::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::InProgress => Self::InProgress,
            Status::Completed => Self::Completed,
            Status::Suspended => Self::Suspended,
        }
    }
}

pub mod list {
    //! Definitions related to [`Job`] list.

    use service::{query, read};

    use super::{Id, Job};

    define_list! {
        id = Id,
        node = Job,
        read = read::job::list,
        names = (
            "JobListCursor",
            "JobListEdge",
            "JobListConnection",
            "JobListPageInfo",
        ),
        total_count = query::jobs::TotalCount,
        count_by = read::job::list::Filter,
    }
}
