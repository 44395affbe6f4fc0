//! [`Loan`]-related definitions.

use common::{Date, DateTime};
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

/// An [`api::Material`] lent to a third party until a due date.
#[derive(Clone, Debug)]
pub struct Loan {
    /// ID of this [`Loan`].
    pub id: Id,

    /// [`domain::Loan`] representing this [`Loan`].
    loan: OnceCell<domain::Loan>,
}

impl From<domain::Loan> for Loan {
    fn from(loan: domain::Loan) -> Self {
        Self {
            id: loan.id.into(),
            loan: OnceCell::new_with(Some(loan)),
        }
    }
}

impl Loan {
    /// Creates a new [`Loan`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Loan`] with the provided ID exists,
    /// otherwise accessing this [`Loan`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            loan: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Loan`] representing this [`Loan`].
    ///
    /// # Errors
    ///
    /// Errors if the [`Loan`] has been returned meanwhile.
    async fn loan(&self, ctx: &Context) -> Result<&domain::Loan, Error> {
        let id = self.id.into();
        self.loan
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::loan::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|l| {
                        future::ready(l.ok_or_else(|| {
                            api::query::LoanError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Material` lent to a third party until a due date.
#[graphql_object(context = Context)]
impl Loan {
    /// Unique identifier of this `Loan`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Loan.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Lent `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Loan.material",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn material(
        &self,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        let id = self.loan(ctx).await?.material_id;
        #[expect(
            unsafe_code,
            reason = "lent `Material` cannot be removed"
        )]
        let material = unsafe { api::Material::new_unchecked(id) };
        Ok(material)
    }

    /// Borrower of the `Material`.
    pub async fn borrower(&self, ctx: &Context) -> Result<Borrower, Error> {
        Ok(self.loan(ctx).await?.borrower.clone().into())
    }

    /// `Date` when the `Material` was lent.
    pub async fn issued_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.loan(ctx).await?.issued_on.coerce())
    }

    /// `Date` when the `Material` is expected back.
    pub async fn due_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.loan(ctx).await?.due_on.coerce())
    }

    /// Number of days left until this `Loan` is due, negative once overdue.
    pub async fn days_remaining(&self, ctx: &Context) -> Result<i32, Error> {
        let days = self.loan(ctx).await?.days_remaining(Date::today());
        Ok(i32::try_from(days).unwrap_or(i32::MIN))
    }

    /// `LoanStatus` of this `Loan` as of today.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Loan.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.loan(ctx).await?.status(Date::today()).into())
    }

    /// Notes on this `Loan`.
    pub async fn notes(&self, ctx: &Context) -> Result<Option<Notes>, Error> {
        Ok(self.loan(ctx).await?.notes.clone().map(Into::into))
    }

    /// `User` who registered this `Loan`.
    pub async fn registered_by(
        &self,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let id = self.loan(ctx).await?.registered_by;
        #[expect(unsafe_code, reason = "`User`s are never removed")]
        let user = unsafe { api::User::new_unchecked(id) };
        Ok(user)
    }

    /// `DateTime` when this `Loan` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.loan(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Loan` was last modified.
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.loan(ctx).await?.updated_at.coerce())
    }
}

/// History entry of a returned [`Loan`].
#[derive(Clone, Debug)]
pub struct Record {
    /// ID of this [`Record`].
    pub id: RecordId,

    /// [`domain::loan::Record`] representing this [`Record`].
    record: OnceCell<domain::loan::Record>,
}

impl From<domain::loan::Record> for Record {
    fn from(record: domain::loan::Record) -> Self {
        Self {
            id: record.id.into(),
            record: OnceCell::new_with(Some(record)),
        }
    }
}

impl Record {
    /// Creates a new [`Record`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Record`] with the provided ID exists,
    /// otherwise accessing this [`Record`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            record: OnceCell::new(),
        }
    }

    /// Returns the [`domain::loan::Record`] representing this [`Record`].
    async fn record(
        &self,
        ctx: &Context,
    ) -> Result<&domain::loan::Record, Error> {
        let id = self.id.into();
        self.record
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::loan::RecordById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::LoanError::RecordNotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// History entry of a returned `Loan`.
#[graphql_object(name = "LoanRecord", context = Context)]
impl Record {
    /// Unique identifier of this `LoanRecord`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LoanRecord.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Lent `Material`, if it's still registered.
    pub async fn material(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Material>, Error> {
        let id = self.record(ctx).await?.material_id;
        #[expect(
            unsafe_code,
            reason = "`LoanRecord` references existing `Material` only"
        )]
        let material =
            id.map(|id| unsafe { api::Material::new_unchecked(id) });
        Ok(material)
    }

    /// Code of the lent `Material` at the time of return.
    pub async fn material_code(
        &self,
        ctx: &Context,
    ) -> Result<api::material::Code, Error> {
        Ok(self.record(ctx).await?.material_code.clone().into())
    }

    /// Name of the lent `Material` at the time of return.
    pub async fn material_name(
        &self,
        ctx: &Context,
    ) -> Result<api::material::Name, Error> {
        Ok(self.record(ctx).await?.material_name.clone().into())
    }

    /// Borrower of the `Material`.
    pub async fn borrower(&self, ctx: &Context) -> Result<Borrower, Error> {
        Ok(self.record(ctx).await?.borrower.clone().into())
    }

    /// `Date` when the `Material` was lent.
    pub async fn issued_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.record(ctx).await?.issued_on.coerce())
    }

    /// `Date` when the `Material` was expected back.
    pub async fn due_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.record(ctx).await?.due_on.coerce())
    }

    /// `Date` when the `Material` was actually returned.
    pub async fn returned_on(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.record(ctx).await?.returned_on.coerce())
    }

    /// Number of days the `Material` was lent for.
    pub async fn duration_days(&self, ctx: &Context) -> Result<i32, Error> {
        let days = self.record(ctx).await?.duration_days();
        Ok(i32::try_from(days).unwrap_or(i32::MAX))
    }

    /// Number of days the `Material` was returned late, zero if on time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "LoanRecord.daysLate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn days_late(&self, ctx: &Context) -> Result<i32, Error> {
        let days = self.record(ctx).await?.days_late();
        Ok(i32::try_from(days).unwrap_or(i32::MAX))
    }

    /// Indicator whether the `Material` was returned late.
    pub async fn was_late(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.record(ctx).await?.was_late())
    }

    /// Notes on the returned `Loan`.
    pub async fn notes(&self, ctx: &Context) -> Result<Option<Notes>, Error> {
        Ok(self.record(ctx).await?.notes.clone().map(Into::into))
    }

    /// `User` who registered the return.
    pub async fn registered_by(
        &self,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let id = self.record(ctx).await?.registered_by;
        #[expect(unsafe_code, reason = "`User`s are never removed")]
        let user = unsafe { api::User::new_unchecked(id) };
        Ok(user)
    }

    /// `DateTime` when this `LoanRecord` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.record(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Loan`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::loan::Id)]
#[into(domain::loan::Id)]
#[graphql(name = "LoanId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a `LoanRecord`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::loan::record::Id)]
#[into(domain::loan::record::Id)]
#[graphql(name = "LoanRecordId", transparent)]
pub struct RecordId(Uuid);

/// Borrower of a lent `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "LoanBorrower",
    with = scalar::Via::<domain::loan::Borrower>,
)]
pub struct Borrower(domain::loan::Borrower);

/// Notes on a `Loan`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "LoanNotes", with = scalar::Via::<domain::loan::Notes>)]
pub struct Notes(domain::loan::Notes);

/// Status of a `Loan` relative to its due date.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "LoanStatus")]
pub enum Status {
    /// Due in more than a few days.
    OnTime,

    /// Due in a few days or today.
    DueSoon,

    /// Due date has passed.
    Overdue,
}

impl From<domain::loan::Status> for Status {
    fn from(status: domain::loan::Status) -> Self {
        use domain::loan::Status as S;

        match status {
            S::OnTime => Self::OnTime,
            S::DueSoon => Self::DueSoon,
            S::Overdue => Self::Overdue,
        }
    }
}

pub mod list {
    //! Definitions related to active [`Loan`]s list.

    use service::{query, read};

    use super::{Id, Loan};

    define_list! {
        id = Id,
        node = Loan,
        read = read::loan::list,
        names = (
            "LoanListCursor",
            "LoanListEdge",
            "LoanListConnection",
            "LoanListPageInfo",
        ),
        total_count = query::loans::TotalCount,
        count_by = read::loan::list::Filter,
    }
}

pub mod history {
    //! Definitions related to the lending history of [`Record`]s.

    use service::{query, read};

    use super::{Record, RecordId};

    define_list! {
        id = RecordId,
        node = Record,
        read = read::loan::history,
        names = (
            "LoanHistoryCursor",
            "LoanHistoryEdge",
            "LoanHistoryConnection",
            "LoanHistoryPageInfo",
        ),
        total_count = query::loans::HistoryTotalCount,
        count_by = read::loan::history::Filter,
    }
}
