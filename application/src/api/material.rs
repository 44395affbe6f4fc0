//! [`Material`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use rust_decimal::Decimal;
use service::{
    domain::{self, material::maintenance},
    query, Query as _,
};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// A [`Material`] or a tool the company quotes, uses and lends.
#[derive(Clone, Debug)]
pub struct Material {
    /// ID of this [`Material`].
    pub id: Id,

    /// [`domain::Material`] representing this [`Material`].
    material: OnceCell<domain::Material>,
}

impl From<domain::Material> for Material {
    fn from(material: domain::Material) -> Self {
        Self {
            id: material.id.into(),
            material: OnceCell::new_with(Some(material)),
        }
    }
}

impl Material {
    /// Creates a new [`Material`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Material`] with the provided ID exists,
    /// otherwise accessing this [`Material`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            material: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Material`] representing this [`Material`].
    async fn material(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Material, Error> {
        let id = self.id.into();
        self.material
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::material::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|m| {
                        future::ready(m.ok_or_else(|| {
                            api::query::MaterialError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Material` or a tool the company quotes, uses and lends.
#[graphql_object(context = Context)]
impl Material {
    /// Unique identifier of this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Unique code of this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.code",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn code(&self, ctx: &Context) -> Result<Code, Error> {
        Ok(self.material(ctx).await?.code.clone().into())
    }

    /// Name of this `Material`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.material(ctx).await?.name.clone().into())
    }

    /// Description of this `Material`.
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.material(ctx).await?.description.clone().map(Into::into))
    }

    /// Price of a single unit of this `Material`.
    pub async fn unit_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.material(ctx).await?.unit_price)
    }

    /// Unit this `Material` is measured in.
    pub async fn unit(&self, ctx: &Context) -> Result<Unit, Error> {
        Ok(self.material(ctx).await?.unit.clone().into())
    }

    /// Category of this `Material`.
    pub async fn category(
        &self,
        ctx: &Context,
    ) -> Result<Option<Category>, Error> {
        Ok(self.material(ctx).await?.category.clone().map(Into::into))
    }

    /// Indicator whether this `Material` is available for use.
    ///
    /// `Material`s are inactive while lent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.isActive",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.material(ctx).await?.is_active)
    }

    /// Maintenance schedule of this `Material`, if it requires any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.maintenance",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn maintenance(
        &self,
        ctx: &Context,
    ) -> Result<Option<MaintenanceSchedule>, Error> {
        Ok(self.material(ctx).await?.maintenance.map(Into::into))
    }

    /// `Loan` this `Material` is currently lent by, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Material.loan",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn loan(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Loan>, Error> {
        ctx.service()
            .execute(query::loan::ByMaterial::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|l| l.map(Into::into))
    }

    /// `DateTime` when this `Material` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.material(ctx).await?.created_at.coerce())
    }

    /// Indicator whether this `Material` was deleted.
    pub async fn is_deleted(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.material(ctx).await?.deleted_at.is_some())
    }
}

/// Unique identifier of a `Material`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::material::Id)]
#[into(domain::material::Id)]
#[graphql(name = "MaterialId", transparent)]
pub struct Id(Uuid);

/// Unique code of a `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialCode",
    with = scalar::Via::<domain::material::Code>,
)]
pub struct Code(domain::material::Code);

/// Name of a `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialName",
    with = scalar::Via::<domain::material::Name>,
)]
pub struct Name(domain::material::Name);

/// Description of a `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialDescription",
    with = scalar::Via::<domain::material::Description>,
)]
pub struct Description(domain::material::Description);

/// Unit a `Material` is measured in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialUnit",
    with = scalar::Via::<domain::material::Unit>,
)]
pub struct Unit(domain::material::Unit);

/// Category of a `Material`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaterialCategory",
    with = scalar::Via::<domain::material::Category>,
)]
pub struct Category(domain::material::Category);

/// Decimal number of hours.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Hours", with = scalar::Via::<Decimal>)]
pub struct Hours(Decimal);

/// Kind of a `MaintenanceSchedule`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "MaintenanceKind")]
pub enum MaintenanceKind {
    /// Maintenance every fixed number of calendar days.
    Days,

    /// Maintenance every fixed number of usage hours.
    Hours,
}

impl From<maintenance::Kind> for MaintenanceKind {
    fn from(kind: maintenance::Kind) -> Self {
        match kind {
            maintenance::Kind::Days => Self::Days,
            maintenance::Kind::Hours => Self::Hours,
        }
    }
}

/// Maintenance status of a `Material`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "MaintenanceStatus")]
pub enum MaintenanceStatus {
    /// Schedule cannot be evaluated yet, as no maintenance was registered.
    Unknown,

    /// Next maintenance is far enough.
    Ok,

    /// Next maintenance is within the alert threshold.
    Upcoming,

    /// Next maintenance deadline has passed.
    Overdue,
}

impl From<maintenance::Status> for MaintenanceStatus {
    fn from(status: maintenance::Status) -> Self {
        use maintenance::Status as S;

        match status {
            S::Unknown => Self::Unknown,
            S::Ok => Self::Ok,
            S::Upcoming => Self::Upcoming,
            S::Overdue => Self::Overdue,
        }
    }
}

/// Periodic maintenance schedule of a [`Material`].
#[derive(Clone, Copy, Debug, From)]
pub struct MaintenanceSchedule(domain::material::MaintenanceSchedule);

/// Periodic maintenance schedule of a `Material`.
#[graphql_object(context = Context)]
impl MaintenanceSchedule {
    /// Kind of this `MaintenanceSchedule`.
    #[must_use]
    pub fn kind(&self) -> MaintenanceKind {
        self.0.kind().into()
    }

    /// Number of days or usage hours between two maintenances.
    #[must_use]
    pub fn interval(&self) -> i32 {
        let (maintenance::Schedule::ByDays { interval, .. }
        | maintenance::Schedule::ByHours { interval, .. }) = self.0;
        i32::try_from(interval).unwrap_or(i32::MAX)
    }

    /// `Date` when the last maintenance was performed.
    ///
    /// Always `null` for the `HOURS` kind.
    #[must_use]
    pub fn last_performed_on(&self) -> Option<Date> {
        match self.0 {
            maintenance::Schedule::ByDays {
                last_performed_on, ..
            } => last_performed_on.map(|d| d.coerce()),
            maintenance::Schedule::ByHours { .. } => None,
        }
    }

    /// Usage hours accumulated since the last maintenance.
    ///
    /// Always `null` for the `DAYS` kind.
    #[must_use]
    pub fn accumulated_hours(&self) -> Option<Hours> {
        match self.0 {
            maintenance::Schedule::ByHours { accumulated, .. } => {
                Some(accumulated.into())
            }
            maintenance::Schedule::ByDays { .. } => None,
        }
    }

    /// Effective number of days or hours before the deadline to alert at.
    #[must_use]
    pub fn alert_threshold(&self) -> i32 {
        i32::try_from(self.0.threshold().value).unwrap_or(i32::MAX)
    }

    /// Indicator whether the `alertThreshold` was configured manually rather
    /// than derived from the `interval`.
    #[must_use]
    pub fn is_alert_threshold_manual(&self) -> bool {
        self.0.threshold().origin == maintenance::ThresholdOrigin::Manual
    }

    /// Assessment of this `MaintenanceSchedule` as of today.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceSchedule.assessment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn assessment(&self) -> MaintenanceAssessment {
        let assessment = self.0.assess(Date::today());
        let (remaining_days, remaining_hours) = match assessment.remaining {
            Some(maintenance::Remaining::Days(d)) => {
                (Some(i32::try_from(d).unwrap_or(i32::MAX)), None)
            }
            Some(maintenance::Remaining::Hours(h)) => (None, Some(h.into())),
            None => (None, None),
        };
        MaintenanceAssessment {
            status: assessment.status.into(),
            remaining_days,
            remaining_hours,
        }
    }
}

/// Assessment of a `MaintenanceSchedule`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
pub struct MaintenanceAssessment {
    /// Maintenance status.
    pub status: MaintenanceStatus,

    /// Whole days until the next maintenance, negative when overdue.
    pub remaining_days: Option<i32>,

    /// Usage hours until the next maintenance, negative when overdue.
    pub remaining_hours: Option<Hours>,
}

/// Periodic maintenance schedule of a `Material`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "MaintenanceScheduleInput")]
pub struct MaintenanceScheduleInput {
    /// Kind of the schedule.
    pub kind: MaintenanceKind,

    /// Positive number of days or usage hours between two maintenances.
    pub interval: i32,

    /// `Date` when the last maintenance was performed.
    ///
    /// Considered for the `DAYS` kind only.
    pub last_performed_on: Option<Date>,

    /// Usage hours accumulated since the last maintenance.
    ///
    /// Considered for the `HOURS` kind only.
    pub accumulated_hours: Option<Hours>,

    /// Number of days or hours before the deadline to alert at.
    ///
    /// Derived from the `interval` if not positive or omitted.
    pub alert_threshold: Option<i32>,
}

define_error! {
    enum MaintenanceScheduleError {
        #[code = "INVALID_MAINTENANCE_SCHEDULE"]
        #[status = BAD_REQUEST]
        #[message = "`MaintenanceSchedule` must have a positive `interval` \
                     and non-negative `accumulatedHours`"]
        Invalid,
    }
}

impl TryFrom<MaintenanceScheduleInput>
    for domain::material::MaintenanceSchedule
{
    type Error = MaintenanceScheduleError;

    fn try_from(input: MaintenanceScheduleInput) -> Result<Self, Self::Error> {
        let MaintenanceScheduleInput {
            kind,
            interval,
            last_performed_on,
            accumulated_hours,
            alert_threshold,
        } = input;

        let interval = u32::try_from(interval)
            .map_err(|_| MaintenanceScheduleError::Invalid)?;
        let alert = alert_threshold.and_then(|a| u32::try_from(a).ok());
        match kind {
            MaintenanceKind::Days => Self::by_days(
                interval,
                last_performed_on.map(|d| d.coerce()),
                alert,
            ),
            MaintenanceKind::Hours => Self::by_hours(
                interval,
                accumulated_hours.map_or(Decimal::ZERO, Into::into),
                alert,
            ),
        }
        .ok_or(MaintenanceScheduleError::Invalid)
    }
}

pub mod list {
    //! Definitions related to [`Material`] list.

    use service::{query, read};

    use super::{Id, Material};

    define_list! {
        id = Id,
        node = Material,
        read = read::material::list,
        names = (
            "MaterialListCursor",
            "MaterialListEdge",
            "MaterialListConnection",
            "MaterialListPageInfo",
        ),
        total_count = query::materials::TotalCount,
        count_by = (),
    }
}

#[cfg(test)]
mod spec {
    use common::Date;
    use rust_decimal::Decimal;
    use service::domain::material::maintenance::Schedule;

    use super::{MaintenanceKind, MaintenanceScheduleInput};

    fn input(
        kind: MaintenanceKind,
        interval: i32,
    ) -> MaintenanceScheduleInput {
        MaintenanceScheduleInput {
            kind,
            interval,
            last_performed_on: None,
            accumulated_hours: None,
            alert_threshold: None,
        }
    }

    #[test]
    fn converts_days_schedule() {
        let mut i = input(MaintenanceKind::Days, 90);
        i.last_performed_on = Some("2024-03-01".parse::<Date>().unwrap());
        i.alert_threshold = Some(10);

        let schedule = Schedule::try_from(i).unwrap();

        assert_eq!(
            schedule,
            Schedule::by_days(
                90,
                Some("2024-03-01".parse::<Date>().unwrap().coerce()),
                Some(10),
            )
            .unwrap(),
        );
    }

    #[test]
    fn defaults_accumulated_hours_to_zero() {
        let schedule =
            Schedule::try_from(input(MaintenanceKind::Hours, 250)).unwrap();

        assert_eq!(
            schedule,
            Schedule::by_hours(250, Decimal::ZERO, None).unwrap(),
        );
    }

    #[test]
    fn rejects_non_positive_interval() {
        assert!(Schedule::try_from(input(MaintenanceKind::Days, 0)).is_err());
        assert!(Schedule::try_from(input(MaintenanceKind::Hours, -5)).is_err());
    }

    #[test]
    fn ignores_negative_alert_threshold() {
        let mut i = input(MaintenanceKind::Days, 30);
        i.alert_threshold = Some(-1);

        assert_eq!(
            Schedule::try_from(i).unwrap(),
            Schedule::by_days(30, None, None).unwrap(),
        );
    }
}
