//! Maintenance [`Schedule`] of a [`Material`].

use std::{fmt, hash::Hash as _};

#[cfg(doc)]
use common::Date;
use common::{define_kind, unit, DateOf};
use derive_more::{Display, Error, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use xxhash_rust::xxh3;

use crate::domain::material;
#[cfg(doc)]
use crate::domain::Material;

/// Periodic maintenance schedule of a [`Material`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Schedule {
    /// Maintenance every fixed number of calendar days.
    ByDays {
        /// Number of days between two maintenances.
        interval: u32,

        /// [`Date`] when the last maintenance was performed.
        ///
        /// [`None`] until the first maintenance is registered.
        last_performed_on: Option<PerformedDate>,

        /// Manually configured number of days before the deadline to start
        /// alerting at.
        alert: Option<u32>,
    },

    /// Maintenance every fixed number of usage hours.
    ByHours {
        /// Number of usage hours between two maintenances.
        interval: u32,

        /// Usage hours accumulated since the last maintenance.
        accumulated: Decimal,

        /// Manually configured number of hours before the deadline to start
        /// alerting at.
        alert: Option<u32>,
    },
}

impl Schedule {
    /// Creates a new [`Schedule::ByDays`], if the `interval` is positive.
    #[must_use]
    pub fn by_days(
        interval: u32,
        last_performed_on: Option<PerformedDate>,
        alert: Option<u32>,
    ) -> Option<Self> {
        (interval > 0).then_some(Self::ByDays {
            interval,
            last_performed_on,
            alert,
        })
    }

    /// Creates a new [`Schedule::ByHours`], if the `interval` is positive and
    /// the `accumulated` hours are not negative.
    #[must_use]
    pub fn by_hours(
        interval: u32,
        accumulated: Decimal,
        alert: Option<u32>,
    ) -> Option<Self> {
        (interval > 0 && !accumulated.is_sign_negative()).then_some(
            Self::ByHours {
                interval,
                accumulated,
                alert,
            },
        )
    }

    /// Returns the [`Kind`] of this [`Schedule`].
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::ByDays { .. } => Kind::Days,
            Self::ByHours { .. } => Kind::Hours,
        }
    }

    /// Returns the effective alert [`Threshold`] of this [`Schedule`].
    ///
    /// A manual value wins when it's positive, otherwise the value is derived
    /// from the interval:
    /// - days: `30` for yearly or longer intervals, `7` for monthly or longer
    ///   ones, a quarter of the interval (rounded up) otherwise;
    /// - hours: a quarter of the interval (rounded up).
    #[must_use]
    pub fn threshold(&self) -> Threshold {
        let (interval, alert) = match *self {
            Self::ByDays {
                interval, alert, ..
            }
            | Self::ByHours {
                interval, alert, ..
            } => (interval, alert),
        };

        if let Some(value) = alert.filter(|v| *v > 0) {
            return Threshold {
                value,
                origin: ThresholdOrigin::Manual,
            };
        }

        let value = match self {
            Self::ByDays { .. } if interval >= 365 => 30,
            Self::ByDays { .. } if interval >= 30 => 7,
            Self::ByDays { .. } | Self::ByHours { .. } => interval.div_ceil(4),
        };
        Threshold {
            value,
            origin: ThresholdOrigin::Automatic,
        }
    }

    /// Assesses this [`Schedule`] as of the provided `today` [`Date`].
    #[must_use]
    pub fn assess<Of: ?Sized>(&self, today: DateOf<Of>) -> Assessment {
        let threshold = self.threshold();

        let remaining = match *self {
            Self::ByDays {
                interval,
                last_performed_on,
                ..
            } => last_performed_on.map(|last| {
                Remaining::Days(
                    today.days_until(&last) + i64::from(interval),
                )
            }),
            Self::ByHours {
                interval,
                accumulated,
                ..
            } => Some(Remaining::Hours(Decimal::from(interval) - accumulated)),
        };

        let status = match remaining {
            None => Status::Unknown,
            Some(r) if r.is_negative() => Status::Overdue,
            Some(r) if r.is_within(threshold.value) => Status::Upcoming,
            Some(_) => Status::Ok,
        };

        Assessment {
            status,
            remaining,
            threshold,
        }
    }

    /// Registers a maintenance performed `today`, resetting this [`Schedule`].
    pub fn register<Of: ?Sized>(&mut self, today: DateOf<Of>) {
        match self {
            Self::ByDays {
                last_performed_on, ..
            } => *last_performed_on = Some(today.coerce()),
            Self::ByHours { accumulated, .. } => *accumulated = Decimal::ZERO,
        }
    }

    /// Accumulates the provided usage `hours`.
    ///
    /// Returns `false` if this [`Schedule`] doesn't track usage hours, or the
    /// `hours` are not positive.
    ///
    /// # Errors
    ///
    /// With [`HoursOverflow`] if the accumulated hours cannot be represented,
    /// leaving this [`Schedule`] untouched.
    pub fn accumulate(
        &mut self,
        hours: Decimal,
    ) -> Result<bool, HoursOverflow> {
        match self {
            Self::ByHours { accumulated, .. } if hours > Decimal::ZERO => {
                *accumulated =
                    accumulated.checked_add(hours).ok_or(HoursOverflow)?;
                Ok(true)
            }
            Self::ByDays { .. } | Self::ByHours { .. } => Ok(false),
        }
    }

    /// Indicates whether the `other` [`Schedule`] differs from this one in a
    /// way invalidating the previous maintenance alerts.
    #[must_use]
    pub fn is_rescheduled_by(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::ByDays {
                    interval: a,
                    last_performed_on: la,
                    ..
                },
                Self::ByDays {
                    interval: b,
                    last_performed_on: lb,
                    ..
                },
            ) => a != b || la != lb,
            (
                Self::ByHours {
                    interval: a,
                    accumulated: aa,
                    ..
                },
                Self::ByHours {
                    interval: b,
                    accumulated: ab,
                    ..
                },
            ) => a != b || aa != ab,
            (Self::ByDays { .. }, Self::ByHours { .. })
            | (Self::ByHours { .. }, Self::ByDays { .. }) => true,
        }
    }
}

/// Error of accumulating usage hours beyond the representable range.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("accumulated usage hours overflow")]
pub struct HoursOverflow;

define_kind! {
    #[doc = "Kind of a maintenance [`Schedule`]."]
    enum Kind {
        #[doc = "[`Schedule::ByDays`]."]
        Days = 1,

        #[doc = "[`Schedule::ByHours`]."]
        Hours = 2,
    }
}

define_kind! {
    #[doc = "Maintenance status of a [`Material`]."]
    enum Status {
        #[doc = "Schedule cannot be evaluated yet (no maintenance registered)."]
        Unknown = 1,

        #[doc = "Next maintenance is far enough."]
        Ok = 2,

        #[doc = "Next maintenance is within the alert [`Threshold`]."]
        Upcoming = 3,

        #[doc = "Next maintenance deadline has passed."]
        Overdue = 4,
    }
}

impl Status {
    /// Indicates whether this [`Status`] requires an alert.
    #[must_use]
    pub const fn is_alerting(self) -> bool {
        matches!(self, Self::Upcoming | Self::Overdue)
    }
}

/// Origin of a [`Threshold`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThresholdOrigin {
    /// Configured manually on the [`Material`].
    Manual,

    /// Derived from the [`Schedule`] interval.
    Automatic,
}

/// Alert threshold of a [`Schedule`], in days or hours depending on its
/// [`Kind`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Threshold {
    /// Number of days or hours before the deadline to alert at.
    pub value: u32,

    /// [`ThresholdOrigin`] of this [`Threshold`].
    pub origin: ThresholdOrigin,
}

/// Amount remaining until the next maintenance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Remaining {
    /// Whole days until the deadline (negative when overdue).
    Days(i64),

    /// Usage hours until the deadline (negative when overdue).
    Hours(Decimal),
}

impl Remaining {
    /// Indicates whether the deadline has passed.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Days(d) => *d < 0,
            Self::Hours(h) => *h < Decimal::ZERO,
        }
    }

    /// Indicates whether this [`Remaining`] amount is within the provided
    /// `threshold`.
    #[must_use]
    pub fn is_within(&self, threshold: u32) -> bool {
        match self {
            Self::Days(d) => *d <= i64::from(threshold),
            Self::Hours(h) => *h <= Decimal::from(threshold),
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(d) => write!(f, "{d} days"),
            Self::Hours(h) => write!(f, "{}h", h.round_dp(1)),
        }
    }
}

/// Result of [`Schedule::assess()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Assessment {
    /// [`Status`] of the [`Schedule`].
    pub status: Status,

    /// [`Remaining`] amount until the next maintenance.
    ///
    /// [`None`] for [`Status::Unknown`].
    pub remaining: Option<Remaining>,

    /// Effective alert [`Threshold`].
    pub threshold: Threshold,
}

impl Assessment {
    /// Computes the [`Fingerprint`] of this [`Assessment`] for the
    /// [`Material`] with the provided ID.
    #[must_use]
    pub fn fingerprint(&self, material_id: material::Id) -> Fingerprint {
        // WARNING: Avoid changing the order of the fields in the hasher,
        //          because it would re-trigger every stored alert.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        material_id.hash(&mut hasher);
        self.status.u8().hash(&mut hasher);
        self.remaining.hash(&mut hasher);

        Fingerprint(i64::from_ne_bytes(hasher.digest().to_ne_bytes()))
    }
}

/// Fingerprint of a [`Material`] maintenance state, used to alert only once
/// per state change.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Fingerprint(i64);

/// [`Date`] when a maintenance was performed.
pub type PerformedDate = DateOf<(Schedule, unit::Maintenance)>;

#[cfg(test)]
mod spec {
    use common::Date;
    use rust_decimal::Decimal;

    use crate::domain::material;

    use super::{HoursOverflow, Remaining, Schedule, Status, ThresholdOrigin};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn derives_automatic_day_thresholds() {
        for (interval, expected) in
            [(730, 30), (365, 30), (364, 7), (30, 7), (29, 8), (10, 3), (1, 1)]
        {
            let t =
                Schedule::by_days(interval, None, None).unwrap().threshold();
            assert_eq!(t.value, expected, "interval: {interval}");
            assert_eq!(t.origin, ThresholdOrigin::Automatic);
        }
    }

    #[test]
    fn derives_automatic_hour_thresholds() {
        for (interval, expected) in [(100, 25), (10, 3), (1, 1), (500, 125)] {
            let t = Schedule::by_hours(interval, Decimal::ZERO, None)
                .unwrap()
                .threshold();
            assert_eq!(t.value, expected, "interval: {interval}");
        }
    }

    #[test]
    fn prefers_positive_manual_threshold() {
        let t = Schedule::by_days(365, None, Some(45)).unwrap().threshold();
        assert_eq!(t.value, 45);
        assert_eq!(t.origin, ThresholdOrigin::Manual);

        let t = Schedule::by_days(365, None, Some(0)).unwrap().threshold();
        assert_eq!(t.value, 30);
        assert_eq!(t.origin, ThresholdOrigin::Automatic);
    }

    #[test]
    fn rejects_empty_intervals() {
        assert!(Schedule::by_days(0, None, None).is_none());
        assert!(Schedule::by_hours(0, Decimal::ZERO, None).is_none());
        assert!(Schedule::by_hours(10, dec("-1"), None).is_none());
    }

    #[test]
    fn assesses_day_schedules() {
        let today = date("2024-06-15");
        let schedule = |last: &str| {
            Schedule::by_days(30, Some(date(last).coerce()), None).unwrap()
        };

        let a = schedule("2024-06-01").assess(today);
        assert_eq!(a.status, Status::Ok);
        assert_eq!(a.remaining, Some(Remaining::Days(16)));

        let a = schedule("2024-05-23").assess(today);
        assert_eq!(a.status, Status::Upcoming);
        assert_eq!(a.remaining, Some(Remaining::Days(7)));

        let a = schedule("2024-05-16").assess(today);
        assert_eq!(a.status, Status::Upcoming);
        assert_eq!(a.remaining, Some(Remaining::Days(0)));

        let a = schedule("2024-05-01").assess(today);
        assert_eq!(a.status, Status::Overdue);
        assert_eq!(a.remaining, Some(Remaining::Days(-15)));

        let a = Schedule::by_days(30, None, None).unwrap().assess(today);
        assert_eq!(a.status, Status::Unknown);
        assert_eq!(a.remaining, None);
    }

    #[test]
    fn assesses_hour_schedules() {
        let today = date("2024-06-15");
        let assess = |acc: &str| {
            Schedule::by_hours(100, dec(acc), Some(10))
                .unwrap()
                .assess(today)
        };

        assert_eq!(assess("50").status, Status::Ok);
        assert_eq!(assess("90").status, Status::Upcoming);
        assert_eq!(assess("100").status, Status::Upcoming);
        assert_eq!(assess("100.5").status, Status::Overdue);
        assert_eq!(
            assess("12.5").remaining,
            Some(Remaining::Hours(dec("87.5"))),
        );
    }

    #[test]
    fn registers_maintenance() {
        let today = date("2024-06-15");

        let mut s = Schedule::by_hours(100, dec("120"), None).unwrap();
        s.register(today);
        assert_eq!(
            s.assess(today).remaining,
            Some(Remaining::Hours(dec("100"))),
        );

        let mut s = Schedule::by_days(30, None, None).unwrap();
        s.register(today);
        assert_eq!(s.assess(today).remaining, Some(Remaining::Days(30)));
    }

    #[test]
    fn accumulates_only_positive_usage_hours() {
        let mut s = Schedule::by_hours(100, dec("10"), None).unwrap();
        assert_eq!(s.accumulate(dec("2.5")), Ok(true));
        assert_eq!(s.accumulate(Decimal::ZERO), Ok(false));
        assert_eq!(s.accumulate(dec("-1")), Ok(false));
        assert_eq!(
            s,
            Schedule::by_hours(100, dec("12.5"), None).unwrap(),
        );

        let mut s = Schedule::by_days(30, None, None).unwrap();
        assert_eq!(s.accumulate(dec("5")), Ok(false));
    }

    #[test]
    fn keeps_hours_on_overflow() {
        let mut s = Schedule::by_hours(100, Decimal::MAX, None).unwrap();

        assert_eq!(s.accumulate(dec("1")), Err(HoursOverflow));
        assert_eq!(
            s,
            Schedule::by_hours(100, Decimal::MAX, None).unwrap(),
        );
    }

    #[test]
    fn detects_rescheduling() {
        let days = |interval, alert| {
            Schedule::by_days(interval, None, Some(alert)).unwrap()
        };

        let a = days(30, 3);
        assert!(!a.is_rescheduled_by(&days(30, 5)));
        assert!(a.is_rescheduled_by(&days(31, 3)));
        assert!(a.is_rescheduled_by(
            &Schedule::by_hours(30, Decimal::ZERO, None).unwrap(),
        ));
    }

    #[test]
    fn fingerprints_change_with_state() {
        let id = material::Id::new();
        let today = date("2024-06-15");
        let schedule = |last: &str| {
            Schedule::by_days(30, Some(date(last).coerce()), None).unwrap()
        };

        let a = schedule("2024-05-23").assess(today).fingerprint(id);
        let b = schedule("2024-05-23").assess(today).fingerprint(id);
        let c = schedule("2024-05-22").assess(today).fingerprint(id);
        let d = schedule("2024-05-23")
            .assess(today)
            .fingerprint(material::Id::new());

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
