//! [`Command`] for moving a [`Quote`] along its lifecycle.

use std::collections::HashMap;

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;
use tracing as log;
use uuid::Uuid;

use crate::{
    domain::{
        material,
        quote::{self, item},
        Material, Notification, Quote,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Quote`] into another [`quote::Status`].
///
/// Sending is done by the [`SendQuote`] [`Command`] only.
///
/// Finalizing a [`Quote`] accumulates the usage hours of its material
/// [`quote::Item`]s into the hours-based maintenance of the used
/// [`Material`]s.
///
/// [`SendQuote`]: super::SendQuote
#[derive(Clone, Copy, Debug)]
pub struct ChangeQuoteStatus {
    /// ID of the [`Quote`] to change the [`quote::Status`] of.
    pub quote_id: quote::Id,

    /// New [`quote::Status`] of the [`Quote`].
    pub status: quote::Status,
}

impl<Db, M> Command<ChangeQuoteStatus> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Quote>, quote::Id>>,
            Ok = Option<Quote>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<quote::Item>, quote::Id>>,
            Ok = Vec<quote::Item>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Quote, quote::Id>>, Err = Traced<database::Error>>
        + Database<
            Lock<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Quote>, Err = Traced<database::Error>>
        + Database<Update<Material>, Err = Traced<database::Error>>
        + Database<Insert<Notification>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ChangeQuoteStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeQuoteStatus { quote_id, status } = cmd;

        if status == quote::Status::Sent {
            return Err(tracerr::new!(E::SendingRequired));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut quote = tx
            .execute(Select(By::<Option<Quote>, _>::new(quote_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::QuoteNotExists(quote_id))
            .map_err(tracerr::wrap!())?;
        let from = quote.status;
        if !quote.transit(status) {
            return Err(tracerr::new!(E::WrongTransition { from, to: status }));
        }

        tx.execute(Update(quote.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        match status {
            quote::Status::Finalized => {
                let items = tx
                    .execute(Select(By::<Vec<quote::Item>, _>::new(quote_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;

                let mut usage = HashMap::<material::Id, Decimal>::new();
                for item in &items {
                    if let item::Line::Material {
                        material_id: Some(id),
                        usage_hours,
                        ..
                    } = &item.line
                    {
                        if usage_hours.is_positive() {
                            let sum = usage.entry(*id).or_default();
                            *sum = sum
                                .checked_add(Decimal::from(*usage_hours))
                                .ok_or(E::UsageOverflow(*id))
                                .map_err(tracerr::wrap!())?;
                        }
                    }
                }

                // Consistent locking order avoids deadlocks.
                let mut usage = usage.into_iter().collect::<Vec<_>>();
                usage.sort_unstable_by_key(|(id, _)| Uuid::from(*id));
                for (id, hours) in usage {
                    tx.execute(Lock(By::new(id)))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                    let Some(mut material) = tx
                        .execute(Select(By::<Option<Material>, _>::new(id)))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))?
                    else {
                        continue;
                    };
                    let accumulated = match material.maintenance.as_mut() {
                        Some(s) => s.accumulate(hours).map_err(|_| {
                            tracerr::new!(E::UsageOverflow(id))
                        })?,
                        None => false,
                    };
                    if accumulated {
                        log::debug!(
                            "accumulated {hours}h of usage into `Material` {}",
                            material.code,
                        );
                        tx.execute(Update(material))
                            .await
                            .map_err(tracerr::map_from_and_wrap!(=> E))
                            .map(drop)?;
                    }
                }
            }
            quote::Status::ChangesRequested => {
                tx.execute(Insert(Notification::quote_changes_requested(
                    &quote,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            }
            quote::Status::Draft
            | quote::Status::Sent
            | quote::Status::Reviewed
            | quote::Status::Approved
            | quote::Status::Rejected
            | quote::Status::Expired => {}
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(quote)
    }
}

/// Error of [`ChangeQuoteStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Quote`] doesn't exist.
    #[display("`Quote(id: {_0})` does not exist")]
    QuoteNotExists(#[error(not(source))] quote::Id),

    /// Usage hours of a [`Material`] overflow.
    #[display("Usage hours of `Material(id: {_0})` overflow")]
    UsageOverflow(#[error(not(source))] material::Id),

    /// [`quote::Status::Sent`] is requested directly.
    #[display("`Quote` can become `SENT` only by being sent")]
    SendingRequired,

    /// [`quote::Status`] transition is not allowed.
    #[display("`Quote` cannot move from `{from}` to `{to}`")]
    WrongTransition {
        /// Current [`quote::Status`] of the [`Quote`].
        from: quote::Status,

        /// Requested [`quote::Status`].
        to: quote::Status,
    },
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            material::MaintenanceSchedule,
            quote::{self, Status},
            Material, Quote,
        },
        fixture,
        infra::database::memory::Memory,
        Command as _,
    };

    use super::{ChangeQuoteStatus, ExecutionError};

    /// Seeds an [`Status::Approved`] [`Quote`] using the provided
    /// [`Material`]s for the provided usage hours.
    fn seed(db: &Memory, usage: &[(&Material, &str)]) -> Quote {
        let quote = fixture::quote(Status::Approved);

        let mut state = db.state();
        for (material, hours) in usage {
            _ = state.materials.insert(material.id, (*material).clone());
            state
                .items
                .push(fixture::material_item(quote.id, material.id, hours));
        }
        _ = state.quotes.insert(quote.id, quote.clone());
        quote
    }

    fn maintenance(db: &Memory, material: &Material) -> MaintenanceSchedule {
        db.state().materials[&material.id].maintenance.unwrap()
    }

    #[tokio::test]
    async fn accumulates_usage_into_hours_schedules_only() {
        let db = Memory::default();
        let by_hours = fixture::material(MaintenanceSchedule::by_hours(
            100,
            Decimal::from(10),
            None,
        ));
        let by_days = fixture::material(MaintenanceSchedule::by_days(
            30, None, None,
        ));
        let unscheduled = fixture::material(None);
        let quote = seed(
            &db,
            &[
                (&by_hours, "4.5"),
                (&by_hours, "3"),
                (&by_days, "8"),
                (&unscheduled, "2"),
            ],
        );
        let service = fixture::service(db.clone(), ());

        let finalized = service
            .execute(ChangeQuoteStatus {
                quote_id: quote.id,
                status: Status::Finalized,
            })
            .await
            .unwrap();

        assert_eq!(finalized.status, Status::Finalized);
        assert!(finalized.finalized_at.is_some());
        assert_eq!(
            maintenance(&db, &by_hours),
            MaintenanceSchedule::by_hours(100, "17.5".parse().unwrap(), None)
                .unwrap(),
        );
        assert_eq!(
            maintenance(&db, &by_days),
            by_days.maintenance.unwrap(),
        );
        assert!(db.state().materials[&unscheduled.id].maintenance.is_none());
    }

    #[tokio::test]
    async fn accumulates_nothing_on_other_transitions() {
        let db = Memory::default();
        let material = fixture::material(MaintenanceSchedule::by_hours(
            100,
            Decimal::ZERO,
            None,
        ));
        let quote = seed(&db, &[(&material, "5")]);
        let service = fixture::service(db.clone(), ());

        let changed = service
            .execute(ChangeQuoteStatus {
                quote_id: quote.id,
                status: Status::ChangesRequested,
            })
            .await
            .unwrap();

        assert_eq!(changed.status, Status::ChangesRequested);
        assert_eq!(maintenance(&db, &material), material.maintenance.unwrap());
        assert_eq!(db.state().notifications.len(), 1);
    }

    #[tokio::test]
    async fn refuses_wrong_transitions() {
        let db = Memory::default();
        let quote = fixture::quote(Status::Draft);
        _ = db.state().quotes.insert(quote.id, quote.clone());
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(ChangeQuoteStatus {
                quote_id: quote.id,
                status: Status::Finalized,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(
            matches!(
                err,
                ExecutionError::WrongTransition {
                    from: Status::Draft,
                    to: Status::Finalized,
                },
            ),
            "{err}",
        );
        assert_eq!(db.state().quotes[&quote.id].status, Status::Draft);

        let err = service
            .execute(ChangeQuoteStatus {
                quote_id: quote.id,
                status: quote::Status::Sent,
            })
            .await
            .unwrap_err()
            .into_inner();
        assert!(matches!(err, ExecutionError::SendingRequired), "{err}");
    }
}
