//! [`Command`] for updating a [`Material`].

use common::{
    operations::{
        By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
    },
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{material, Material, Notification},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for updating a [`Material`].
///
/// [`None`] fields are left untouched, while `Some(None)` ones are cleared.
///
/// Rescheduling the maintenance of a [`Material`] withdraws its unread
/// maintenance [`Notification`]s.
#[derive(Clone, Debug)]
pub struct UpdateMaterial {
    /// ID of the [`Material`] to be updated.
    pub material_id: material::Id,

    /// New [`material::Code`] of the [`Material`].
    pub code: Option<material::Code>,

    /// New [`material::Name`] of the [`Material`].
    pub name: Option<material::Name>,

    /// New [`material::Description`] of the [`Material`].
    pub description: Option<Option<material::Description>>,

    /// New price of a single unit of the [`Material`].
    pub unit_price: Option<Money>,

    /// New [`material::Unit`] of the [`Material`].
    pub unit: Option<material::Unit>,

    /// New [`material::Category`] of the [`Material`].
    pub category: Option<Option<material::Category>>,

    /// New activity flag of the [`Material`].
    pub is_active: Option<bool>,

    /// New [`material::MaintenanceSchedule`] of the [`Material`].
    pub maintenance: Option<Option<material::MaintenanceSchedule>>,
}

impl<Db, M> Command<UpdateMaterial> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + for<'c> Database<
            Select<By<Option<Material>, &'c material::Code>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Material, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Material>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Notification, read::notification::UnreadAbout>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<read::material::AlertedState, material::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Material;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateMaterial {
            material_id,
            code,
            name,
            description,
            unit_price,
            unit,
            category,
            is_active,
            maintenance,
        } = cmd;

        if let Some(price) = unit_price.filter(Money::is_negative) {
            return Err(tracerr::new!(E::NegativePrice(price)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Material`.
        tx.execute(Lock(By::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut material = tx
            .execute(Select(By::<Option<Material>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MaterialNotExists(material_id))
            .map_err(tracerr::wrap!())?;

        if let Some(code) = code.filter(|c| *c != material.code) {
            let occupied = tx
                .execute(Select(By::<Option<Material>, _>::new(&code)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if occupied.is_some() {
                return Err(tracerr::new!(E::CodeOccupied(code)));
            }
            material.code = code;
        }
        if let Some(name) = name {
            material.name = name;
        }
        if let Some(description) = description {
            material.description = description;
        }
        if let Some(price) = unit_price {
            material.unit_price = price;
        }
        if let Some(unit) = unit {
            material.unit = unit;
        }
        if let Some(category) = category {
            material.category = category;
        }
        if let Some(is_active) = is_active {
            material.is_active = is_active;
        }

        let mut rescheduled = false;
        if let Some(schedule) = maintenance {
            rescheduled = match (&material.maintenance, &schedule) {
                (Some(old), Some(new)) => old.is_rescheduled_by(new),
                (None, None) => false,
                (Some(_), None) | (None, Some(_)) => true,
            };
            material.maintenance = schedule;
        }

        tx.execute(Update(material.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        if rescheduled {
            tx.execute(Delete(By::new(read::notification::UnreadAbout(
                material_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
            tx.execute(Delete(By::<read::material::AlertedState, _>::new(
                material_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(material)
    }
}

/// Error of [`UpdateMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`material::Code`] is already used by another [`Material`].
    #[display("`{_0}` code is occupied")]
    CodeOccupied(#[error(not(source))] material::Code),

    /// [`Material`] doesn't exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// Unit price is negative.
    #[display("Unit price cannot be negative: {_0}")]
    NegativePrice(#[error(not(source))] Money),
}
