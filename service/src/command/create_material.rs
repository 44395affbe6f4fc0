//! [`Command`] for creating a new [`Material`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{material, Material},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Material`].
#[derive(Clone, Debug)]
pub struct CreateMaterial {
    /// Unique [`material::Code`] of a new [`Material`].
    pub code: material::Code,

    /// [`material::Name`] of a new [`Material`].
    pub name: material::Name,

    /// [`material::Description`] of a new [`Material`].
    pub description: Option<material::Description>,

    /// Price of a single unit of a new [`Material`].
    pub unit_price: Money,

    /// [`material::Unit`] a new [`Material`] is measured in.
    pub unit: Option<material::Unit>,

    /// [`material::Category`] of a new [`Material`].
    pub category: Option<material::Category>,

    /// [`material::MaintenanceSchedule`] of a new [`Material`].
    pub maintenance: Option<material::MaintenanceSchedule>,
}

impl<Db, M> Command<CreateMaterial> for Service<Db, M>
where
    Db: for<'c> Database<
            Select<By<Option<Material>, &'c material::Code>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Material>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Material;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMaterial {
            code,
            name,
            description,
            unit_price,
            unit,
            category,
            maintenance,
        } = cmd;

        if unit_price.is_negative() {
            return Err(tracerr::new!(E::NegativePrice(unit_price)));
        }

        let existing = self
            .database()
            .execute(Select(By::new(&code)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::CodeOccupied(code)));
        }

        let material = Material {
            id: material::Id::new(),
            code,
            name,
            description,
            unit_price,
            unit: unit.unwrap_or_default(),
            category,
            is_active: true,
            maintenance,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(material.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(material)
    }
}

/// Error of [`CreateMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`material::Code`] is already used by another [`Material`].
    #[display("`{_0}` code is occupied")]
    CodeOccupied(#[error(not(source))] material::Code),

    /// Unit price is negative.
    #[display("Unit price cannot be negative: {_0}")]
    NegativePrice(#[error(not(source))] Money),
}
