//! [`Command`] for updating a [`User`]'s profile.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating profile fields of a [`User`].
///
/// [`User`]s may edit their own [`user::Name`], [`user::Email`] and
/// [`user::Phone`]. Changing a [`user::Login`] or a [`user::Rut`], or editing
/// anyone else, requires a [`user::Role`] able to manage the edited [`User`].
///
/// [`None`] fields are left untouched, while `Some(None)` ones are cleared.
#[derive(Clone, Debug)]
pub struct UpdateUser {
    /// ID of the [`User`] to be updated.
    pub user_id: user::Id,

    /// New [`user::Name`] of the [`User`].
    pub name: Option<user::Name>,

    /// New [`user::Login`] of the [`User`].
    pub login: Option<user::Login>,

    /// New [`user::Email`] of the [`User`].
    pub email: Option<Option<user::Email>>,

    /// New [`user::Phone`] of the [`User`].
    pub phone: Option<Option<user::Phone>>,

    /// New [`user::Rut`] of the [`User`].
    pub rut: Option<Option<user::Rut>>,

    /// ID of the [`User`] performing the update.
    pub initiator_id: user::Id,
}

impl UpdateUser {
    /// Indicates whether this [`UpdateUser`] touches fields only a managing
    /// [`User`] may change.
    const fn is_administrative(&self) -> bool {
        self.login.is_some() || self.rut.is_some()
    }
}

impl<Db, M> Command<UpdateUser> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<User>, &'l user::Login>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<User, user::Id>>, Err = Traced<database::Error>>
        + Database<Update<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let is_administrative = cmd.is_administrative();
        let UpdateUser {
            user_id,
            name,
            login,
            email,
            phone,
            rut,
            initiator_id,
        } = cmd;

        let initiator = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `User`.
        tx.execute(Lock(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut user = tx
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;

        let is_self = initiator.id == user.id;
        let may_manage = initiator.role.can_manage(user.role);
        if !may_manage && (!is_self || is_administrative) {
            return Err(tracerr::new!(E::NotAllowed));
        }

        if let Some(login) = login.filter(|l| *l != user.login) {
            let occupant = tx
                .execute(Select(By::<Option<User>, _>::new(&login)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if occupant.is_some() {
                return Err(tracerr::new!(E::LoginOccupied(login)));
            }
            user.login = login;
        }
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(phone) = phone {
            user.phone = phone;
        }
        if let Some(rut) = rut {
            user.rut = rut;
        }

        tx.execute(Update(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`UpdateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Login`] is occupied by another [`User`].
    #[display("`UserLogin` `{_0}` is occupied")]
    #[from(ignore)]
    LoginOccupied(#[error(not(source))] user::Login),

    /// Initiator is not allowed to update the [`User`] this way.
    #[display("Not allowed to update the `User`")]
    NotAllowed,

    /// [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            user::{self, Role},
            User,
        },
        fixture,
        infra::database::memory::Memory,
        Command as _,
    };

    use super::{ExecutionError, UpdateUser};

    fn seed(db: &Memory, role: Role) -> User {
        let user = fixture::user(role);
        _ = db.state().users.insert(user.id, user.clone());
        user
    }

    fn update(user: &User, initiator: &User) -> UpdateUser {
        UpdateUser {
            user_id: user.id,
            name: None,
            login: None,
            email: None,
            phone: None,
            rut: None,
            initiator_id: initiator.id,
        }
    }

    #[tokio::test]
    async fn edits_own_profile() {
        let db = Memory::default();
        let employee = seed(&db, Role::Employee);
        let service = fixture::service(db.clone(), ());

        let user = service
            .execute(UpdateUser {
                name: Some(user::Name::new("Juana Alvarado Ruiz").unwrap()),
                ..update(&employee, &employee)
            })
            .await
            .unwrap();

        assert_eq!(user.name.to_string(), "Juana Alvarado Ruiz");
        assert_eq!(
            db.state().users[&employee.id].name.to_string(),
            "Juana Alvarado Ruiz",
        );
    }

    #[tokio::test]
    async fn refuses_own_login_change() {
        let db = Memory::default();
        let employee = seed(&db, Role::Employee);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(UpdateUser {
                login: Some(user::Login::new("jalvarado").unwrap()),
                ..update(&employee, &employee)
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::NotAllowed), "{err}");
        assert!(db.state().users[&employee.id].login == employee.login);
    }

    #[tokio::test]
    async fn refuses_editing_others_without_managing_them() {
        let db = Memory::default();
        let supervisor = seed(&db, Role::Supervisor);
        let manager = seed(&db, Role::Manager);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(UpdateUser {
                name: Some(user::Name::new("Otro Nombre").unwrap()),
                ..update(&manager, &supervisor)
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::NotAllowed), "{err}");
    }

    #[tokio::test]
    async fn rejects_occupied_login() {
        let db = Memory::default();
        let admin = seed(&db, Role::Admin);
        let employee = seed(&db, Role::Employee);
        let other = seed(&db, Role::Employee);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(UpdateUser {
                login: Some(other.login.clone()),
                ..update(&employee, &admin)
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::LoginOccupied(_)), "{err}");
        assert!(db.state().users[&employee.id].login == employee.login);
    }
}
