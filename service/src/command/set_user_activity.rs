//! [`Command`] for deactivating or reactivating a [`User`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::Session;
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deactivating or reactivating a [`User`].
///
/// Deactivated [`User`]s can neither open new [`Session`]s nor use the
/// existing ones. Nobody may change the activity of their own account.
#[derive(Clone, Copy, Debug)]
pub struct SetUserActivity {
    /// ID of the [`User`] to be (de)activated.
    pub user_id: user::Id,

    /// Indicator whether the [`User`] should be active.
    pub is_active: bool,

    /// ID of the [`User`] performing the change.
    pub initiator_id: user::Id,
}

impl<Db, M> Command<SetUserActivity> for Service<Db, M>
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
        > + Database<Lock<By<User, user::Id>>, Err = Traced<database::Error>>
        + Database<Update<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetUserActivity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetUserActivity {
            user_id,
            is_active,
            initiator_id,
        } = cmd;

        if user_id == initiator_id {
            return Err(tracerr::new!(E::OwnAccount));
        }

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
        if !initiator.role.can_manage(user.role) {
            return Err(tracerr::new!(E::NotAllowed));
        }
        if user.is_active == is_active {
            return Ok(user);
        }

        user.is_active = is_active;
        tx.execute(Update(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`User` {} {} by `User` {}",
            user.login,
            if is_active { "activated" } else { "deactivated" },
            initiator.login,
        );
        Ok(user)
    }
}

/// Error of [`SetUserActivity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Initiator is not allowed to manage the [`User`].
    #[display("Not allowed to manage the `User`")]
    NotAllowed,

    /// Initiator tries to change the activity of their own account.
    #[display("Cannot change the activity of the own account")]
    OwnAccount,

    /// [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{user::Role, User},
        fixture,
        infra::database::memory::Memory,
        Command as _,
    };

    use super::{ExecutionError, SetUserActivity};

    fn seed(db: &Memory, role: Role) -> User {
        let user = fixture::user(role);
        _ = db.state().users.insert(user.id, user.clone());
        user
    }

    #[tokio::test]
    async fn deactivates_and_reactivates_subordinates() {
        let db = Memory::default();
        let manager = seed(&db, Role::Manager);
        let employee = seed(&db, Role::Employee);
        let service = fixture::service(db.clone(), ());

        let user = service
            .execute(SetUserActivity {
                user_id: employee.id,
                is_active: false,
                initiator_id: manager.id,
            })
            .await
            .unwrap();
        assert!(!user.can_sign_in());
        assert!(!db.state().users[&employee.id].is_active);

        _ = service
            .execute(SetUserActivity {
                user_id: employee.id,
                is_active: true,
                initiator_id: manager.id,
            })
            .await
            .unwrap();
        assert!(db.state().users[&employee.id].can_sign_in());
    }

    #[tokio::test]
    async fn refuses_own_account() {
        let db = Memory::default();
        let admin = seed(&db, Role::Admin);
        let service = fixture::service(db.clone(), ());

        let err = service
            .execute(SetUserActivity {
                user_id: admin.id,
                is_active: false,
                initiator_id: admin.id,
            })
            .await
            .unwrap_err()
            .into_inner();

        assert!(matches!(err, ExecutionError::OwnAccount), "{err}");
        assert!(db.state().users[&admin.id].is_active);
    }

    #[tokio::test]
    async fn refuses_peers_and_superiors() {
        let db = Memory::default();
        let manager = seed(&db, Role::Manager);
        let peer = seed(&db, Role::Manager);
        let director = seed(&db, Role::Director);
        let service = fixture::service(db.clone(), ());

        for target in [&peer, &director] {
            let err = service
                .execute(SetUserActivity {
                    user_id: target.id,
                    is_active: false,
                    initiator_id: manager.id,
                })
                .await
                .unwrap_err()
                .into_inner();

            assert!(matches!(err, ExecutionError::NotAllowed), "{err}");
            assert!(db.state().users[&target.id].is_active);
        }
    }
}
