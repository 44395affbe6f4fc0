//! In-memory [`Database`] for exercising [`Command`]s and [`Task`]s.
//!
//! Transactions are not isolated: every write is applied immediately, and
//! [`Commit`] does nothing.
//!
//! [`Command`]: crate::Command
//! [`Task`]: crate::Task

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{
        client, material, quote, user, Client, Loan, Material, Notification,
        Quote, User,
    },
    read,
};

use super::{Database, Error};

/// Contents of a [`Memory`] database.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) users: HashMap<user::Id, User>,
    pub(crate) clients: HashMap<client::Id, Client>,
    pub(crate) quotes: HashMap<quote::Id, Quote>,
    pub(crate) items: Vec<quote::Item>,
    pub(crate) materials: HashMap<material::Id, Material>,
    pub(crate) alerted: HashMap<material::Id, read::material::AlertedState>,
    pub(crate) loans: Vec<Loan>,
    pub(crate) notifications: Vec<Notification>,
}

/// [`Database`] keeping its [`State`] in memory, shared between clones.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Arc<Mutex<State>>);

impl Memory {
    /// Locks the [`State`] of this [`Memory`] for inspection or seeding.
    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

/// Implements a no-op [`Lock`] for the provided entities.
macro_rules! impl_lock {
    ($($entity:ty => $id:ty),* $(,)?) => {$(
        impl Database<Lock<By<$entity, $id>>> for Memory {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                _: Lock<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                Ok(())
            }
        }
    )*};
}

impl_lock! {
    Client => client::Id,
    Material => material::Id,
    Quote => quote::Id,
    User => user::Id,
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().users.get(&by.into_inner()).cloned())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Login>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Login>>,
    ) -> Result<Self::Ok, Self::Err> {
        let login = by.into_inner();
        Ok(self
            .state()
            .users
            .values()
            .find(|u| u.deleted_at.is_none() && u.login == *login)
            .cloned())
    }
}

impl Database<Select<By<Vec<user::Id>, user::Role>>> for Memory {
    type Ok = Vec<user::Id>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<user::Id>, user::Role>>,
    ) -> Result<Self::Ok, Self::Err> {
        let role = by.into_inner();
        Ok(self
            .state()
            .users
            .values()
            .filter(|u| u.role == role && u.can_sign_in())
            .map(|u| u.id)
            .collect())
    }
}

impl Database<Update<User>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().users.insert(user.id, user);
        Ok(())
    }
}

impl Database<Select<By<Option<Client>, client::Id>>> for Memory {
    type Ok = Option<Client>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().clients.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Option<Quote>, quote::Id>>> for Memory {
    type Ok = Option<Quote>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quote>, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().quotes.get(&by.into_inner()).cloned())
    }
}

impl<'t> Database<Select<By<Option<Quote>, &'t quote::Token>>> for Memory {
    type Ok = Option<Quote>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Quote>, &'t quote::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        Ok(self
            .state()
            .quotes
            .values()
            .find(|q| q.token.as_ref() == Some(token))
            .cloned())
    }
}

impl Database<Select<By<Vec<Quote>, read::quote::Overdue>>> for Memory {
    type Ok = Vec<Quote>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quote>, read::quote::Overdue>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::Overdue { today } = by.into_inner();
        Ok(self
            .state()
            .quotes
            .values()
            .filter(|q| {
                q.status.accepts_response()
                    && q.due_on.is_some_and(|d| d < today)
            })
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<Quote>, read::quote::AwaitingFeedback>>>
    for Memory
{
    type Ok = Vec<Quote>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Quote>, read::quote::AwaitingFeedback>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::quote::AwaitingFeedback { finalized_before } =
            by.into_inner();
        Ok(self
            .state()
            .quotes
            .values()
            .filter(|q| {
                q.status == quote::Status::Finalized
                    && !q.feedback_requested
                    && q.sent_to.is_some()
                    && q.finalized_at.is_some_and(|at| at <= finalized_before)
            })
            .cloned()
            .collect())
    }
}

impl Database<Update<Quote>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(quote): Update<Quote>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().quotes.insert(quote.id, quote);
        Ok(())
    }
}

impl Database<Select<By<Vec<quote::Item>, quote::Id>>> for Memory {
    type Ok = Vec<quote::Item>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<quote::Item>, quote::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let quote_id = by.into_inner();
        let mut items = self
            .state()
            .items
            .iter()
            .filter(|i| i.quote_id == quote_id)
            .cloned()
            .collect::<Vec<_>>();
        items.sort_by_key(|i| i.position);
        Ok(items)
    }
}

impl Database<Select<By<Option<Material>, material::Id>>> for Memory {
    type Ok = Option<Material>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Material>, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().materials.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Material>, read::material::Maintained>>>
    for Memory
{
    type Ok = Vec<Material>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Material>, read::material::Maintained>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .state()
            .materials
            .values()
            .filter(|m| {
                m.deleted_at.is_none()
                    && m.is_active
                    && m.maintenance.is_some()
            })
            .cloned()
            .collect())
    }
}

impl Database<Update<Material>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(material): Update<Material>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().materials.insert(material.id, material);
        Ok(())
    }
}

impl Database<Select<By<Option<read::material::AlertedState>, material::Id>>>
    for Memory
{
    type Ok = Option<read::material::AlertedState>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::material::AlertedState>, material::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().alerted.get(&by.into_inner()).copied())
    }
}

impl Database<Update<read::material::AlertedState>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(state): Update<read::material::AlertedState>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().alerted.insert(state.material_id, state);
        Ok(())
    }
}

impl Database<Delete<By<read::material::AlertedState, material::Id>>>
    for Memory
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<read::material::AlertedState, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().alerted.remove(&by.into_inner());
        Ok(())
    }
}

impl Database<Select<By<Option<Loan>, material::Id>>> for Memory {
    type Ok = Option<Loan>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Loan>, material::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let material_id = by.into_inner();
        Ok(self
            .state()
            .loans
            .iter()
            .find(|l| l.material_id == material_id)
            .cloned())
    }
}

impl Database<Insert<Loan>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(loan): Insert<Loan>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().loans.push(loan);
        Ok(())
    }
}

impl Database<Insert<Notification>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(notification): Insert<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().notifications.push(notification);
        Ok(())
    }
}

impl Database<Delete<By<Notification, read::notification::UnreadAbout>>>
    for Memory
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Notification, read::notification::UnreadAbout>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::notification::UnreadAbout(material_id) = by.into_inner();
        self.state()
            .notifications
            .retain(|n| n.is_read || n.material_id != Some(material_id));
        Ok(())
    }
}
