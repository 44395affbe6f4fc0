//! [`Client`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A [`Client`] the [`api::Quote`]s are issued to.
#[derive(Clone, Debug)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// [`domain::Client`] representing this [`Client`].
    client: OnceCell<domain::Client>,
}

impl From<domain::Client> for Client {
    fn from(client: domain::Client) -> Self {
        Self {
            id: client.id.into(),
            client: OnceCell::new_with(Some(client)),
        }
    }
}

impl Client {
    /// Creates a new [`Client`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Client`] with the provided ID exists,
    /// otherwise accessing this [`Client`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            client: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Client`] representing this [`Client`].
    ///
    /// Deleted [`Client`]s are still returned, as their [`api::Quote`]s
    /// remain.
    async fn client(&self, ctx: &Context) -> Result<&domain::Client, Error> {
        let id = self.id.into();
        self.client
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::client::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::ClientError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A `Client` the `Quote`s are issued to.
#[graphql_object(context = Context)]
impl Client {
    /// Unique identifier of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.client(ctx).await?.name.clone().into())
    }

    /// Chilean tax ID of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.rut",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rut(&self, ctx: &Context) -> Result<Option<Rut>, Error> {
        Ok(self.client(ctx).await?.rut.clone().map(Into::into))
    }

    /// Address of this `Client`.
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<Option<Address>, Error> {
        Ok(self.client(ctx).await?.address.clone().map(Into::into))
    }

    /// Phone of this `Client`.
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.client(ctx).await?.phone.clone().map(Into::into))
    }

    /// Email of this `Client`.
    ///
    /// `Quote`s are sent to this address unless another one is specified.
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.client(ctx).await?.email.clone().map(Into::into))
    }

    /// `DateTime` when this `Client` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.client(ctx).await?.created_at.coerce())
    }

    /// `Representative`s of this `Client`, in their display order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.representatives",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn representatives(
        &self,
        ctx: &Context,
    ) -> Result<Vec<Representative>, Error> {
        ctx.service()
            .execute(query::client::Representatives::by(self.id.into()))
            .await
            .map(|rs| rs.into_iter().map(Into::into).collect())
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Indicator whether this `Client` was deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.isDeleted",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_deleted(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.client(ctx).await?.deleted_at.is_some())
    }
}

/// Contact person of a [`Client`].
#[derive(Clone, Debug, From)]
pub struct Representative(domain::client::Representative);

/// Contact person of a `Client` a `Quote` may be addressed to.
#[graphql_object(context = Context)]
impl Representative {
    /// Unique identifier of this `Representative`.
    pub fn id(&self) -> RepresentativeId {
        self.0.id.into()
    }

    /// `Client` this `Representative` belongs to.
    pub fn client(&self) -> Client {
        #[expect(
            unsafe_code,
            reason = "`Representative` references existing `Client` only"
        )]
        unsafe {
            Client::new_unchecked(self.0.client_id)
        }
    }

    /// Full name of this `Representative`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Position of this `Representative` among the other ones of the same
    /// `Client`.
    ///
    /// Lower ones go first.
    pub fn position(&self) -> i32 {
        self.0.position.into()
    }

    /// `DateTime` when this `Representative` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Representative`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::client::representative::Id)]
#[into(domain::client::representative::Id)]
#[graphql(name = "RepresentativeId", transparent)]
pub struct RepresentativeId(Uuid);

/// Unique identifier of a `Client`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::client::Id)]
#[into(domain::client::Id)]
#[graphql(name = "ClientId", transparent)]
pub struct Id(Uuid);

/// Name of a `Client`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClientName",
    with = scalar::Via::<domain::client::Name>,
)]
pub struct Name(domain::client::Name);

/// Postal address of a `Client`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClientAddress",
    with = scalar::Via::<domain::client::Address>,
)]
pub struct Address(domain::client::Address);

/// Chilean tax ID (RUT) in the `12.345.678-5` format.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Rut", with = scalar::Via::<domain::Rut>)]
pub struct Rut(domain::Rut);

/// Email address.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Email", with = scalar::Via::<domain::contact::Email>)]
pub struct Email(domain::contact::Email);

/// Phone number.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Phone", with = scalar::Via::<domain::contact::Phone>)]
pub struct Phone(domain::contact::Phone);

pub mod list {
    //! Definitions related to [`Client`] list.

    use service::{query, read};

    use super::{Client, Id};

    define_list! {
        id = Id,
        node = Client,
        read = read::client::list,
        names = (
            "ClientListCursor",
            "ClientListEdge",
            "ClientListConnection",
            "ClientListPageInfo",
        ),
        total_count = query::clients::TotalCount,
        count_by = (),
    }
}
