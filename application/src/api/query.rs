//! GraphQL [`Query`]s definitions.

use itertools::Itertools as _;
use juniper::graphql_object;
use service::{domain::user::Role, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor and tries
    ///                      to access another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let session = ctx.current_session().await?;
        if session.user_id != id && !session.role.is_at_least(Role::Supervisor)
        {
            return Err(api::PrivilegeError::Supervisor.into())
                .map_err(ctx.error());
        }

        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `User`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "users",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn users(
        first: Option<i32>,
        after: Option<api::user::list::Cursor>,
        last: Option<i32>,
        before: Option<api::user::list::Cursor>,
        name: Option<api::user::Name>,
        role: Option<api::user::Role>,
        ctx: &Context,
    ) -> Result<api::user::list::Connection, Error> {
        _ = ctx.require_role(Role::Supervisor).await?;

        let arguments = read::user::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            api::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let page = ctx
            .service()
            .execute(query::users::List::by(read::user::list::Selector {
                arguments,
                filter: read::user::list::Filter {
                    name: name.map(Into::into),
                    role: role.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, ()).into())
    }

    /// Returns the `Client` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "client",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<api::client::list::Edge, Error> {
        Self::clients(None, Some(id.into()), None, Some(id.into()), None, ctx)
            .await?
            .edges()
            .into_iter()
            .exactly_one()
            .map_err(|_| ClientError::NotExists.into())
            .map_err(ctx.error())
    }

    /// Fetches the page of `Client`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "clients",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn clients(
        first: Option<i32>,
        after: Option<api::client::list::Cursor>,
        last: Option<i32>,
        before: Option<api::client::list::Cursor>,
        name: Option<api::client::Name>,
        ctx: &Context,
    ) -> Result<api::client::list::Connection, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        let page = ctx
            .service()
            .execute(query::clients::List::by(read::client::list::Selector {
                arguments: read::client::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    api::DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::client::list::Filter {
                    name: name.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, ()).into())
    }

    /// Returns the `Material` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "material",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn material(
        id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::material::list::Edge, Error> {
        Self::materials(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| MaterialError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Returns the `Material` with the specified `MaterialCode`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified
    ///                           `MaterialCode` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "materialByCode",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn material_by_code(
        code: api::material::Code,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::material::ByCode::by(code.as_ref()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| MaterialError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Material`s.
    ///
    /// `search` matches both the name and the code of a `Material`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            category = ?category.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "materials",
            is_active = ?is_active,
            last = ?last,
            otel.name = Self::SPAN_NAME,
            search = ?search.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn materials(
        first: Option<i32>,
        after: Option<api::material::list::Cursor>,
        last: Option<i32>,
        before: Option<api::material::list::Cursor>,
        search: Option<api::material::Name>,
        category: Option<api::material::Category>,
        is_active: Option<bool>,
        ctx: &Context,
    ) -> Result<api::material::list::Connection, Error> {
        _ = ctx.current_session().await?;

        let page = ctx
            .service()
            .execute(query::materials::List::by(
                read::material::list::Selector {
                    arguments: read::material::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        api::DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter: read::material::list::Filter {
                        search: search.map(Into::into),
                        category: category.map(Into::into),
                        is_active,
                    },
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, ()).into())
    }

    /// Returns the `Quote` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "quote",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn quote(
        id: api::quote::Id,
        ctx: &Context,
    ) -> Result<api::quote::list::Edge, Error> {
        Self::quotes(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| QuoteError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Returns the `Quote` with the specified `QuoteNumber`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified `QuoteNumber`
    ///                        does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "quoteByNumber",
            number = %number,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn quote_by_number(
        number: api::quote::Number,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(query::quote::ByNumber::by(number.as_ref()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| QuoteError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Quote` behind the public response link with the specified
    /// `QuoteToken`.
    ///
    /// Doesn't require authentication.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - no `Quote` is shared with the specified
    ///                        `QuoteToken`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "quoteByToken",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn quote_by_token(
        token: api::quote::Token,
        ctx: &Context,
    ) -> Result<api::quote::PublicQuote, Error> {
        let quote = ctx
            .service()
            .execute(query::quote::ByToken::by(token.as_ref()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| QuoteError::NotExists.into())
            .map_err(ctx.error())?;
        let items = ctx
            .service()
            .execute(query::quote::Items::by(quote.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((quote, items).into())
    }

    /// Returns the `QuoteItem` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_ITEM_NOT_EXISTS` - the `QuoteItem` with the specified ID does
    ///                             not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "quoteItem",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn quote_item(
        id: api::quote::ItemId,
        ctx: &Context,
    ) -> Result<api::quote::Item, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(query::quote::ItemById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| QuoteError::ItemNotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Quote`s, the most recent first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            client_id = ?client_id,
            first = ?first,
            gql.name = "quotes",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn quotes(
        first: Option<i32>,
        after: Option<api::quote::list::Cursor>,
        last: Option<i32>,
        before: Option<api::quote::list::Cursor>,
        status: Option<api::quote::Status>,
        client_id: Option<api::client::Id>,
        ctx: &Context,
    ) -> Result<api::quote::list::Connection, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        let filter = read::quote::list::Filter {
            status: status.map(Into::into),
            client_id: client_id.map(Into::into),
        };
        let page = ctx
            .service()
            .execute(query::quotes::List::by(read::quote::list::Selector {
                arguments: read::quote::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    api::DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, filter).into())
    }

    /// Returns the `Job` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the specified ID does not exist,
    ///                      or is assigned to another `User` while the
    ///                      current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "job",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn job(
        id: api::job::Id,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        let session = ctx.current_session().await?;
        let is_supervisor = session.role.is_at_least(Role::Supervisor);

        ctx.service()
            .execute(query::job::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|j| {
                is_supervisor
                    || api::user::Id::from(j.employee_id) == session.user_id
            })
            .ok_or_else(|| JobError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Job`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            employee_id = ?employee_id,
            first = ?first,
            gql.name = "jobs",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn jobs(
        first: Option<i32>,
        after: Option<api::job::list::Cursor>,
        last: Option<i32>,
        before: Option<api::job::list::Cursor>,
        employee_id: Option<api::user::Id>,
        status: Option<api::job::Status>,
        ctx: &Context,
    ) -> Result<api::job::list::Connection, Error> {
        _ = ctx.require_role(Role::Supervisor).await?;

        Self::list_jobs(
            (first, after, last, before),
            read::job::list::Filter {
                employee_id: employee_id.map(Into::into),
                status: status.map(Into::into),
            },
            ctx,
        )
        .await
    }

    /// Fetches the page of `Job`s assigned to the current `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "myJobs",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn my_jobs(
        first: Option<i32>,
        after: Option<api::job::list::Cursor>,
        last: Option<i32>,
        before: Option<api::job::list::Cursor>,
        status: Option<api::job::Status>,
        ctx: &Context,
    ) -> Result<api::job::list::Connection, Error> {
        let my_id = ctx.current_session().await?.user_id;

        Self::list_jobs(
            (first, after, last, before),
            read::job::list::Filter {
                employee_id: Some(my_id.into()),
                status: status.map(Into::into),
            },
            ctx,
        )
        .await
    }

    /// Returns the active `Loan` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOAN_NOT_EXISTS` - the `Loan` with the specified ID does not exist
    ///                       or has been returned already.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "loan",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn loan(
        id: api::loan::Id,
        ctx: &Context,
    ) -> Result<api::loan::list::Edge, Error> {
        Self::loans(None, Some(id.into()), None, Some(id.into()), None, ctx)
            .await?
            .edges()
            .into_iter()
            .exactly_one()
            .map_err(|_| LoanError::NotExists.into())
            .map_err(ctx.error())
    }

    /// Returns the active `Loan` of the `Material` with the specified ID, if
    /// it's lent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "loanByMaterial",
            material_id = %material_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn loan_by_material(
        material_id: api::material::Id,
        ctx: &Context,
    ) -> Result<Option<api::Loan>, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::loan::ByMaterial::by(material_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|l| l.map(Into::into))
    }

    /// Fetches the page of active `Loan`s, the closest due date first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "loans",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            overdue_only = ?overdue_only,
        ),
    )]
    pub async fn loans(
        first: Option<i32>,
        after: Option<api::loan::list::Cursor>,
        last: Option<i32>,
        before: Option<api::loan::list::Cursor>,
        overdue_only: Option<bool>,
        ctx: &Context,
    ) -> Result<api::loan::list::Connection, Error> {
        _ = ctx.current_session().await?;

        let filter = read::loan::list::Filter {
            overdue_only: overdue_only.unwrap_or_default(),
        };
        let page = ctx
            .service()
            .execute(query::loans::List::by(read::loan::list::Selector {
                arguments: read::loan::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    api::DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, filter).into())
    }

    /// Fetches the page of the lending history, the most recently returned
    /// first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "loanHistory",
            last = ?last,
            material_id = ?material_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn loan_history(
        first: Option<i32>,
        after: Option<api::loan::history::Cursor>,
        last: Option<i32>,
        before: Option<api::loan::history::Cursor>,
        material_id: Option<api::material::Id>,
        ctx: &Context,
    ) -> Result<api::loan::history::Connection, Error> {
        _ = ctx.current_session().await?;

        let filter = read::loan::history::Filter {
            material_id: material_id.map(Into::into),
        };
        let page = ctx
            .service()
            .execute(query::loans::History::by(
                read::loan::history::Selector {
                    arguments: read::loan::history::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        api::DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, filter).into())
    }

    /// Fetches the page of `Notification`s of the current `User`, the most
    /// recent first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAGINATION_AMBIGUOUS` - the pagination arguments are ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "notifications",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            unread_only = ?unread_only,
        ),
    )]
    pub async fn notifications(
        first: Option<i32>,
        after: Option<api::notification::list::Cursor>,
        last: Option<i32>,
        before: Option<api::notification::list::Cursor>,
        unread_only: Option<bool>,
        ctx: &Context,
    ) -> Result<api::notification::list::Connection, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let filter = read::notification::list::Filter {
            user_id: my_id.into(),
            unread_only: unread_only.unwrap_or_default(),
        };
        let page = ctx
            .service()
            .execute(query::notifications::List::by(
                read::notification::list::Selector {
                    arguments: read::notification::list::Arguments::new(
                        first,
                        after.map(Into::into),
                        last,
                        before.map(Into::into),
                        api::DEFAULT_PAGE_SIZE,
                    )
                    .ok_or_else(|| api::PaginationError::Ambiguous.into())
                    .map_err(ctx.error())?,
                    filter,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, filter).into())
    }

    /// Counts unread `Notification`s of the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unreadNotificationsCount",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn unread_notifications_count(
        ctx: &Context,
    ) -> Result<i32, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(query::notifications::UnreadCount::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl Query {
    /// Fetches the page of `Job`s matching the provided
    /// [`read::job::list::Filter`].
    async fn list_jobs(
        (first, after, last, before): (
            Option<i32>,
            Option<api::job::list::Cursor>,
            Option<i32>,
            Option<api::job::list::Cursor>,
        ),
        filter: read::job::list::Filter,
        ctx: &Context,
    ) -> Result<api::job::list::Connection, Error> {
        let page = ctx
            .service()
            .execute(query::jobs::List::by(read::job::list::Selector {
                arguments: read::job::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    api::DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((page, filter).into())
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ClientError {
        #[code = "CLIENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Client` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RepresentativeError {
        #[code = "REPRESENTATIVE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Representative` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum MaterialError {
        #[code = "MATERIAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Material` does not exist"]
        NotExists,
    }
}

define_error! {
    enum QuoteError {
        #[code = "QUOTE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Quote` does not exist"]
        NotExists,

        #[code = "QUOTE_ITEM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`QuoteItem` with the specified ID does not exist"]
        ItemNotExists,
    }
}

define_error! {
    enum JobError {
        #[code = "JOB_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Job` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum LoanError {
        #[code = "LOAN_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Loan` with the specified ID does not exist"]
        NotExists,

        #[code = "LOAN_RECORD_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`LoanRecord` with the specified ID does not exist"]
        RecordNotExists,
    }
}

define_error! {
    enum NotificationError {
        #[code = "NOTIFICATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Notification` with the specified ID does not exist"]
        NotExists,
    }
}
