//! GraphQL API definitions.

/// Defines GraphQL types of a paginated list: `Cursor`, `Edge`, `Connection`
/// and `PageInfo`.
///
/// `count_by` is the key the `total_count` query is executed with, so the
/// `Connection` must be created from its page along with this key.
macro_rules! define_list {
    (
        id = $id:ty,
        node = $node:ty,
        read = $($read:ident)::+,
        names = ($cursor:literal, $edge:literal, $conn:literal, $info:literal $(,)?),
        total_count = $count:ty,
        count_by = $key:ty $(,)?
    ) => {
        /// Cursor for the list.
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Copy,
            Debug,
            ::derive_more::From,
            ::juniper::GraphQLScalar,
            ::derive_more::Into,
        )]
        #[from($id, $($read)::+::Cursor)]
        #[graphql(
            name = $cursor,
            with = $crate::api::scalar::Via::<$($read)::+::Cursor>,
        )]
        pub struct Cursor(pub $($read)::+::Cursor);

        /// Edge in the list.
        #[derive(Clone, Copy, Debug, ::derive_more::From, ::derive_more::Into)]
        pub struct Edge($($read)::+::Edge);

        /// Edge in the list.
        #[::juniper::graphql_object(name = $edge, context = $crate::Context)]
        impl Edge {
            /// Cursor of this edge.
            #[must_use]
            pub fn cursor(&self) -> Cursor {
                self.0.cursor.into()
            }

            /// Node of this edge.
            #[must_use]
            pub fn node(&self) -> $node {
                #[expect(
                    unsafe_code,
                    reason = "`Edge` loaded from repository guarantees node \
                              existence"
                )]
                unsafe {
                    <$node>::new_unchecked(self.0.node)
                }
            }
        }

        /// Connection of the list.
        #[derive(Clone, Debug)]
        pub struct Connection {
            /// Underlying page of the list.
            page: $($read)::+::Connection,

            /// Key to count the total number of nodes by.
            count_by: $key,
        }

        impl From<($($read)::+::Connection, $key)> for Connection {
            fn from((page, count_by): ($($read)::+::Connection, $key)) -> Self {
                Self { page, count_by }
            }
        }

        /// Connection of the list.
        #[::juniper::graphql_object(name = $conn, context = $crate::Context)]
        impl Connection {
            /// Edges in this connection.
            #[must_use]
            pub fn edges(&self) -> Vec<Edge> {
                self.page.edges.iter().copied().map(Into::into).collect()
            }

            /// Information about the page.
            #[must_use]
            pub fn page_info(&self) -> PageInfo {
                PageInfo {
                    info: self.page.page_info(),
                    start_cursor: self
                        .page
                        .edges
                        .first()
                        .map(|e| e.cursor.into()),
                    end_cursor: self.page.edges.last().map(|e| e.cursor.into()),
                    count_by: self.count_by.clone(),
                }
            }
        }

        /// Information about a [`Connection`] page.
        #[derive(Clone, Debug)]
        pub struct PageInfo {
            /// Underlying page information.
            info: $($read)::+::PageInfo,

            /// Start cursor of the page.
            start_cursor: Option<Cursor>,

            /// End cursor of the page.
            end_cursor: Option<Cursor>,

            /// Key to count the total number of nodes by.
            count_by: $key,
        }

        /// Information about a page of the list.
        #[::juniper::graphql_object(name = $info, context = $crate::Context)]
        impl PageInfo {
            /// Indicator whether there is a next page.
            #[must_use]
            pub fn has_next_page(&self) -> bool {
                self.info.has_next_page
            }

            /// Indicator whether there is a previous page.
            #[must_use]
            pub fn has_previous_page(&self) -> bool {
                self.info.has_previous_page
            }

            /// Start cursor of the page.
            #[must_use]
            pub fn start_cursor(&self) -> &Option<Cursor> {
                &self.start_cursor
            }

            /// End cursor of the page.
            #[must_use]
            pub fn end_cursor(&self) -> &Option<Cursor> {
                &self.end_cursor
            }

            /// Total count of nodes in the list, regardless the pagination.
            pub async fn total_count(
                &self,
                ctx: &$crate::Context,
            ) -> Result<i32, $crate::Error> {
                use ::service::Query as _;

                ctx.service()
                    .execute(<$count>::by(self.count_by.clone()))
                    .await
                    .map_err($crate::AsError::into_error)
                    .map_err(ctx.error())
                    .map(Into::into)
            }
        }
    };
}

pub mod client;
pub mod job;
pub mod loan;
pub mod material;
mod mutation;
pub mod notification;
mod query;
pub mod quote;
pub mod scalar;
mod subscription;
pub mod user;

use service::domain;

use crate::define_error;

pub use self::{
    client::Client, job::Job, loan::Loan, material::Material,
    mutation::Mutation, notification::Notification, query::Query,
    quote::Quote, subscription::Subscription, user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_EMPLOYEE"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an employee"]
        Employee,

        #[code = "NOT_SUPERVISOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a supervisor or higher"]
        Supervisor,

        #[code = "NOT_MANAGER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a manager or higher"]
        Manager,

        #[code = "NOT_DIRECTOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a director or higher"]
        Director,

        #[code = "NOT_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an admin"]
        Admin,
    }
}

impl From<domain::user::Role> for PrivilegeError {
    fn from(role: domain::user::Role) -> Self {
        use domain::user::Role as R;

        match role {
            R::Employee => Self::Employee,
            R::Supervisor => Self::Supervisor,
            R::Manager => Self::Manager,
            R::Director => Self::Director,
            R::Admin => Self::Admin,
        }
    }
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

/// Default number of nodes in a page of any list.
const DEFAULT_PAGE_SIZE: i32 = 10;
