//! GraphQL [`Subscription`]s definitions.

use std::time::Duration;

use common::DateTime;
use futures::{
    stream::{self, BoxStream},
    FutureExt as _, StreamExt as _,
};
use juniper::graphql_subscription;
use service::{query, Query as _};

use crate::{context, AsError, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

impl Subscription {
    /// Interval between two checks of the unread `Notification`s count.
    const UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(15);
}

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription waiting for the current authenticated session to expire.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - if the current session is not
    ///                              authenticated or session expired.
    pub async fn wait_session(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<bool, Error>>, Error> {
        let session = ctx.current_session().await?;
        let timeout = session.expires_at - DateTime::now();
        Ok(stream::once(
            tokio::time::sleep(timeout).map(|()| {
                Err(context::AuthError::AuthroizationRequired.into())
            }),
        )
        .boxed())
    }

    /// Emits the number of unread `Notification`s of the current `User`
    /// every time it changes, starting with the current one.
    ///
    /// Ends along with the current authenticated session.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - if the current session is not
    ///                              authenticated.
    pub async fn unread_notifications_count(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<i32, Error>>, Error> {
        let session = ctx.current_session().await?;
        let service = ctx.service().clone();
        let user_id = session.user_id.into();
        let expires_in = session.expires_at - DateTime::now();

        let counts = stream::unfold(
            (service, None::<i32>),
            move |(service, last)| async move {
                loop {
                    if last.is_some() {
                        tokio::time::sleep(Self::UNREAD_POLL_INTERVAL).await;
                    }
                    let count = service
                        .execute(query::notifications::UnreadCount::by(user_id))
                        .await
                        .map(i32::from)
                        .map_err(AsError::into_error);
                    match count {
                        Ok(c) if Some(c) == last => continue,
                        Ok(c) => return Some((Ok(c), (service, Some(c)))),
                        Err(e) => return Some((Err(e), (service, last))),
                    }
                }
            },
        );
        Ok(counts
            .take_until(tokio::time::sleep(expires_in))
            .boxed())
    }
}
