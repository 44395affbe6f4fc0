//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use common::{
    money::Currency,
    operations::{By, Start},
    Percent,
};
use derive_more::{Debug, Error};

#[cfg(doc)]
use infra::{Database, Mailer};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`QuotesConfig`] of this [`Service`].
    pub quotes: QuotesConfig,

    /// [`task::ScanMaintenance`] configuration.
    pub scan_maintenance: task::scan_maintenance::Config,

    /// [`task::ExpireQuotes`] configuration.
    pub expire_quotes: task::expire_quotes::Config,

    /// [`task::RequestFeedback`] configuration.
    pub request_feedback: task::request_feedback::Config,

    /// [`task::CleanNotifications`] configuration.
    pub clean_notifications: task::clean_notifications::Config,
}

/// Configuration of [`domain::Quote`]s handling.
#[derive(Clone, Debug)]
pub struct QuotesConfig {
    /// Value-added tax rate applied to the net value of [`domain::Quote`]s.
    pub vat_rate: Percent,

    /// [`Currency`] of new [`domain::Quote`]s when none is specified.
    pub default_currency: Currency,

    /// Public base URL the response links sent to clients are built upon.
    pub public_url: String,
}

impl QuotesConfig {
    /// Returns the public link a client responds to a [`domain::Quote`] by.
    #[must_use]
    pub fn response_link(&self, token: &domain::quote::Token) -> String {
        format!(
            "{}/quotes/respond/{token}",
            self.public_url.trim_end_matches('/'),
        )
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, M> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Mailer`] of this [`Service`].
    mailer: M,
}

impl<Db, M> Service<Db, M> {
    /// Creates a new [`Service`] with the provided parameters, along with the
    /// [`task::Background`] running its periodic [`Task`]s.
    pub fn new(
        config: Config,
        database: Db,
        mailer: M,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ScanMaintenance<Self>,
                        task::scan_maintenance::Config,
                    >,
                >,
                Ok = (),
                Err: Error + 'static,
            > + Task<
                Start<
                    By<task::ExpireQuotes<Self>, task::expire_quotes::Config>,
                >,
                Ok = (),
                Err: Error + 'static,
            > + Task<
                Start<
                    By<
                        task::RequestFeedback<Self>,
                        task::request_feedback::Config,
                    >,
                >,
                Ok = (),
                Err: Error + 'static,
            > + Task<
                Start<
                    By<
                        task::CleanNotifications<Self>,
                        task::clean_notifications::Config,
                    >,
                >,
                Ok = (),
                Err: Error + 'static,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            mailer,
        };

        let mut bg = task::Background::default();

        let svc = this.clone();
        bg.spawn("scan_maintenance", async move {
            let config = svc.config().scan_maintenance;
            svc.execute(Start(By::<task::ScanMaintenance<Self>, _>::new(
                config,
            )))
            .await
        });
        let svc = this.clone();
        bg.spawn("expire_quotes", async move {
            let config = svc.config().expire_quotes;
            svc.execute(Start(By::<task::ExpireQuotes<Self>, _>::new(config)))
                .await
        });
        let svc = this.clone();
        bg.spawn("request_feedback", async move {
            let config = svc.config().request_feedback;
            svc.execute(Start(By::<task::RequestFeedback<Self>, _>::new(
                config,
            )))
            .await
        });
        let svc = this.clone();
        bg.spawn("clean_notifications", async move {
            let config = svc.config().clean_notifications;
            svc.execute(Start(By::<task::CleanNotifications<Self>, _>::new(
                config,
            )))
            .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Mailer`] of this [`Service`].
    #[must_use]
    pub fn mailer(&self) -> &M {
        &self.mailer
    }
}
