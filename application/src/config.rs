//! [`Config`]-related definitions.

use std::time;

use common::{money::Currency, Percent};
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// SMTP configuration.
    pub smtp: Smtp,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Quotes configuration.
    pub quotes: Quotes,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            jwt_secret,
            quotes:
                Quotes {
                    vat_rate,
                    default_currency,
                    public_url,
                },
            tasks:
                Tasks {
                    scan_maintenance,
                    expire_quotes,
                    request_feedback,
                    clean_notifications,
                },
        } = value;

        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            quotes: service::QuotesConfig {
                vat_rate,
                default_currency,
                public_url,
            },
            scan_maintenance: service::task::scan_maintenance::Config {
                interval: scan_maintenance.interval,
            },
            expire_quotes: service::task::expire_quotes::Config {
                interval: expire_quotes.interval,
            },
            request_feedback: service::task::request_feedback::Config {
                interval: request_feedback.interval,
                delay: request_feedback.delay,
            },
            clean_notifications: service::task::clean_notifications::Config {
                interval: clean_notifications.interval,
                max_age: clean_notifications.max_age,
            },
        }
    }
}

/// Quotes configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Quotes {
    /// Value-added tax rate, in percents.
    #[default(Quotes::CHILEAN_VAT_RATE)]
    pub vat_rate: Percent,

    /// Currency of new quotes when none is specified.
    #[default(Currency::Clp)]
    pub default_currency: Currency,

    /// Public base URL the links sent to clients are built upon.
    #[default("http://localhost:8080".to_owned())]
    pub public_url: String,
}

impl Quotes {
    /// Value-added tax rate in Chile (19%).
    // SAFETY: `19` is within the `0..=100` range.
    #[expect(unsafe_code, reason = "invariants are preserved")]
    const CHILEAN_VAT_RATE: Percent = unsafe {
        Percent::new_unchecked(Decimal::from_parts(19, 0, 0, false, 0))
    };
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `ScanMaintenance` task configuration.
    pub scan_maintenance: ScanMaintenance,

    /// `ExpireQuotes` task configuration.
    pub expire_quotes: ExpireQuotes,

    /// `RequestFeedback` task configuration.
    pub request_feedback: RequestFeedback,

    /// `CleanNotifications` task configuration.
    pub clean_notifications: CleanNotifications,
}

/// `ScanMaintenance` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ScanMaintenance {
    /// Task execution interval.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,
}

/// `ExpireQuotes` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ExpireQuotes {
    /// Task execution interval.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,
}

/// `RequestFeedback` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct RequestFeedback {
    /// Task execution interval.
    #[default(time::Duration::from_secs(6 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Time passed since a quote finalization to request a feedback after.
    #[default(time::Duration::from_secs(7 * 24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub delay: time::Duration,
}

/// `CleanNotifications` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct CleanNotifications {
    /// Task execution interval.
    #[default(time::Duration::from_secs(24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Age of read notifications to be removed after.
    #[default(time::Duration::from_secs(180 * 24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub max_age: time::Duration,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// SMTP configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Smtp {
    /// Indicator whether emails are actually delivered.
    ///
    /// Disabled emails are only logged.
    pub enabled: bool,

    /// Host of the SMTP relay.
    #[default("localhost".to_owned())]
    pub host: String,

    /// Port of the SMTP relay.
    #[default(587)]
    pub port: u16,

    /// Username to authenticate with.
    pub username: Option<String>,

    /// Password to authenticate with.
    pub password: Option<SecretString>,

    /// Sender of the emails.
    #[default("noreply@localhost".to_owned())]
    pub sender: String,

    /// Delivery retry configuration.
    pub retry: Retry,
}

impl From<Smtp> for service::infra::mailer::smtp::Config {
    fn from(value: Smtp) -> Self {
        let Smtp {
            enabled,
            host,
            port,
            username,
            password,
            sender,
            retry: _,
        } = value;

        Self {
            enabled,
            host,
            port,
            username,
            password,
            sender,
        }
    }
}

/// Delivery retry configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Retry {
    /// Maximum number of delivery attempts.
    #[default(3)]
    pub attempts: u32,

    /// Delay before the second attempt, doubled on every next one.
    #[default(time::Duration::from_secs(1))]
    #[serde(with = "humantime_serde")]
    pub initial_delay: time::Duration,
}

impl From<Retry> for service::infra::mailer::RetryConfig {
    fn from(value: Retry) -> Self {
        let Retry {
            attempts,
            initial_delay,
        } = value;
        Self {
            attempts,
            initial_delay,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::money::Currency;
    use config::{builder::DefaultState, ConfigBuilder, ConfigError};

    use super::{Config, Service};

    #[test]
    fn defaults_match_business_rules() {
        let Config {
            service, smtp, ..
        } = Config::default();

        assert_eq!(service.quotes.vat_rate.to_string(), "19");
        assert_eq!(service.quotes.default_currency, Currency::Clp);
        assert_eq!(
            service.tasks.request_feedback.delay,
            Duration::from_secs(7 * 24 * 60 * 60),
        );
        assert_eq!(
            service.tasks.clean_notifications.max_age,
            Duration::from_secs(180 * 24 * 60 * 60),
        );
        assert!(!smtp.enabled);
        assert_eq!(smtp.retry.attempts, 3);
        assert_eq!(smtp.retry.initial_delay, Duration::from_secs(1));
    }

    fn load(vat_rate: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .set_override("service.quotes.vat_rate", vat_rate)?
            .build()?
            .try_deserialize()
    }

    #[test]
    fn reads_vat_rate() {
        let conf = load("10.5").unwrap();

        assert_eq!(conf.service.quotes.vat_rate.to_string(), "10.5");
    }

    #[test]
    fn rejects_invalid_vat_rate() {
        assert!(load("120").is_err());
        assert!(load("abc").is_err());
    }

    #[test]
    fn converts_into_service_config() {
        let conf = service::Config::from(Service::default());

        assert_eq!(conf.quotes.vat_rate.to_string(), "19");
        assert_eq!(
            conf.scan_maintenance.interval,
            Duration::from_secs(60 * 60),
        );
    }
}
