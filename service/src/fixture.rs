//! Ready-made [`Service`] parts and entities for tests.

use std::time::Duration;

use common::{money::Currency, DateTime, Money, Percent};
use rust_decimal::Decimal;

use crate::{
    domain::{
        material::{self, MaintenanceSchedule},
        quote::{self, item},
        user, Material, Quote, User,
    },
    infra::database::memory::Memory,
    task, Config, QuotesConfig, Service,
};

/// Secret both JWT keys are derived from.
const JWT_SECRET: &[u8] = b"electromecanica-osorno";

pub(crate) fn config() -> Config {
    let hourly = Duration::from_secs(60 * 60);
    Config {
        jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(JWT_SECRET),
        jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(JWT_SECRET),
        quotes: QuotesConfig {
            vat_rate: Percent::new(Decimal::from(19)).unwrap(),
            default_currency: Currency::Clp,
            public_url: "https://cotizaciones.example.cl".into(),
        },
        scan_maintenance: task::scan_maintenance::Config { interval: hourly },
        expire_quotes: task::expire_quotes::Config { interval: hourly },
        request_feedback: task::request_feedback::Config {
            interval: hourly,
            delay: Duration::from_secs(3 * 24 * 60 * 60),
        },
        clean_notifications: task::clean_notifications::Config {
            interval: hourly,
            max_age: Duration::from_secs(30 * 24 * 60 * 60),
        },
    }
}

/// Creates a [`Service`] without spawning its background [`Task`]s.
///
/// [`Task`]: crate::Task
pub(crate) fn service<M>(database: Memory, mailer: M) -> Service<Memory, M> {
    Service {
        config: config(),
        database,
        mailer,
    }
}

pub(crate) fn clp(amount: &str) -> Money {
    Money::new(amount.parse().unwrap(), Currency::Clp)
}

pub(crate) fn user(role: user::Role) -> User {
    let password = user::Password::new("bombas-de-agua").unwrap();
    User {
        id: user::Id::new(),
        name: user::Name::new("Juana Alvarado").unwrap(),
        login: user::Login::new(format!("u{}", user::Id::new())).unwrap(),
        password_hash: user::PasswordHash::new(&password).unwrap(),
        email: None,
        phone: None,
        role,
        rut: None,
        is_active: true,
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    }
}

pub(crate) fn quote(status: quote::Status) -> Quote {
    let now = DateTime::now();
    Quote {
        id: quote::Id::new(),
        number: quote::Number::new(2024, 1),
        client_id: None,
        client_name: "Agrícola Los Canelos".parse().unwrap(),
        representative_id: None,
        representative_name: None,
        reference: quote::Reference::new("Mantención de bombas").unwrap(),
        location: quote::Location::new("Osorno").unwrap(),
        status,
        due_on: None,
        currency: Currency::Clp,
        travel_expenses: Money::zero(Currency::Clp),
        totals: quote::Totals::zero(Currency::Clp),
        notes: None,
        created_by: user::Id::new(),
        token: Some(quote::Token::generate()),
        sent_at: None,
        sent_to: None,
        responded_at: None,
        rejection_reason: None,
        client_comments: None,
        finalized_at: None,
        feedback_requested: false,
        created_at: now.coerce(),
        updated_at: now.coerce(),
    }
}

pub(crate) fn material(maintenance: Option<MaintenanceSchedule>) -> Material {
    let id = material::Id::new();
    Material {
        id,
        code: material::Code::new(format!("GEN-{id}")).unwrap(),
        name: material::Name::new("Generador 5 kVA").unwrap(),
        description: None,
        unit_price: clp("25000"),
        unit: material::Unit::default(),
        category: None,
        is_active: true,
        maintenance,
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    }
}

/// Creates a material [`quote::Item`] using the [`Material`] with the
/// provided ID for `usage_hours`.
pub(crate) fn material_item(
    quote_id: quote::Id,
    material_id: material::Id,
    usage_hours: &str,
) -> quote::Item {
    quote::Item {
        id: item::Id::new(),
        quote_id,
        position: item::Position::default(),
        line: item::Line::Material {
            material_id: Some(material_id),
            description: item::Description::new("Generador 5 kVA").unwrap(),
            quantity: "1".parse().unwrap(),
            unit_price: clp("25000"),
            usage_hours: usage_hours.parse().unwrap(),
        },
    }
}
