//! Domain definitions.

pub mod client;
pub mod contact;
pub mod job;
pub mod loan;
pub mod material;
pub mod notification;
pub mod quote;
pub mod rut;
pub mod user;

pub use self::{
    client::Client, job::Job, loan::Loan, material::Material,
    notification::Notification, quote::Quote, rut::Rut, user::User,
};
