//! Read entities definitions.

pub mod client;
pub mod job;
pub mod loan;
pub mod material;
pub mod notification;
pub mod quote;
pub mod user;

