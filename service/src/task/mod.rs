//! Background [`Task`]s definitions.

pub mod background;
pub mod clean_notifications;
pub mod expire_quotes;
pub mod request_feedback;
pub mod scan_maintenance;

pub use common::Handler as Task;

pub use self::{
    background::Background, clean_notifications::CleanNotifications,
    expire_quotes::ExpireQuotes, request_feedback::RequestFeedback,
    scan_maintenance::ScanMaintenance,
};
