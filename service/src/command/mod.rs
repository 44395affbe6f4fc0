//! [`Command`] definition.

pub mod add_quote_item;
pub mod assign_job;
pub mod authorize_user_session;
pub mod change_quote_status;
pub mod create_client;
pub mod create_loan;
pub mod create_material;
pub mod create_quote;
pub mod create_representative;
pub mod create_user;
pub mod create_user_session;
pub mod delete_client;
pub mod delete_material;
pub mod delete_notification;
pub mod delete_quote;
pub mod delete_representative;
pub mod delete_user;
pub mod mark_all_notifications_read;
pub mod mark_notification_read;
pub mod register_maintenance;
pub mod remove_quote_item;
pub mod respond_to_quote;
pub mod return_loan;
pub mod send_quote;
pub mod set_user_activity;
pub mod unassign_job;
pub mod update_client;
pub mod update_job;
pub mod update_loan;
pub mod update_material;
pub mod update_quote;
pub mod update_quote_item;
pub mod update_representative;
pub mod update_user;
pub mod update_user_password;
pub mod update_user_role;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_quote_item::AddQuoteItem, assign_job::AssignJob,
    authorize_user_session::AuthorizeUserSession,
    change_quote_status::ChangeQuoteStatus, create_client::CreateClient,
    create_loan::CreateLoan, create_material::CreateMaterial,
    create_quote::CreateQuote, create_representative::CreateRepresentative,
    create_user::CreateUser, create_user_session::CreateUserSession,
    delete_client::DeleteClient, delete_material::DeleteMaterial,
    delete_notification::DeleteNotification, delete_quote::DeleteQuote,
    delete_representative::DeleteRepresentative, delete_user::DeleteUser,
    mark_all_notifications_read::MarkAllNotificationsRead,
    mark_notification_read::MarkNotificationRead,
    register_maintenance::RegisterMaintenance,
    remove_quote_item::RemoveQuoteItem, respond_to_quote::RespondToQuote,
    return_loan::ReturnLoan, send_quote::SendQuote,
    set_user_activity::SetUserActivity, unassign_job::UnassignJob,
    update_client::UpdateClient, update_job::UpdateJob,
    update_loan::UpdateLoan, update_material::UpdateMaterial,
    update_quote::UpdateQuote, update_quote_item::UpdateQuoteItem,
    update_representative::UpdateRepresentative, update_user::UpdateUser,
    update_user_password::UpdateUserPassword,
    update_user_role::UpdateUserRole,
};
