//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use juniper::{graphql_object, Nullable};
use service::{command, domain::user::Role, query, Command as _, Query as _};

use crate::{api, context, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials and contact info.
    ///
    /// The very first `User` of the system is created without
    /// authentication and always becomes an `ADMIN`. Any next `User` may be
    /// created by an `ADMIN` only, with a `UserRole` not higher than theirs.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another `User`;
    /// - `USER_CREATION_NOT_ALLOWED` - the current `User` is not allowed to
    ///                                 create a `User` with such `UserRole`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email.as_ref().map(ToString::to_string),
            gql.name = "createUser",
            login = %login,
            name = %name,
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        login: api::user::Login,
        password: api::user::Password,
        role: api::user::Role,
        email: Option<api::client::Email>,
        phone: Option<api::client::Phone>,
        rut: Option<api::client::Rut>,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let initiator = ctx.try_current_session().await?;

        ctx.service()
            .execute(command::CreateUser {
                name: name.into(),
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                role: role.into(),
                rut: rut.map(Into::into),
                initiator_id: initiator.map(|s| s.user_id.into()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(&output)).await;

        Ok(output.into())
    }

    /// Prolongs the current `UserSession` by issuing a new token.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "refreshUserSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn refresh_user_session(
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateUserSession::ByUserId(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `User`'s password to the provided one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_PASSWORD` - provided `old_password` does not match the current
    ///                      `User` password.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserPassword",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_user_password(
        new_password: api::user::Password,
        old_password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserPassword {
                user_id: my_id.into(),
                new_password: secrecy::SecretBox::init_with(move || {
                    new_password.into()
                }),
                old_password: secrecy::SecretBox::init_with(move || {
                    old_password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Assigns the provided `UserRole` to the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `ROLE_CHANGE_NOT_ALLOWED` - the current `User` doesn't outrank the
    ///                               `User` or the assigned `UserRole`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserRole",
            id = %id,
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn update_user_role(
        id: api::user::Id,
        role: api::user::Role,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserRole {
                user_id: id.into(),
                role: role.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the profile of the `User` with the specified ID.
    ///
    /// Omitted arguments are left untouched, while explicit `null`s clear
    /// the respective values. Any `User` may edit their own `name`, `email`
    /// and `phone`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is used by another `User`;
    /// - `USER_UPDATE_NOT_ALLOWED` - the current `User` doesn't outrank the
    ///                               `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUser",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_user(
        id: api::user::Id,
        name: Option<api::user::Name>,
        login: Option<api::user::Login>,
        email: Nullable<api::client::Email>,
        phone: Nullable<api::client::Phone>,
        rut: Nullable<api::client::Rut>,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUser {
                user_id: id.into(),
                name: name.map(Into::into),
                login: login.map(Into::into),
                email: email.explicit().map(|v| v.map(Into::into)),
                phone: phone.explicit().map(|v| v.map(Into::into)),
                rut: rut.explicit().map(|v| v.map(Into::into)),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deactivates or reactivates the `User` with the specified ID.
    ///
    /// Deactivated `User`s cannot sign in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `OWN_ACCOUNT` - the `User` is the current one;
    /// - `USER_MANAGEMENT_NOT_ALLOWED` - the current `User` doesn't outrank
    ///                                   the `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            active = active,
            gql.name = "setUserActive",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn set_user_active(
        id: api::user::Id,
        active: bool,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::SetUserActivity {
                user_id: id.into(),
                is_active: active,
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `User` with the specified ID.
    ///
    /// `Quote`s, `Job`s and `Loan`s of the removed `User` stay intact.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `OWN_ACCOUNT` - the `User` is the current one;
    /// - `USER_MANAGEMENT_NOT_ALLOWED` - the current `User` doesn't outrank
    ///                                   the `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteUser",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteUser {
                user_id: id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createClient",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_client(
        name: api::client::Name,
        rut: Option<api::client::Rut>,
        address: Option<api::client::Address>,
        phone: Option<api::client::Phone>,
        email: Option<api::client::Email>,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::CreateClient {
                name: name.into(),
                rut: rut.map(Into::into),
                address: address.map(Into::into),
                phone: phone.map(Into::into),
                email: email.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Client` with the specified ID.
    ///
    /// Omitted arguments are left untouched, while explicit `null`s clear
    /// the respective values.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_client(
        id: api::client::Id,
        name: Option<api::client::Name>,
        rut: Nullable<api::client::Rut>,
        address: Nullable<api::client::Address>,
        phone: Nullable<api::client::Phone>,
        email: Nullable<api::client::Email>,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::UpdateClient {
                client_id: id.into(),
                name: name.map(Into::into),
                rut: rut.explicit().map(|v| v.map(Into::into)),
                address: address.explicit().map(|v| v.map(Into::into)),
                phone: phone.explicit().map(|v| v.map(Into::into)),
                email: email.explicit().map(|v| v.map(Into::into)),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Client` with the specified ID.
    ///
    /// `Quote`s of the removed `Client` keep its name.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::DeleteClient {
                client_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds a new `Representative` to the `Client` with the specified ID.
    ///
    /// Without a `position` the `Representative` goes after the existing
    /// ones.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            client_id = %client_id,
            gql.name = "createRepresentative",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_representative(
        client_id: api::client::Id,
        name: api::client::Name,
        position: Option<i32>,
        ctx: &Context,
    ) -> Result<api::client::Representative, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::CreateRepresentative {
                client_id: client_id.into(),
                name: name.into(),
                position: position.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Representative` with the specified ID.
    ///
    /// Already addressed `Quote`s keep the former name.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REPRESENTATIVE_NOT_EXISTS` - the `Representative` with the
    ///                                 specified ID does not exist;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateRepresentative",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_representative(
        id: api::client::RepresentativeId,
        name: Option<api::client::Name>,
        position: Option<i32>,
        ctx: &Context,
    ) -> Result<api::client::Representative, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::UpdateRepresentative {
                representative_id: id.into(),
                name: name.map(Into::into),
                position: position.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Representative` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REPRESENTATIVE_NOT_EXISTS` - the `Representative` with the
    ///                                 specified ID does not exist;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteRepresentative",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_representative(
        id: api::client::RepresentativeId,
        ctx: &Context,
    ) -> Result<api::client::Representative, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::DeleteRepresentative {
                representative_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Material` in the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_CODE_OCCUPIED` - provided `MaterialCode` is used by
    ///                              another `Material`;
    /// - `NEGATIVE_PRICE` - provided `unitPrice` is negative;
    /// - `INVALID_MAINTENANCE_SCHEDULE` - provided `maintenance` is invalid;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "createMaterial",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_material(
        code: api::material::Code,
        name: api::material::Name,
        unit_price: Money,
        description: Option<api::material::Description>,
        unit: Option<api::material::Unit>,
        category: Option<api::material::Category>,
        maintenance: Option<api::material::MaintenanceScheduleInput>,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        let maintenance = maintenance
            .map(TryInto::try_into)
            .transpose()
            .map_err(|e: api::material::MaintenanceScheduleError| e.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateMaterial {
                code: code.into(),
                name: name.into(),
                description: description.map(Into::into),
                unit_price,
                unit: unit.map(Into::into),
                category: category.map(Into::into),
                maintenance,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Material` with the specified ID.
    ///
    /// Omitted arguments are left untouched, while explicit `null`s clear
    /// the respective values. Changing the `maintenance` clears unread
    /// maintenance `Notification`s about the `Material`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified ID does
    ///                           not exist;
    /// - `MATERIAL_CODE_OCCUPIED` - provided `MaterialCode` is used by
    ///                              another `Material`;
    /// - `NEGATIVE_PRICE` - provided `unitPrice` is negative;
    /// - `INVALID_MAINTENANCE_SCHEDULE` - provided `maintenance` is invalid;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateMaterial",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_material(
        id: api::material::Id,
        code: Option<api::material::Code>,
        name: Option<api::material::Name>,
        description: Nullable<api::material::Description>,
        unit_price: Option<Money>,
        unit: Option<api::material::Unit>,
        category: Nullable<api::material::Category>,
        is_active: Option<bool>,
        maintenance: Nullable<api::material::MaintenanceScheduleInput>,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        let maintenance = maintenance
            .explicit()
            .map(|s| s.map(TryInto::try_into).transpose())
            .transpose()
            .map_err(|e: api::material::MaintenanceScheduleError| e.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateMaterial {
                material_id: id.into(),
                code: code.map(Into::into),
                name: name.map(Into::into),
                description: description
                    .explicit()
                    .map(|v| v.map(Into::into)),
                unit_price,
                unit: unit.map(Into::into),
                category: category.explicit().map(|v| v.map(Into::into)),
                is_active,
                maintenance,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Material` with the specified ID from the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified ID does
    ///                           not exist;
    /// - `MATERIAL_LENT` - the `Material` is currently lent;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteMaterial",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_material(
        id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::DeleteMaterial {
                material_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a maintenance of the `Material` performed today.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified ID does
    ///                           not exist;
    /// - `NO_MAINTENANCE_SCHEDULE` - the `Material` has no
    ///                               `MaintenanceSchedule`;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "registerMaintenance",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn register_maintenance(
        id: api::material::Id,
        ctx: &Context,
    ) -> Result<api::Material, Error> {
        _ = ctx.require_role(Role::Supervisor).await?;

        ctx.service()
            .execute(command::RegisterMaintenance {
                material_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new draft `Quote` for the `Client` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `CURRENCY_MISMATCH` - `travelExpenses` are not in the `Currency` of
    ///                         the `Quote`;
    /// - `NEGATIVE_TRAVEL_EXPENSES` - provided `travelExpenses` are negative;
    /// - `REPRESENTATIVE_NOT_EXISTS` - the `Representative` with the
    ///                                 specified ID does not belong to the
    ///                                 `Client`;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            client_id = %client_id,
            gql.name = "createQuote",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_quote(
        client_id: api::client::Id,
        reference: api::quote::Reference,
        location: api::quote::Location,
        due_on: Option<Date>,
        currency: Option<api::quote::Currency>,
        travel_expenses: Option<Money>,
        notes: Option<api::quote::Notes>,
        representative_id: Option<api::client::RepresentativeId>,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        let my_id = ctx.require_role(Role::Manager).await?.user_id;

        ctx.service()
            .execute(command::CreateQuote {
                client_id: client_id.into(),
                reference: reference.into(),
                location: location.into(),
                due_on: due_on.map(|d| d.coerce()),
                currency: currency.map(Into::into),
                travel_expenses,
                notes: notes.map(Into::into),
                representative_id: representative_id.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the draft `Quote` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified ID does not
    ///                        exist;
    /// - `QUOTE_NOT_EDITABLE` - the `Quote` is not a draft;
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist;
    /// - `CURRENCY_MISMATCH` - `travelExpenses` are not in the `Currency` of
    ///                         the `Quote`;
    /// - `NEGATIVE_TRAVEL_EXPENSES` - provided `travelExpenses` are negative;
    /// - `REPRESENTATIVE_NOT_EXISTS` - the `Representative` with the
    ///                                 specified ID does not belong to the
    ///                                 `Client` of the `Quote`;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateQuote",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_quote(
        id: api::quote::Id,
        client_id: Option<api::client::Id>,
        reference: Option<api::quote::Reference>,
        location: Option<api::quote::Location>,
        due_on: Nullable<Date>,
        travel_expenses: Option<Money>,
        notes: Nullable<api::quote::Notes>,
        representative_id: Nullable<api::client::RepresentativeId>,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::UpdateQuote {
                quote_id: id.into(),
                client_id: client_id.map(Into::into),
                reference: reference.map(Into::into),
                location: location.map(Into::into),
                due_on: due_on.explicit().map(|v| v.map(|d| d.coerce())),
                travel_expenses,
                notes: notes.explicit().map(|v| v.map(Into::into)),
                representative_id: representative_id
                    .explicit()
                    .map(|v| v.map(Into::into)),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the draft `Quote` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified ID does not
    ///                        exist;
    /// - `QUOTE_NOT_DRAFT` - the `Quote` is not a draft;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteQuote",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_quote(
        id: api::quote::Id,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::DeleteQuote { quote_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Appends a new `QuoteItem` to the draft `Quote` with the specified ID.
    ///
    /// Returns the `Quote` with its recomputed `QuoteTotals`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified ID does not
    ///                        exist;
    /// - `QUOTE_NOT_EDITABLE` - the `Quote` is not a draft;
    /// - `MATERIAL_NOT_EXISTS` - the referenced `Material` does not exist;
    /// - `CURRENCY_MISMATCH` - `unitPrice` is not in the `Currency` of the
    ///                         `Quote`;
    /// - `NEGATIVE_PRICE` - provided `unitPrice` is negative;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addQuoteItem",
            otel.name = Self::SPAN_NAME,
            quote_id = %quote_id,
        ),
    )]
    pub async fn add_quote_item(
        quote_id: api::quote::Id,
        item: api::quote::ItemInput,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::AddQuoteItem {
                quote_id: quote_id.into(),
                line: item.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|out| out.quote.into())
    }

    /// Replaces the contents or moves the `QuoteItem` with the specified ID.
    ///
    /// Returns the `Quote` with its recomputed `QuoteTotals`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_ITEM_NOT_EXISTS` - the `QuoteItem` with the specified ID does
    ///                             not exist;
    /// - `QUOTE_NOT_EDITABLE` - the `Quote` is not a draft;
    /// - `MATERIAL_NOT_EXISTS` - the referenced `Material` does not exist;
    /// - `CURRENCY_MISMATCH` - `unitPrice` is not in the `Currency` of the
    ///                         `Quote`;
    /// - `NEGATIVE_PRICE` - provided `unitPrice` is negative;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateQuoteItem",
            id = %id,
            otel.name = Self::SPAN_NAME,
            position = ?position,
        ),
    )]
    pub async fn update_quote_item(
        id: api::quote::ItemId,
        item: Option<api::quote::ItemInput>,
        position: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::UpdateQuoteItem {
                item_id: id.into(),
                line: item.map(Into::into),
                position: position.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|out| out.quote.into())
    }

    /// Removes the `QuoteItem` with the specified ID from its draft `Quote`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_ITEM_NOT_EXISTS` - the `QuoteItem` with the specified ID does
    ///                             not exist;
    /// - `QUOTE_NOT_EDITABLE` - the `Quote` is not a draft;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeQuoteItem",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_quote_item(
        id: api::quote::ItemId,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::RemoveQuoteItem { item_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Sends the `Quote` with the specified ID to its `Client` by email,
    /// along with the public response link.
    ///
    /// The `Client` email is used if no explicit `to` address is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified ID does not
    ///                        exist;
    /// - `QUOTE_HAS_NO_ITEMS` - the `Quote` has no `QuoteItem`s;
    /// - `NO_RECIPIENT` - neither `to` is provided, nor the `Client` has an
    ///                    email;
    /// - `WRONG_QUOTE_STATUS` - the `Quote` is neither a draft nor sent;
    /// - `EMAIL_NOT_SENT` - the email delivery failed;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "sendQuote",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn send_quote(
        id: api::quote::Id,
        to: Option<api::client::Email>,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::SendQuote {
                quote_id: id.into(),
                to: to.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `Quote` with the specified ID into the provided
    /// `QuoteStatus`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_NOT_EXISTS` - the `Quote` with the specified ID does not
    ///                        exist;
    /// - `SENDING_REQUIRED` - `SENT` status is requested directly instead of
    ///                        sending the `Quote`;
    /// - `WRONG_QUOTE_STATUS_TRANSITION` - the `Quote` cannot move into the
    ///                                     provided `QuoteStatus`;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "changeQuoteStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn change_quote_status(
        id: api::quote::Id,
        status: api::quote::Status,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::ChangeQuoteStatus {
                quote_id: id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records the `Client`'s response to the `Quote` shared with the
    /// specified `QuoteToken`.
    ///
    /// Doesn't require authentication. `reason` is mandatory for the
    /// `REJECT` response.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_QUOTE_TOKEN` - no `Quote` is shared with the specified
    ///                           `QuoteToken`;
    /// - `REJECTION_REASON_REQUIRED` - `REJECT` response has no `reason`;
    /// - `QUOTE_NOT_AWAITING_RESPONSE` - the `Quote` doesn't accept responses
    ///                                   anymore.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "respondToQuote",
            otel.name = Self::SPAN_NAME,
            response = ?response,
        ),
    )]
    pub async fn respond_to_quote(
        token: api::quote::Token,
        response: api::quote::Response,
        reason: Option<api::quote::Comment>,
        comments: Option<api::quote::Comment>,
        ctx: &Context,
    ) -> Result<api::quote::PublicQuote, Error> {
        use service::domain::quote::Response as R;

        let response = match response {
            api::quote::Response::Approve => R::Approve,
            api::quote::Response::RequestChanges => R::RequestChanges,
            api::quote::Response::Reject => R::Reject(
                reason
                    .ok_or_else(|| QuoteResponseError::ReasonRequired.into())
                    .map_err(ctx.error())?
                    .into(),
            ),
        };

        let quote = ctx
            .service()
            .execute(command::RespondToQuote {
                token: token.into(),
                response,
                comments: comments.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let items = ctx
            .service()
            .execute(query::quote::Items::by(quote.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok((quote, items).into())
    }

    /// Assigns the employee `User` with the specified ID to the labor
    /// `QuoteItem` of an approved `Quote`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `QUOTE_ITEM_NOT_EXISTS` - the `QuoteItem` with the specified ID does
    ///                             not exist;
    /// - `NOT_LABOR_ITEM` - the `QuoteItem` is not a labor one;
    /// - `QUOTE_NOT_APPROVED` - the `Quote` is not approved;
    /// - `USER_NOT_EXISTS` - the employee `User` does not exist;
    /// - `JOB_ALREADY_ASSIGNED` - the employee is already assigned to the
    ///                            `QuoteItem`;
    /// - `NOT_MANAGER` - the current `User` is not a manager.
    #[tracing::instrument(
        skip_all,
        fields(
            employee_id = %employee_id,
            gql.name = "assignJob",
            item_id = %item_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn assign_job(
        item_id: api::quote::ItemId,
        employee_id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        let my_id = ctx.require_role(Role::Manager).await?.user_id;

        ctx.service()
            .execute(command::AssignJob {
                item_id: item_id.into(),
                employee_id: employee_id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Job` with the specified ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "unassignJob",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn unassign_job(
        id: api::job::Id,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        _ = ctx.require_role(Role::Manager).await?;

        ctx.service()
            .execute(command::UnassignJob { job_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the progress of the `Job` with the specified ID.
    ///
    /// Employees may update their own `Job`s only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `JOB_NOT_EXISTS` - the `Job` with the specified ID does not exist;
    /// - `JOB_UPDATE_NOT_ALLOWED` - the `Job` is assigned to another `User`;
    /// - `WRONG_JOB_STATUS_TRANSITION` - the `Job` cannot move into the
    ///                                   provided `JobStatus`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateJob",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_job(
        id: api::job::Id,
        status: Option<api::job::Status>,
        worked_hours: Option<api::quote::Quantity>,
        notes: Nullable<api::job::Notes>,
        ctx: &Context,
    ) -> Result<api::Job, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateJob {
                job_id: id.into(),
                status: status.map(Into::into),
                worked_hours: worked_hours.map(Into::into),
                notes: notes.explicit().map(|v| v.map(Into::into)),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lends the `Material` with the specified ID.
    ///
    /// The lent `Material` becomes inactive until returned.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MATERIAL_NOT_EXISTS` - the `Material` with the specified ID does
    ///                           not exist;
    /// - `MATERIAL_INACTIVE` - the `Material` is inactive;
    /// - `MATERIAL_ALREADY_LENT` - the `Material` is lent already;
    /// - `INVALID_LOAN_PERIOD` - `dueOn` is before `issuedOn`;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            due_on = %due_on,
            gql.name = "createLoan",
            material_id = %material_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_loan(
        material_id: api::material::Id,
        borrower: api::loan::Borrower,
        due_on: Date,
        issued_on: Option<Date>,
        notes: Option<api::loan::Notes>,
        ctx: &Context,
    ) -> Result<api::Loan, Error> {
        let my_id = ctx.require_role(Role::Supervisor).await?.user_id;

        ctx.service()
            .execute(command::CreateLoan {
                material_id: material_id.into(),
                borrower: borrower.into(),
                issued_on: issued_on.map(|d| d.coerce()),
                due_on: due_on.coerce(),
                notes: notes.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the active `Loan` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOAN_NOT_EXISTS` - the `Loan` with the specified ID does not exist;
    /// - `INVALID_LOAN_PERIOD` - `dueOn` is before the issue `Date`;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateLoan",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_loan(
        id: api::loan::Id,
        borrower: Option<api::loan::Borrower>,
        due_on: Option<Date>,
        notes: Nullable<api::loan::Notes>,
        ctx: &Context,
    ) -> Result<api::Loan, Error> {
        _ = ctx.require_role(Role::Supervisor).await?;

        ctx.service()
            .execute(command::UpdateLoan {
                loan_id: id.into(),
                borrower: borrower.map(Into::into),
                due_on: due_on.map(|d| d.coerce()),
                notes: notes.explicit().map(|v| v.map(Into::into)),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the lent `Material`, recording the `Loan` into the lending
    /// history.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOAN_NOT_EXISTS` - the `Loan` with the specified ID does not exist;
    /// - `RETURNED_BEFORE_ISSUED` - `returnedOn` is before the issue `Date`;
    /// - `NOT_SUPERVISOR` - the current `User` is not a supervisor.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "returnLoan",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn return_loan(
        id: api::loan::Id,
        returned_on: Option<Date>,
        notes: Option<api::loan::Notes>,
        ctx: &Context,
    ) -> Result<api::loan::Record, Error> {
        let my_id = ctx.require_role(Role::Supervisor).await?.user_id;

        ctx.service()
            .execute(command::ReturnLoan {
                loan_id: id.into(),
                returned_on: returned_on.map(|d| d.coerce()),
                notes: notes.map(Into::into),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `Notification` with the specified ID as read.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markNotificationRead",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_notification_read(
        id: api::notification::Id,
        ctx: &Context,
    ) -> Result<api::Notification, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::MarkNotificationRead {
                notification_id: id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks every `Notification` of the current `User` as read.
    ///
    /// Returns the number of affected `Notification`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markAllNotificationsRead",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_all_notifications_read(
        ctx: &Context,
    ) -> Result<i32, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let marked = ctx
            .service()
            .execute(command::MarkAllNotificationsRead {
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        i32::try_from(marked)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Removes the `Notification` with the specified ID.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteNotification",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_notification(
        id: api::notification::Id,
        ctx: &Context,
    ) -> Result<api::Notification, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteNotification {
                notification_id: id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum QuoteResponseError {
        #[code = "REJECTION_REASON_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "Rejecting a `Quote` requires a `reason`"]
        ReasonRequired,
    }
}

define_error! {
    enum CatalogError {
        #[code = "NEGATIVE_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must not be negative"]
        NegativePrice,

        #[code = "CURRENCY_MISMATCH"]
        #[status = BAD_REQUEST]
        #[message = "Amount must be in the `Currency` of the `Quote`"]
        CurrencyMismatch,

        #[code = "MATERIAL_CODE_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "`MaterialCode` is used by another `Material`"]
        CodeOccupied,

        #[code = "QUOTE_NOT_EDITABLE"]
        #[status = CONFLICT]
        #[message = "`Quote` may be edited in `DRAFT` status only"]
        NotEditable,
    }
}

define_error! {
    enum ManagementError {
        #[code = "USER_MANAGEMENT_NOT_ALLOWED"]
        #[status = FORBIDDEN]
        #[message = "`User` may manage lower ranked `User`s only"]
        NotAllowed,

        #[code = "OWN_ACCOUNT"]
        #[status = CONFLICT]
        #[message = "`User` cannot deactivate or remove their own account"]
        OwnAccount,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOGIN_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserLogin` is occupied by another \
                             `User`"]
                LoginOccupied,

                #[code = "USER_CREATION_NOT_ALLOWED"]
                #[status = FORBIDDEN]
                #[message = "Only an `ADMIN` may create `User`s with a \
                             `UserRole` not higher than theirs"]
                NotAllowed,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Hashing(_) => None,
            Self::LoginOccupied(_) => Some(Error::LoginOccupied.into()),
            Self::NotAllowed | Self::UserNotExists(_) => {
                Some(Error::NotAllowed.into())
            }
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
            Self::UserDeactivated(_) => {
                Some(context::AuthError::Deactivated.into())
            }
        }
    }
}

impl AsError for command::update_user_password::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_PASSWORD"]
                #[status = CONFLICT]
                #[message = "Provided `old_password` does not match the \
                             current `User` password"]
                WrongPassword,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Hashing(_) | Self::UserNotExists(_) => None,
            Self::WrongPassword => Some(Error::WrongPassword.into()),
        }
    }
}

impl AsError for command::update_user_role::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROLE_CHANGE_NOT_ALLOWED"]
                #[status = FORBIDDEN]
                #[message = "`User` may change `UserRole`s of lower ranked \
                             `User`s only"]
                NotAllowed,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotAllowed => Some(Error::NotAllowed.into()),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOGIN_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserLogin` is occupied by another \
                             `User`"]
                LoginOccupied,

                #[code = "USER_UPDATE_NOT_ALLOWED"]
                #[status = FORBIDDEN]
                #[message = "`User` may update their own profile or the \
                             ones of lower ranked `User`s only"]
                NotAllowed,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LoginOccupied(_) => Some(Error::LoginOccupied.into()),
            Self::NotAllowed => Some(Error::NotAllowed.into()),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::set_user_activity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotAllowed => Some(ManagementError::NotAllowed.into()),
            Self::OwnAccount => Some(ManagementError::OwnAccount.into()),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotAllowed => Some(ManagementError::NotAllowed.into()),
            Self::OwnAccount => Some(ManagementError::OwnAccount.into()),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => {
                Some(api::query::ClientError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => {
                Some(api::query::ClientError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_representative::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => {
                Some(api::query::ClientError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_representative::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RepresentativeNotExists(_) => {
                Some(api::query::RepresentativeError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_representative::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RepresentativeNotExists(_) => {
                Some(api::query::RepresentativeError::NotExists.into())
            }
        }
    }
}

impl AsError for command::create_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CodeOccupied(_) => Some(CatalogError::CodeOccupied.into()),
            Self::NegativePrice(_) => Some(CatalogError::NegativePrice.into()),
        }
    }
}

impl AsError for command::update_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CodeOccupied(_) => Some(CatalogError::CodeOccupied.into()),
            Self::MaterialNotExists(_) => {
                Some(api::query::MaterialError::NotExists.into())
            }
            Self::NegativePrice(_) => Some(CatalogError::NegativePrice.into()),
        }
    }
}

impl AsError for command::delete_material::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MATERIAL_LENT"]
                #[status = CONFLICT]
                #[message = "Lent `Material` cannot be removed"]
                MaterialLent,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MaterialLent(_) => Some(Error::MaterialLent.into()),
            Self::MaterialNotExists(_) => {
                Some(api::query::MaterialError::NotExists.into())
            }
        }
    }
}

impl AsError for command::register_maintenance::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NO_MAINTENANCE_SCHEDULE"]
                #[status = CONFLICT]
                #[message = "`Material` has no `MaintenanceSchedule`"]
                NoSchedule,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MaterialNotExists(_) => {
                Some(api::query::MaterialError::NotExists.into())
            }
            Self::NoSchedule(_) => Some(Error::NoSchedule.into()),
        }
    }
}

impl AsError for command::create_quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NEGATIVE_TRAVEL_EXPENSES"]
                #[status = BAD_REQUEST]
                #[message = "Travel expenses must not be negative"]
                NegativeTravelExpenses,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => {
                Some(api::query::ClientError::NotExists.into())
            }
            Self::CurrencyMismatch(_) => {
                Some(CatalogError::CurrencyMismatch.into())
            }
            Self::NegativeTravelExpenses(_) => {
                Some(Error::NegativeTravelExpenses.into())
            }
            Self::RepresentativeNotExists(_) => {
                Some(api::query::RepresentativeError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NEGATIVE_TRAVEL_EXPENSES"]
                #[status = BAD_REQUEST]
                #[message = "Travel expenses must not be negative"]
                NegativeTravelExpenses,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => {
                Some(api::query::ClientError::NotExists.into())
            }
            Self::CurrencyMismatch(_) => {
                Some(CatalogError::CurrencyMismatch.into())
            }
            Self::NegativeTravelExpenses(_) => {
                Some(Error::NegativeTravelExpenses.into())
            }
            Self::NotEditable(_) => Some(CatalogError::NotEditable.into()),
            Self::QuoteNotExists(_) => {
                Some(api::query::QuoteError::NotExists.into())
            }
            Self::RepresentativeNotExists(_) => {
                Some(api::query::RepresentativeError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "QUOTE_NOT_DRAFT"]
                #[status = CONFLICT]
                #[message = "Only a `DRAFT` `Quote` may be removed"]
                NotDraft,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotDraft(_) => Some(Error::NotDraft.into()),
            Self::QuoteNotExists(_) => {
                Some(api::query::QuoteError::NotExists.into())
            }
        }
    }
}

impl AsError for command::add_quote_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CurrencyMismatch(_) => {
                Some(CatalogError::CurrencyMismatch.into())
            }
            Self::MaterialNotExists(_) => {
                Some(api::query::MaterialError::NotExists.into())
            }
            Self::NegativePrice(_) => Some(CatalogError::NegativePrice.into()),
            Self::NotEditable(_) => Some(CatalogError::NotEditable.into()),
            Self::QuoteNotExists(_) => {
                Some(api::query::QuoteError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_quote_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CurrencyMismatch(_) => {
                Some(CatalogError::CurrencyMismatch.into())
            }
            Self::ItemNotExists(_) => {
                Some(api::query::QuoteError::ItemNotExists.into())
            }
            Self::MaterialNotExists(_) => {
                Some(api::query::MaterialError::NotExists.into())
            }
            Self::NegativePrice(_) => Some(CatalogError::NegativePrice.into()),
            Self::NotEditable(_) => Some(CatalogError::NotEditable.into()),
        }
    }
}

impl AsError for command::remove_quote_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ItemNotExists(_) => {
                Some(api::query::QuoteError::ItemNotExists.into())
            }
            Self::NotEditable(_) => Some(CatalogError::NotEditable.into()),
        }
    }
}

impl AsError for command::send_quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_NOT_SENT"]
                #[status = BAD_GATEWAY]
                #[message = "`Quote` is marked as sent, but failed to \
                             deliver the email"]
                EmailNotSent,

                #[code = "QUOTE_HAS_NO_ITEMS"]
                #[status = CONFLICT]
                #[message = "`Quote` without `QuoteItem`s cannot be sent"]
                NoItems,

                #[code = "NO_RECIPIENT"]
                #[status = BAD_REQUEST]
                #[message = "Neither a recipient email is provided, nor the \
                             `Client` has one"]
                NoRecipient,

                #[code = "WRONG_QUOTE_STATUS"]
                #[status = CONFLICT]
                #[message = "Only a `DRAFT` or `SENT` `Quote` may be sent"]
                WrongStatus,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Mailer(_) => Some(Error::EmailNotSent.into()),
            Self::NoItems(_) => Some(Error::NoItems.into()),
            Self::NoRecipient => Some(Error::NoRecipient.into()),
            Self::QuoteNotExists(_) => {
                Some(api::query::QuoteError::NotExists.into())
            }
            Self::WrongStatus(_) => Some(Error::WrongStatus.into()),
        }
    }
}

impl AsError for command::change_quote_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SENDING_REQUIRED"]
                #[status = BAD_REQUEST]
                #[message = "`Quote` becomes `SENT` by sending it only"]
                SendingRequired,

                #[code = "WRONG_QUOTE_STATUS_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Quote` cannot move into the requested \
                             `QuoteStatus`"]
                WrongTransition,

                #[code = "USAGE_HOURS_OVERFLOW"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "Accumulated usage hours of a `Material` are \
                             too large"]
                UsageOverflow,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::QuoteNotExists(_) => {
                Some(api::query::QuoteError::NotExists.into())
            }
            Self::SendingRequired => Some(Error::SendingRequired.into()),
            Self::WrongTransition { .. } => {
                Some(Error::WrongTransition.into())
            }
            Self::UsageOverflow(_) => Some(Error::UsageOverflow.into()),
        }
    }
}

impl AsError for command::respond_to_quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_QUOTE_TOKEN"]
                #[status = NOT_FOUND]
                #[message = "No `Quote` is shared with the provided \
                             `QuoteToken`"]
                InvalidToken,

                #[code = "QUOTE_NOT_AWAITING_RESPONSE"]
                #[status = CONFLICT]
                #[message = "`Quote` doesn't accept responses anymore"]
                NotAwaitingResponse,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidToken => Some(Error::InvalidToken.into()),
            Self::NotAwaitingResponse(_) => {
                Some(Error::NotAwaitingResponse.into())
            }
        }
    }
}

impl AsError for command::assign_job::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_ALREADY_ASSIGNED"]
                #[status = CONFLICT]
                #[message = "Employee is already assigned to the `QuoteItem`"]
                AlreadyAssigned,

                #[code = "NOT_LABOR_ITEM"]
                #[status = BAD_REQUEST]
                #[message = "`Job`s may be assigned to labor `QuoteItem`s \
                             only"]
                NotLabor,

                #[code = "QUOTE_NOT_APPROVED"]
                #[status = CONFLICT]
                #[message = "`Job`s may be assigned on `APPROVED` `Quote`s \
                             only"]
                QuoteNotApproved,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::AlreadyAssigned(_) => Some(Error::AlreadyAssigned.into()),
            Self::ItemNotExists(_) => {
                Some(api::query::QuoteError::ItemNotExists.into())
            }
            Self::NotLabor(_) => Some(Error::NotLabor.into()),
            Self::QuoteNotApproved(_) => Some(Error::QuoteNotApproved.into()),
            Self::UserNotExists(_) => {
                Some(api::query::UserError::NotExists.into())
            }
        }
    }
}

impl AsError for command::unassign_job::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JobNotExists(_) => {
                Some(api::query::JobError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_job::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "JOB_UPDATE_NOT_ALLOWED"]
                #[status = FORBIDDEN]
                #[message = "Employees may update their own `Job`s only"]
                NotAllowed,

                #[code = "WRONG_JOB_STATUS_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Job` cannot move into the requested \
                             `JobStatus`"]
                WrongTransition,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JobNotExists(_) => {
                Some(api::query::JobError::NotExists.into())
            }
            Self::NotAllowed | Self::UserNotExists(_) => {
                Some(Error::NotAllowed.into())
            }
            Self::WrongTransition { .. } => {
                Some(Error::WrongTransition.into())
            }
        }
    }
}

impl AsError for command::create_loan::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MATERIAL_ALREADY_LENT"]
                #[status = CONFLICT]
                #[message = "`Material` is lent already"]
                AlreadyLent,

                #[code = "MATERIAL_INACTIVE"]
                #[status = CONFLICT]
                #[message = "Inactive `Material` cannot be lent"]
                MaterialInactive,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::AlreadyLent(_) => Some(Error::AlreadyLent.into()),
            Self::InvalidPeriod => Some(LoanPeriodError::Invalid.into()),
            Self::MaterialInactive(_) => Some(Error::MaterialInactive.into()),
            Self::MaterialNotExists(_) => {
                Some(api::query::MaterialError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_loan::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidPeriod => Some(LoanPeriodError::Invalid.into()),
            Self::LoanNotExists(_) => {
                Some(api::query::LoanError::NotExists.into())
            }
        }
    }
}

impl AsError for command::return_loan::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LoanNotExists(_) => {
                Some(api::query::LoanError::NotExists.into())
            }
            Self::MaterialNotExists(_) => None,
            Self::ReturnedBeforeIssued => {
                Some(LoanPeriodError::ReturnedBeforeIssued.into())
            }
        }
    }
}

define_error! {
    enum LoanPeriodError {
        #[code = "INVALID_LOAN_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "Due `Date` of a `Loan` must not precede its issue `Date`"]
        Invalid,

        #[code = "RETURNED_BEFORE_ISSUED"]
        #[status = BAD_REQUEST]
        #[message = "Return `Date` must not precede the issue `Date`"]
        ReturnedBeforeIssued,
    }
}

impl AsError for command::mark_notification_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotificationNotExists(_) => {
                Some(api::query::NotificationError::NotExists.into())
            }
        }
    }
}

impl AsError for command::mark_all_notifications_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_notification::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotificationNotExists(_) => {
                Some(api::query::NotificationError::NotExists.into())
            }
        }
    }
}
