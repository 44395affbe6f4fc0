//! [`Error`]-related definitions.

use std::{fmt, num::TryFromIntError};

use axum_extra::typed_header::TypedHeaderRejection;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(1);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| {
            tracing::error!("unexpected error: {self}");
            Error::internal(&self)
        })
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for TypedHeaderRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "BAD_REQUEST",
            status_code: http::StatusCode::BAD_REQUEST,
            message: self.to_string(),
            backtrace: None,
        })
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        let constraint = self.duplicated_constraint()?;
        Some(
            match constraint {
                "users_login_idx" => DuplicateError::Login,
                "materials_code_idx" => DuplicateError::MaterialCode,
                "jobs_employee_item_key" => DuplicateError::Job,
                "loans_material_id_key" => DuplicateError::Loan,
                _ => DuplicateError::Other,
            }
            .into(),
        )
    }
}

define_error! {
    enum DuplicateError {
        #[code = "LOGIN_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "`UserLogin` is occupied by another `User`"]
        Login,

        #[code = "MATERIAL_CODE_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "`MaterialCode` is used by another `Material`"]
        MaterialCode,

        #[code = "JOB_ALREADY_ASSIGNED"]
        #[status = CONFLICT]
        #[message = "Employee is already assigned to the `QuoteItem`"]
        Job,

        #[code = "MATERIAL_ALREADY_LENT"]
        #[status = CONFLICT]
        #[message = "`Material` is lent already"]
        Loan,

        #[code = "CONFLICT"]
        #[status = CONFLICT]
        #[message = "Conflicting concurrent modification, try again"]
        Other,
    }
}

impl AsError for TryFromIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, IntoFieldError, Value};

    use crate::define_error;

    use super::{AsError as _, Error};

    define_error! {
        enum QuoteError {
            #[code = "QUOTE_NOT_EDITABLE"]
            #[status = CONFLICT]
            #[message = "`Quote` may be edited in `DRAFT` status only"]
            NotEditable,
        }
    }

    #[test]
    fn converts_defined_errors() {
        let err = Error::from(QuoteError::NotEditable);

        assert_eq!(err.code, "QUOTE_NOT_EDITABLE");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(
            err.to_string(),
            "[QUOTE_NOT_EDITABLE]: `Quote` may be edited in `DRAFT` status \
             only",
        );
    }

    #[test]
    fn falls_back_to_internal_error() {
        let err = i32::try_from(u64::MAX).unwrap_err().into_error();

        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(err.status_code, http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn exposes_code_in_extensions() {
        let field = IntoFieldError::<DefaultScalarValue>::into_field_error(
            Error::from(QuoteError::NotEditable),
        );

        assert_eq!(
            field.message(),
            "`Quote` may be edited in `DRAFT` status only",
        );
        assert_eq!(
            field
                .extensions()
                .as_object_value()
                .and_then(|ext| ext.get_field_value("code")),
            Some(&Value::scalar("QUOTE_NOT_EDITABLE".to_owned())),
        );
    }
}
