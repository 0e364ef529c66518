//! [`Error`]-related definitions.

use std::fmt;

use derive_more::{Display, Error as StdError};
use itertools::Itertools as _;
use service::{
    command,
    domain::Violations,
    infra::{api, identity},
};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[kind = $kind:ident]
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
                            kind: $crate::error::Kind::$kind,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`Kind`] of this [`Error`].
    pub kind: Kind,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] representing an unexpected failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            kind: Kind::Internal,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Kind::Validation`] [`Error`] listing every violated
    /// rule.
    #[must_use]
    pub fn validation<R: fmt::Display>(violations: &Violations<R>) -> Self {
        Self {
            code: "VALIDATION_FAILED",
            kind: Kind::Validation,
            message: violations.as_slice().iter().join("\n"),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            kind: _,
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

/// [`Error`] code.
pub type Code = &'static str;

/// Kind of an [`Error`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Kind {
    /// Authentication failure.
    Auth,

    /// Input rejected before reaching the network.
    Validation,

    /// Remote side is unreachable or misbehaves.
    Transport,

    /// Requested entity doesn't exist.
    NotFound,

    /// Unexpected failure.
    Internal,
}

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
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
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

define_error! {
    enum AuthError {
        #[code = "INVALID_CREDENTIALS"]
        #[kind = Auth]
        #[message = "Invalid email or password."]
        InvalidCredentials,

        #[code = "EMAIL_TAKEN"]
        #[kind = Auth]
        #[message = "This email is already in use."]
        EmailTaken,

        #[code = "PROVIDER_CANCELLED"]
        #[kind = Auth]
        #[message = "Sign-in has been cancelled."]
        ProviderCancelled,

        #[code = "PROVIDER_FAILED"]
        #[kind = Auth]
        #[message = "Sign-in has failed, please try again."]
        ProviderFailed,

        #[code = "AUTHORIZATION_REQUIRED"]
        #[kind = Auth]
        #[message = "Please log in first."]
        AuthorizationRequired,
    }
}

define_error! {
    enum TransportError {
        #[code = "TRANSPORT_FAILED"]
        #[kind = Transport]
        #[message = "Something went wrong, please try again later."]
        TransportFailed,

        #[code = "NOT_ACKNOWLEDGED"]
        #[kind = Transport]
        #[message = "The change has not been saved."]
        NotAcknowledged,
    }
}

define_error! {
    enum ValidationError {
        #[code = "VALIDATION_FAILED"]
        #[kind = Validation]
        #[message = "Please fill in all fields."]
        FieldsRequired,
    }
}

define_error! {
    enum NotFoundError {
        #[code = "PARTNER_NOT_FOUND"]
        #[kind = NotFound]
        #[message = "No Partner Found !!!"]
        PartnerNotFound,
    }
}

impl AsError for identity::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::InvalidCredentials => AuthError::InvalidCredentials.into(),
            Self::EmailTaken => AuthError::EmailTaken.into(),
            Self::Cancelled => AuthError::ProviderCancelled.into(),
            Self::NotSignedIn => AuthError::AuthorizationRequired.into(),
            Self::Rejected(_) => AuthError::ProviderFailed.into(),
            Self::Transport(_) => TransportError::TransportFailed.into(),
        })
    }
}

impl AsError for api::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(TransportError::TransportFailed.into())
    }
}

impl AsError for command::sign_in_with_password::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Identity(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::sign_in_with_identity_provider::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Identity(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::register_account::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Identity(e) => e.try_as_error(),
            Self::WeakPassword(v) => Some(Error::validation(v)),
        }
    }
}

impl AsError for command::sign_out::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Identity(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_partner::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::NotAcknowledged => Some(TransportError::NotAcknowledged.into()),
        }
    }
}

impl AsError for command::update_partner::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_partner::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::NotDeleted(_) => Some(TransportError::NotAcknowledged.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{domain::account::Password, infra::identity};

    use super::{AsError as _, Error, Kind};

    #[test]
    fn maps_identity_errors_to_copy() {
        let err = identity::Error::InvalidCredentials.as_error();
        assert_eq!(err.code, "INVALID_CREDENTIALS");
        assert_eq!(err.kind, Kind::Auth);

        let err = identity::Error::Cancelled.as_error();
        assert_eq!(err.code, "PROVIDER_CANCELLED");

        let err = identity::Error::Rejected("OPERATION_NOT_ALLOWED".into())
            .as_error();
        assert_eq!(err.code, "PROVIDER_FAILED");
        assert!(!err.message.contains("OPERATION_NOT_ALLOWED"));
    }

    #[test]
    fn lists_every_violation() {
        let violations = Password::new("short").unwrap().strength().unwrap_err();

        let err = Error::validation(&violations);

        assert_eq!(err.kind, Kind::Validation);
        assert_eq!(
            err.message,
            "Password must contain at least one uppercase letter\n\
             Password must be at least 6 characters long",
        );
    }
}
