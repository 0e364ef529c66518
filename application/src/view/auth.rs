//! Authentication forms.

use derive_more::Display;
use secrecy::{ExposeSecret as _, SecretBox, SecretString};
use service::{
    command::{self, Command},
    domain::{
        account::{DisplayName, Password, PhotoUrl},
        Email, Session, Violations,
    },
};
use tracerr::Traced;
use tracing as log;

use crate::{
    error::{AuthError, ValidationError},
    route::Route,
    AsError, Error,
};

/// Login form.
#[derive(Debug)]
pub struct Login {
    /// Raw email.
    pub email: String,

    /// Raw password.
    pub password: SecretString,
}

impl Login {
    /// Signs in with this form, returning the [`Route`] to proceed to.
    ///
    /// The returned [`Route`] is the provided `from` one the visitor has been
    /// redirected from, if any, or [`Route::Home`] otherwise.
    ///
    /// # Errors
    ///
    /// - If any field is empty.
    /// - If the identity provider rejects the credentials.
    pub async fn submit<S>(
        &self,
        svc: &S,
        from: Option<Route>,
    ) -> Result<Route, Error>
    where
        S: Command<
            command::SignInWithPassword,
            Ok = Session,
            Err = Traced<command::sign_in_with_password::ExecutionError>,
        >,
    {
        let (email, password) =
            (self.email.trim(), self.password.expose_secret());
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::FieldsRequired.into());
        }
        let (Some(email), Some(password)) =
            (Email::new(email), Password::new(password))
        else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let session = svc
            .execute(command::SignInWithPassword {
                email,
                password: SecretBox::new(Box::new(password)),
            })
            .await
            .map_err(AsError::into_error)?;
        log::info!("`{}` signed in", session.uid);

        Ok(from.unwrap_or(Route::Home))
    }
}

/// Registration form.
#[derive(Debug)]
pub struct Register {
    /// Raw display name.
    pub name: String,

    /// Raw email.
    pub email: String,

    /// Raw password.
    pub password: SecretString,

    /// Raw avatar URL, may be empty.
    pub photo_url: String,
}

/// Rule of the [`Register`] form.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum RegisterRule {
    /// Name must be a valid display name.
    #[display("Name is invalid")]
    NameInvalid,

    /// Email must be well-formed.
    #[display("Email is invalid")]
    EmailInvalid,

    /// Avatar URL must be well-formed, if provided.
    #[display("Photo URL is invalid")]
    PhotoUrlInvalid,
}

impl Register {
    /// Registers a new account with this form and signs it in.
    ///
    /// # Errors
    ///
    /// - If any required field is empty.
    /// - If any field is invalid, or the password is weak, listing every
    ///   violation.
    /// - If the identity provider rejects the registration.
    pub async fn submit<S>(&self, svc: &S) -> Result<Session, Error>
    where
        S: Command<
            command::RegisterAccount,
            Ok = Session,
            Err = Traced<command::register_account::ExecutionError>,
        >,
    {
        let password = self.password.expose_secret();
        if [self.name.trim(), self.email.trim(), password]
            .iter()
            .any(|f| f.is_empty())
        {
            return Err(ValidationError::FieldsRequired.into());
        }

        let name = DisplayName::new(self.name.trim());
        let email = Email::new(self.email.trim());
        let photo_url = match self.photo_url.trim() {
            "" => Some(None),
            url => PhotoUrl::new(url).map(Some),
        };
        Violations::check(
            [
                (RegisterRule::NameInvalid, name.is_none()),
                (RegisterRule::EmailInvalid, email.is_none()),
                (RegisterRule::PhotoUrlInvalid, photo_url.is_none()),
            ]
            .into_iter()
            .filter_map(|(rule, violated)| violated.then_some(rule)),
        )
        .map_err(|v| Error::validation(&v))?;

        let (Some(name), Some(email), Some(photo_url), Some(password)) =
            (name, email, photo_url, Password::new(password))
        else {
            return Err(ValidationError::FieldsRequired.into());
        };

        let session = svc
            .execute(command::RegisterAccount {
                name,
                email,
                password: SecretBox::new(Box::new(password)),
                photo_url,
            })
            .await
            .map_err(AsError::into_error)?;
        log::info!("`{}` registered", session.uid);

        Ok(session)
    }
}

/// Signs in through the federated identity provider, returning the
/// [`Route`] to proceed to.
///
/// # Errors
///
/// If the consent flow is dismissed or the identity provider fails.
pub async fn google<S>(svc: &S, from: Option<Route>) -> Result<Route, Error>
where
    S: Command<
        command::SignInWithIdentityProvider,
        Ok = Session,
        Err = Traced<command::sign_in_with_identity_provider::ExecutionError>,
    >,
{
    let session = svc
        .execute(command::SignInWithIdentityProvider)
        .await
        .map_err(AsError::into_error)?;
    log::info!("`{}` signed in with identity provider", session.uid);

    Ok(from.unwrap_or(Route::Home))
}

/// Signs the current account out.
///
/// # Errors
///
/// If the identity provider fails.
pub async fn logout<S>(svc: &S) -> Result<(), Error>
where
    S: Command<
        command::SignOut,
        Ok = (),
        Err = Traced<command::sign_out::ExecutionError>,
    >,
{
    svc.execute(command::SignOut)
        .await
        .map_err(AsError::into_error)
}

#[cfg(test)]
mod spec {
    use secrecy::SecretString;
    use service::infra::api;

    use crate::{error::Kind, fixture, route::Route};

    use super::{logout, Login, Register};

    fn register(password: &str) -> Register {
        Register {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: SecretString::from(password),
            photo_url: String::new(),
        }
    }

    fn login(email: &str, password: &str) -> Login {
        Login {
            email: email.into(),
            password: SecretString::from(password),
        }
    }

    #[tokio::test]
    async fn login_requires_every_field() {
        let svc = fixture::service(api::Memory::default());

        for form in [login("", "Secret1"), login("ada@example.com", "")] {
            let err = form.submit(&svc, None).await.unwrap_err();

            assert_eq!(err.kind, Kind::Validation);
            assert_eq!(err.message, "Please fill in all fields.");
        }
    }

    #[tokio::test]
    async fn returns_to_guarded_route_after_login() {
        let svc = fixture::service(api::Memory::default());
        _ = register("Secret1").submit(&svc).await.unwrap();
        logout(&svc).await.unwrap();
        assert!(svc.session().current().is_none());

        let form = login("ada@example.com", "Secret1");
        let to = form.submit(&svc, Some(Route::Connections)).await.unwrap();
        assert_eq!(to, Route::Connections);

        let to = form.submit(&svc, None).await.unwrap();
        assert_eq!(to, Route::Home);
        assert!(svc.session().current().is_some());
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let svc = fixture::service(api::Memory::default());
        _ = register("Secret1").submit(&svc).await.unwrap();

        let err = login("ada@example.com", "Secret2")
            .submit(&svc, None)
            .await
            .unwrap_err();

        assert_eq!(err.code, "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn registration_lists_every_weak_password_rule() {
        let svc = fixture::service(api::Memory::default());

        let err = register("short").submit(&svc).await.unwrap_err();

        assert_eq!(err.kind, Kind::Validation);
        assert_eq!(err.message.lines().count(), 2);
        assert!(svc.session().current().is_none());
    }

    #[tokio::test]
    async fn registration_validates_fields_locally() {
        let svc = fixture::service(api::Memory::default());
        let form = Register {
            email: "not an email".into(),
            photo_url: "nope".into(),
            ..register("Secret1")
        };

        let err = form.submit(&svc).await.unwrap_err();

        assert_eq!(err.message, "Email is invalid\nPhoto URL is invalid");
    }

    #[tokio::test]
    async fn registration_signs_in() {
        let svc = fixture::service(api::Memory::default());

        let session = register("Secret1").submit(&svc).await.unwrap();

        assert_eq!(session.greeting_name(), "Ada");
        assert_eq!(svc.session().current(), Some(session));
    }
}
