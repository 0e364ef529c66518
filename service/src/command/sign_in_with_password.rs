//! [`Command`] for signing in with an email and a password.

use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;

use crate::{
    domain::{account::Password, Email, Session},
    infra::{
        identity::{self, Credentials, SignIn},
        IdentityProvider,
    },
    Service,
};

use super::Command;

/// [`Command`] for signing in with an [`Email`] and a [`Password`].
#[derive(Clone, Debug)]
pub struct SignInWithPassword {
    /// [`Email`] of the account.
    pub email: Email,

    /// [`Password`] of the account.
    pub password: SecretBox<Password>,
}

impl<Idp, Api> Command<SignInWithPassword> for Service<Idp, Api>
where
    Idp: IdentityProvider<
        SignIn<Credentials>,
        Ok = Session,
        Err = Traced<identity::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SignInWithPassword,
    ) -> Result<Self::Ok, Self::Err> {
        let SignInWithPassword { email, password } = cmd;

        let session = self
            .identity()
            .execute(SignIn(Credentials { email, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        self.session().publish(Some(session.clone()));

        Ok(session)
    }
}

/// Error of [`SignInWithPassword`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`IdentityProvider`] error.
    #[display("`IdentityProvider` operation failed: {_0}")]
    Identity(identity::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::Command as _,
        domain::account::Password,
        infra::{api, identity},
        Service,
    };

    use super::{ExecutionError, SignInWithPassword};

    fn cmd(password: &str) -> SignInWithPassword {
        SignInWithPassword {
            email: "demo@gmail.com".parse().unwrap(),
            password: SecretBox::new(Box::new(Password::new(password).unwrap())),
        }
    }

    #[tokio::test]
    async fn publishes_signed_in_session() {
        let idp = identity::Memory::default();
        _ = idp
            .register(
                "demo@gmail.com".parse().unwrap(),
                Password::new("Demo@123").unwrap(),
                Some("Demo".parse().unwrap()),
            )
            .await;
        let (svc, _) = Service::new(idp, api::Memory::default());

        let session = svc.execute(cmd("Demo@123")).await.unwrap();

        assert_eq!(session.greeting_name(), "Demo");
        assert_eq!(svc.session().current(), Some(session));
    }

    #[tokio::test]
    async fn rejects_invalid_credentials() {
        let (svc, _) =
            Service::new(identity::Memory::default(), api::Memory::default());

        let err = svc.execute(cmd("Demo@123")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Identity(identity::Error::InvalidCredentials),
        ));
        assert_eq!(svc.session().current(), None);
    }
}
