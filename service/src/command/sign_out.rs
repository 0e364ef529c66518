//! [`Command`] for signing the current account out.

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    infra::{identity, IdentityProvider},
    Service,
};

use super::Command;

/// [`Command`] for signing the current account out.
#[derive(Clone, Copy, Debug)]
pub struct SignOut;

impl<Idp, Api> Command<SignOut> for Service<Idp, Api>
where
    Idp: IdentityProvider<
        identity::SignOut,
        Ok = (),
        Err = Traced<identity::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: SignOut) -> Result<Self::Ok, Self::Err> {
        self.identity()
            .execute(identity::SignOut)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        self.session().publish(None);
        Ok(())
    }
}

/// Error of [`SignOut`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`IdentityProvider`] error.
    #[display("`IdentityProvider` operation failed: {_0}")]
    Identity(identity::Error),
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;
    use secrecy::SecretBox;

    use crate::{
        command::Command as _,
        domain::account::Password,
        infra::{api, identity, IdentityProvider as _},
        Service,
    };

    use super::SignOut;

    #[tokio::test]
    async fn clears_session() {
        let idp = identity::Memory::default();
        let session = idp
            .execute(Insert(identity::Account {
                email: "ada@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new(
                    Password::new("Secret1").unwrap(),
                )),
            }))
            .await
            .unwrap();
        let (svc, _) = Service::new(idp, api::Memory::default());
        svc.session().publish(Some(session));

        svc.execute(SignOut).await.unwrap();

        assert_eq!(svc.session().current(), None);
    }
}
