//! [`Command`] for signing in through a federated identity provider.

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::Session,
    infra::{
        identity::{self, Federated, SignIn},
        IdentityProvider,
    },
    Service,
};

#[cfg(doc)]
use crate::infra::identity::Consent;

use super::Command;

/// [`Command`] for signing in through the [`Consent`] flow of a federated
/// identity provider.
///
/// The resulting [`Session`] is published right away, without waiting for
/// the [`IdentityProvider`] to push it.
#[derive(Clone, Copy, Debug)]
pub struct SignInWithIdentityProvider;

impl<Idp, Api> Command<SignInWithIdentityProvider> for Service<Idp, Api>
where
    Idp: IdentityProvider<
        SignIn<Federated>,
        Ok = Session,
        Err = Traced<identity::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: SignInWithIdentityProvider,
    ) -> Result<Self::Ok, Self::Err> {
        let session = self
            .identity()
            .execute(SignIn(Federated))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        self.session().publish(Some(session.clone()));

        Ok(session)
    }
}

/// Error of [`SignInWithIdentityProvider`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`IdentityProvider`] error.
    #[display("`IdentityProvider` operation failed: {_0}")]
    Identity(identity::Error),
}
