//! [`Command`] for registering a new account.

use common::operations::{Insert, Update};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        account::{DisplayName, Password, PhotoUrl, StrengthRule},
        Email, Session, Violations,
    },
    infra::{
        identity::{self, Account, Profile},
        IdentityProvider,
    },
    Service,
};

use super::Command;

/// [`Command`] for registering a new account and signing it in.
#[derive(Clone, Debug)]
pub struct RegisterAccount {
    /// [`DisplayName`] of the new account.
    pub name: DisplayName,

    /// [`Email`] of the new account.
    pub email: Email,

    /// [`Password`] of the new account.
    pub password: SecretBox<Password>,

    /// [`PhotoUrl`] of the new account avatar, if any.
    pub photo_url: Option<PhotoUrl>,
}

impl<Idp, Api> Command<RegisterAccount> for Service<Idp, Api>
where
    Idp: IdentityProvider<
            Insert<Account>,
            Ok = Session,
            Err = Traced<identity::Error>,
        > + IdentityProvider<
            Update<Profile>,
            Ok = Session,
            Err = Traced<identity::Error>,
        >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterAccount,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterAccount {
            name,
            email,
            password,
            photo_url,
        } = cmd;

        password
            .expose_secret()
            .strength()
            .map_err(|v| tracerr::new!(E::WeakPassword(v)))?;

        let created = self
            .identity()
            .execute(Insert(Account { email, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::debug!("registered `{}` account", created.uid);

        let session = self
            .identity()
            .execute(Update(Profile {
                display_name: Some(name),
                photo_url,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        self.session().publish(Some(session.clone()));

        Ok(session)
    }
}

/// Error of [`RegisterAccount`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`IdentityProvider`] error.
    #[display("`IdentityProvider` operation failed: {_0}")]
    #[from]
    Identity(identity::Error),

    /// [`Password`] is too weak.
    #[display("{_0}")]
    WeakPassword(Violations<StrengthRule>),
}
