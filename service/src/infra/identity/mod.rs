//! [`IdentityProvider`]-related implementations.
//!
//! Supported operations:
//! - [`SignIn`]`<`[`Credentials`]`>` and [`SignIn`]`<`[`Federated`]`>`
//!   resolving into a [`Session`];
//! - [`Insert`]`<`[`Account`]`>` creating and signing in a new account;
//! - [`Update`]`<`[`Profile`]`>` of the signed-in account;
//! - [`SignOut`];
//! - [`Subscribe`]`<`[`AuthState`]`>` resolving into [`Pushes`].

#[cfg(feature = "http")]
pub mod firebase;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
#[cfg(doc)]
use common::operations::{Insert, Subscribe, Update};
use derive_more::{Display, Error as StdError};
use futures::stream::BoxStream;
use secrecy::{SecretBox, SecretString};

use crate::domain::{
    account::{DisplayName, Password, PhotoUrl},
    Email, Session,
};

#[cfg(feature = "http")]
pub use self::firebase::Firebase;
pub use self::memory::Memory;

/// Identity provider operation.
pub use common::Handler as IdentityProvider;

/// Operation to sign in with the provided method.
#[derive(Clone, Copy, Debug)]
pub struct SignIn<M>(pub M);

/// Operation to sign the current account out.
#[derive(Clone, Copy, Debug)]
pub struct SignOut;

/// Email and password credentials of an account.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// [`Email`] of the account.
    pub email: Email,

    /// [`Password`] of the account.
    pub password: SecretBox<Password>,
}

/// Federated sign-in through the [`Consent`] flow of the provider.
#[derive(Clone, Copy, Debug)]
pub struct Federated;

/// New account to register.
#[derive(Clone, Debug)]
pub struct Account {
    /// [`Email`] of the new account.
    pub email: Email,

    /// [`Password`] of the new account.
    pub password: SecretBox<Password>,
}

/// Profile changes of the signed-in account.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    /// New [`DisplayName`], if any.
    pub display_name: Option<DisplayName>,

    /// New [`PhotoUrl`], if any.
    pub photo_url: Option<PhotoUrl>,
}

/// Authentication state of the provider, the subject of [`Subscribe`].
#[derive(Clone, Copy, Debug)]
pub struct AuthState;

/// Stream of authentication states pushed by an [`IdentityProvider`].
///
/// The first item is the state at the moment of subscription, every
/// following one is pushed on a sign-in or a sign-out.
pub type Pushes = BoxStream<'static, Option<Session>>;

/// Credential obtained from an interactive federated consent flow.
#[derive(Debug)]
pub struct FederatedCredential {
    /// ID of the federated provider, like `google.com`.
    pub provider_id: String,

    /// ID token issued by the federated provider.
    pub id_token: SecretString,
}

/// Interactive consent flow of a federated identity provider.
#[async_trait]
pub trait Consent: fmt::Debug + Send + Sync {
    /// Asks the user for consent.
    ///
    /// Resolves into [`None`] if the user dismisses the flow.
    async fn request(&self) -> Result<Option<FederatedCredential>, Error>;
}

/// [`IdentityProvider`] error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// Email and password pair is rejected.
    #[display("invalid email or password")]
    InvalidCredentials,

    /// Account with the email is registered already.
    #[display("email is registered already")]
    EmailTaken,

    /// Federated consent flow is dismissed by the user.
    #[display("federated sign-in is cancelled")]
    Cancelled,

    /// No account is signed in.
    #[display("no account is signed in")]
    NotSignedIn,

    /// Provider rejected the request for the described reason.
    #[display("identity provider rejected the request: {_0}")]
    Rejected(#[error(not(source))] String),

    /// [`Firebase`] transport error.
    #[cfg(feature = "http")]
    #[display("identity provider is unreachable: {_0}")]
    Transport(reqwest::Error),
}
