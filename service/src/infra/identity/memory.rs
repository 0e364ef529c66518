//! In-memory [`IdentityProvider`] implementation.

use std::sync::Arc;

use common::{
    operations::{Insert, Subscribe, Update},
    DateTime,
};
use futures::{stream, StreamExt as _};
use secrecy::{ExposeSecret as _, SecretBox};
use tokio::sync::{watch, RwLock};
use tracerr::Traced;
use tracing as log;
use uuid::Uuid;

use crate::domain::{
    account::{DisplayName, Password},
    session::Uid,
    Email, Session,
};

use super::{
    Account, AuthState, Consent, Credentials, Error, Federated,
    IdentityProvider, Profile, Pushes, SignIn, SignOut,
};

/// In-memory [`IdentityProvider`] implementation.
#[derive(Clone, Debug)]
pub struct Memory {
    /// Shared state of this [`Memory`] provider.
    inner: Arc<Inner>,
}

/// Shared state of a [`Memory`] provider.
#[derive(Debug)]
struct Inner {
    /// Registered accounts.
    accounts: RwLock<Vec<Stored>>,

    /// Current authentication state.
    state: watch::Sender<Option<Session>>,

    /// [`Consent`] flow of federated sign-ins.
    consent: Option<Arc<dyn Consent>>,
}

/// Registered account of a [`Memory`] provider.
#[derive(Debug)]
struct Stored {
    /// Latest [`Session`] of the account.
    session: Session,

    /// [`Password`] of the account, if registered with one.
    password: Option<SecretBox<Password>>,

    /// Federated identity of the account, if registered through one.
    federated: Option<String>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Memory {
    /// Creates a new [`Memory`] provider with no accounts, signed out.
    #[must_use]
    pub fn new(consent: Option<Arc<dyn Consent>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                accounts: RwLock::default(),
                state: watch::Sender::new(None),
                consent,
            }),
        }
    }

    /// Registers a new account without signing it in.
    pub async fn register(
        &self,
        email: Email,
        password: Password,
        display_name: Option<DisplayName>,
    ) -> Session {
        let stored = Stored::new(Some(email), Some(password), display_name);
        let session = stored.session.clone();
        self.inner.accounts.write().await.push(stored);
        session
    }

    /// Marks the provided account as signed in and pushes it.
    fn sign_in(&self, stored: &mut Stored) -> Session {
        stored.session.last_login_at = Some(DateTime::now().coerce());
        let session = stored.session.clone();
        log::debug!("`{}` signed in", session.uid);
        _ = self.inner.state.send_replace(Some(session.clone()));
        session
    }
}

impl Stored {
    /// Creates a new [`Stored`] account with a random [`Uid`].
    fn new(
        email: Option<Email>,
        password: Option<Password>,
        display_name: Option<DisplayName>,
    ) -> Self {
        #[expect(clippy::missing_panics_doc, reason = "infallible")]
        let uid = Uid::new(Uuid::new_v4().simple().to_string())
            .expect("UUID is never blank");
        Self {
            session: Session {
                uid,
                display_name,
                email,
                photo_url: None,
                created_at: Some(DateTime::now().coerce()),
                last_login_at: None,
            },
            password: password.map(|p| SecretBox::new(Box::new(p))),
            federated: None,
        }
    }
}

impl IdentityProvider<SignIn<Credentials>> for Memory {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        SignIn(creds): SignIn<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut accounts = self.inner.accounts.write().await;
        let stored = accounts
            .iter_mut()
            .find(|a| {
                a.session.email.as_ref() == Some(&creds.email)
                    && a.password.as_ref().is_some_and(|p| {
                        p.expose_secret() == creds.password.expose_secret()
                    })
            })
            .ok_or(Error::InvalidCredentials)
            .map_err(tracerr::wrap!())?;
        Ok(self.sign_in(stored))
    }
}

impl IdentityProvider<SignIn<Federated>> for Memory {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: SignIn<Federated>,
    ) -> Result<Self::Ok, Self::Err> {
        let consent = self
            .inner
            .consent
            .as_ref()
            .ok_or_else(|| Error::Rejected("no consent flow".into()))
            .map_err(tracerr::wrap!())?;
        let credential = consent
            .request()
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(Error::Cancelled)
            .map_err(tracerr::wrap!())?;
        let identity = format!(
            "{}:{}",
            credential.provider_id,
            credential.id_token.expose_secret(),
        );

        let mut accounts = self.inner.accounts.write().await;
        if let Some(stored) = accounts
            .iter_mut()
            .find(|a| a.federated.as_deref() == Some(identity.as_str()))
        {
            return Ok(self.sign_in(stored));
        }

        let mut stored = Stored::new(None, None, None);
        stored.federated = Some(identity);
        let session = self.sign_in(&mut stored);
        accounts.push(stored);
        Ok(session)
    }
}

impl IdentityProvider<Insert<Account>> for Memory {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(account): Insert<Account>,
    ) -> Result<Self::Ok, Self::Err> {
        let Account { email, password } = account;

        let mut accounts = self.inner.accounts.write().await;
        if accounts.iter().any(|a| a.session.email.as_ref() == Some(&email)) {
            return Err(tracerr::new!(Error::EmailTaken));
        }

        let mut stored = Stored::new(
            Some(email),
            Some(password.expose_secret().clone()),
            None,
        );
        let session = self.sign_in(&mut stored);
        accounts.push(stored);
        Ok(session)
    }
}

impl IdentityProvider<Update<Profile>> for Memory {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(profile): Update<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let current = self
            .inner
            .state
            .borrow()
            .as_ref()
            .map(|s| s.uid.clone())
            .ok_or(Error::NotSignedIn)
            .map_err(tracerr::wrap!())?;

        let mut accounts = self.inner.accounts.write().await;
        let stored = accounts
            .iter_mut()
            .find(|a| a.session.uid == current)
            .ok_or(Error::NotSignedIn)
            .map_err(tracerr::wrap!())?;

        let Profile {
            display_name,
            photo_url,
        } = profile;
        if display_name.is_some() {
            stored.session.display_name = display_name;
        }
        if photo_url.is_some() {
            stored.session.photo_url = photo_url;
        }

        let session = stored.session.clone();
        _ = self.inner.state.send_replace(Some(session.clone()));
        Ok(session)
    }
}

impl IdentityProvider<SignOut> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: SignOut) -> Result<Self::Ok, Self::Err> {
        if let Some(s) = self.inner.state.send_replace(None) {
            log::debug!("`{}` signed out", s.uid);
        }
        Ok(())
    }
}

impl IdentityProvider<Subscribe<AuthState>> for Memory {
    type Ok = Pushes;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Subscribe<AuthState>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(pushes(self.inner.state.subscribe()))
    }
}

/// Turns the provided [`watch::Receiver`] into [`Pushes`] starting with its
/// current value.
pub(super) fn pushes(rx: watch::Receiver<Option<Session>>) -> Pushes {
    stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            rx.changed().await.ok()?;
        }
        let state = rx.borrow_and_update().clone();
        Some((state, (rx, false)))
    })
    .boxed()
}

#[cfg(test)]
mod spec {
    use std::sync::Arc;

    use async_trait::async_trait;
    use common::operations::{Insert, Subscribe, Update};
    use futures::StreamExt as _;
    use secrecy::{SecretBox, SecretString};

    use crate::{
        domain::account::{Password, PhotoUrl},
        infra::identity::{
            Account, AuthState, Consent, Credentials, Error, Federated,
            FederatedCredential, IdentityProvider as _, Profile, SignIn,
            SignOut,
        },
    };

    use super::Memory;

    fn password(raw: &str) -> SecretBox<Password> {
        SecretBox::new(Box::new(Password::new(raw).unwrap()))
    }

    #[derive(Debug)]
    struct Dismissed;

    #[async_trait]
    impl Consent for Dismissed {
        async fn request(&self) -> Result<Option<FederatedCredential>, Error> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct Granted;

    #[async_trait]
    impl Consent for Granted {
        async fn request(&self) -> Result<Option<FederatedCredential>, Error> {
            Ok(Some(FederatedCredential {
                provider_id: "google.com".into(),
                id_token: SecretString::from("token"),
            }))
        }
    }

    #[tokio::test]
    async fn signs_in_with_matching_credentials_only() {
        let idp = Memory::default();
        let email = "demo@gmail.com".parse().unwrap();
        let _ = idp
            .register(email, Password::new("Demo@123").unwrap(), None)
            .await;

        let session = idp
            .execute(SignIn(Credentials {
                email: "demo@gmail.com".parse().unwrap(),
                password: password("Demo@123"),
            }))
            .await
            .unwrap();
        assert!(session.last_login_at.is_some());

        let err = idp
            .execute(SignIn(Credentials {
                email: "demo@gmail.com".parse().unwrap(),
                password: password("wrong"),
            }))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn pushes_current_state_and_every_change() {
        let idp = Memory::default();
        let mut pushes = idp.execute(Subscribe(AuthState)).await.unwrap();

        assert_eq!(pushes.next().await, Some(None));

        let session = idp
            .execute(Insert(Account {
                email: "ada@example.com".parse().unwrap(),
                password: password("Secret1"),
            }))
            .await
            .unwrap();
        assert_eq!(pushes.next().await, Some(Some(session)));

        idp.execute(SignOut).await.unwrap();
        assert_eq!(pushes.next().await, Some(None));
    }

    #[tokio::test]
    async fn rejects_taken_email() {
        let idp = Memory::default();
        let account = || Account {
            email: "ada@example.com".parse().unwrap(),
            password: password("Secret1"),
        };

        let _ = idp.execute(Insert(account())).await.unwrap();
        let err = idp.execute(Insert(account())).await.unwrap_err();

        assert!(matches!(err.as_ref(), Error::EmailTaken));
    }

    #[tokio::test]
    async fn updates_profile_of_signed_in_account_only() {
        let idp = Memory::default();
        let profile = || Profile {
            display_name: Some("Ada".parse().unwrap()),
            photo_url: Some(PhotoUrl::new("https://i.ibb.co/a.png").unwrap()),
        };

        let err = idp.execute(Update(profile())).await.unwrap_err();
        assert!(matches!(err.as_ref(), Error::NotSignedIn));

        let _ = idp
            .execute(Insert(Account {
                email: "ada@example.com".parse().unwrap(),
                password: password("Secret1"),
            }))
            .await
            .unwrap();
        let session = idp.execute(Update(profile())).await.unwrap();

        assert_eq!(session.greeting_name(), "Ada");
        assert!(session.photo_url.is_some());
    }

    #[tokio::test]
    async fn follows_consent_flow_outcome() {
        let dismissed = Memory::new(Some(Arc::new(Dismissed)));
        let err = dismissed.execute(SignIn(Federated)).await.unwrap_err();
        assert!(matches!(err.as_ref(), Error::Cancelled));

        let granted = Memory::new(Some(Arc::new(Granted)));
        let first = granted.execute(SignIn(Federated)).await.unwrap();
        let second = granted.execute(SignIn(Federated)).await.unwrap();
        assert_eq!(first.uid, second.uid);
    }
}
