//! [`IdentityProvider`] implementation backed by the Firebase Identity
//! Toolkit REST API.

use std::{sync::Arc, time::Duration};

use common::{
    datetime::serde::unix_millis,
    operations::{Insert, Subscribe, Update},
    DateTimeOf,
};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracerr::Traced;
use tracing as log;

use crate::domain::{session::Uid, Session};

use super::{
    memory::pushes, Account, AuthState, Consent, Credentials, Error,
    Federated, IdentityProvider, Profile, Pushes, SignIn, SignOut,
};

/// [`IdentityProvider`] backed by the Firebase Identity Toolkit REST API.
#[derive(Clone, Debug)]
pub struct Firebase {
    /// Shared state of this [`Firebase`] provider.
    inner: Arc<Inner>,
}

/// Shared state of a [`Firebase`] provider.
#[derive(Debug)]
struct Inner {
    /// Client performing requests.
    client: Client,

    /// Base [`Url`] of the Identity Toolkit API.
    endpoint: Url,

    /// Web API key of the Firebase project.
    api_key: SecretString,

    /// ID token of the signed-in account.
    token: Mutex<Option<SecretString>>,

    /// Current authentication state.
    state: watch::Sender<Option<Session>>,

    /// [`Consent`] flow of federated sign-ins.
    consent: Option<Arc<dyn Consent>>,
}

impl Firebase {
    /// Default base [`Url`] of the Identity Toolkit API.
    pub const ENDPOINT: &'static str =
        "https://identitytoolkit.googleapis.com/v1/";

    /// URI the federated credentials are claimed to be issued for.
    const REQUEST_URI: &'static str = "http://localhost";

    /// Creates a new [`Firebase`] provider.
    ///
    /// # Errors
    ///
    /// - If the `endpoint` cannot have path segments.
    /// - If the HTTP client cannot be initialized.
    pub fn new(
        endpoint: Url,
        api_key: SecretString,
        timeout: Duration,
        consent: Option<Arc<dyn Consent>>,
    ) -> Result<Self, Error> {
        if endpoint.cannot_be_a_base() {
            return Err(Error::Rejected(format!(
                "`{endpoint}` cannot be used as a base URL",
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                endpoint,
                api_key,
                token: Mutex::default(),
                state: watch::Sender::new(None),
                consent,
            }),
        })
    }

    /// Calls the `accounts:{method}` endpoint with the provided `body`.
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut url = self.inner.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            _ = path.pop_if_empty().push(&format!("accounts:{method}"));
        }
        log::debug!("POST {url}");

        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", self.inner.api_key.expose_secret())])
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        if response.status().is_success() {
            return response.json().await.map_err(Error::Transport);
        }

        let failure = response
            .json::<Failure>()
            .await
            .map_err(Error::Transport)?;
        Err(failure.into())
    }

    /// Looks up the account owning the provided ID token, remembers the
    /// token and pushes the resulting [`Session`].
    async fn establish(
        &self,
        token: SecretString,
    ) -> Result<Session, Traced<Error>> {
        let Lookup { users } = self
            .call(
                "lookup",
                &TokenRequest {
                    id_token: token.expose_secret(),
                },
            )
            .await
            .map_err(tracerr::wrap!())?;
        let session = users
            .into_iter()
            .next()
            .ok_or_else(|| Error::Rejected("USER_NOT_FOUND".into()))
            .and_then(UserInfo::into_session)
            .map_err(tracerr::wrap!())?;

        *self.inner.token.lock().await = Some(token);
        log::debug!("`{}` signed in", session.uid);
        _ = self.inner.state.send_replace(Some(session.clone()));
        Ok(session)
    }
}

impl IdentityProvider<SignIn<Credentials>> for Firebase {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        SignIn(creds): SignIn<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let Token { id_token } = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email: creds.email.as_ref(),
                    password: creds.password.expose_secret().as_str(),
                    return_secure_token: true,
                },
            )
            .await
            .map_err(tracerr::wrap!())?;
        self.establish(id_token).await
    }
}

impl IdentityProvider<SignIn<Federated>> for Firebase {
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

        let post_body = format!(
            "id_token={}&providerId={}",
            credential.id_token.expose_secret(),
            credential.provider_id,
        );
        let Token { id_token } = self
            .call(
                "signInWithIdp",
                &IdpRequest {
                    post_body: &post_body,
                    request_uri: Self::REQUEST_URI,
                    return_secure_token: true,
                },
            )
            .await
            .map_err(tracerr::wrap!())?;
        self.establish(id_token).await
    }
}

impl IdentityProvider<Insert<Account>> for Firebase {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(account): Insert<Account>,
    ) -> Result<Self::Ok, Self::Err> {
        let Token { id_token } = self
            .call(
                "signUp",
                &PasswordRequest {
                    email: account.email.as_ref(),
                    password: account.password.expose_secret().as_str(),
                    return_secure_token: true,
                },
            )
            .await
            .map_err(tracerr::wrap!())?;
        self.establish(id_token).await
    }
}

impl IdentityProvider<Update<Profile>> for Firebase {
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(profile): Update<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = self
            .inner
            .token
            .lock()
            .await
            .clone()
            .ok_or(Error::NotSignedIn)
            .map_err(tracerr::wrap!())?;

        let Token { id_token } = self
            .call(
                "update",
                &UpdateRequest {
                    id_token: token.expose_secret(),
                    display_name: profile.display_name.as_ref().map(AsRef::as_ref),
                    photo_url: profile.photo_url.as_ref().map(AsRef::as_ref),
                    return_secure_token: true,
                },
            )
            .await
            .map_err(tracerr::wrap!())?;
        self.establish(id_token).await
    }
}

impl IdentityProvider<SignOut> for Firebase {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: SignOut) -> Result<Self::Ok, Self::Err> {
        *self.inner.token.lock().await = None;
        if let Some(s) = self.inner.state.send_replace(None) {
            log::debug!("`{}` signed out", s.uid);
        }
        Ok(())
    }
}

impl IdentityProvider<Subscribe<AuthState>> for Firebase {
    type Ok = Pushes;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Subscribe<AuthState>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(pushes(self.inner.state.subscribe()))
    }
}

/// Request of the `signInWithPassword` and `signUp` methods.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'r> {
    email: &'r str,
    password: &'r str,
    return_secure_token: bool,
}

/// Request of the `signInWithIdp` method.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'r> {
    post_body: &'r str,
    request_uri: &'r str,
    return_secure_token: bool,
}

/// Request of the `update` method.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'r> {
    id_token: &'r str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'r str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<&'r str>,
    return_secure_token: bool,
}

/// Request of the `lookup` method.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'r> {
    id_token: &'r str,
}

/// Response carrying a fresh ID token.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Token {
    id_token: SecretString,
}

/// Response of the `lookup` method.
#[derive(Deserialize)]
struct Lookup {
    #[serde(default)]
    users: Vec<UserInfo>,
}

/// Account as described by the `lookup` method.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    #[serde(default, with = "optional_millis")]
    created_at: Option<DateTimeOf<()>>,
    #[serde(default, with = "optional_millis")]
    last_login_at: Option<DateTimeOf<()>>,
}

impl UserInfo {
    /// Converts this [`UserInfo`] into a [`Session`], dropping malformed
    /// optional fields.
    fn into_session(self) -> Result<Session, Error> {
        let uid = Uid::new(self.local_id)
            .ok_or_else(|| Error::Rejected("MISSING_LOCAL_ID".into()))?;
        Ok(Session {
            uid,
            display_name: self.display_name.and_then(|s| s.parse().ok()),
            email: self.email.and_then(|s| s.parse().ok()),
            photo_url: self.photo_url.and_then(|s| s.parse().ok()),
            created_at: self.created_at.map(DateTimeOf::coerce),
            last_login_at: self.last_login_at.map(DateTimeOf::coerce),
        })
    }
}

/// Error response of the Identity Toolkit API.
#[derive(Deserialize)]
struct Failure {
    error: FailureDetails,
}

/// Details of a [`Failure`].
#[derive(Deserialize)]
struct FailureDetails {
    message: String,
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        let message = failure.error.message;
        // Messages may carry a description: `WEAK_PASSWORD : Password ...`.
        let code = message
            .split([' ', ':'])
            .next()
            .unwrap_or_default();
        match code {
            "EMAIL_NOT_FOUND"
            | "INVALID_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_EMAIL"
            | "USER_DISABLED" => Self::InvalidCredentials,
            "EMAIL_EXISTS" => Self::EmailTaken,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => {
                Self::NotSignedIn
            }
            _ => Self::Rejected(message),
        }
    }
}

mod optional_millis {
    //! Optional variant of [`unix_millis`] (de)serialization.

    use common::DateTimeOf;
    use serde::{Deserialize, Deserializer};

    use super::unix_millis;

    /// Wrapper applying [`unix_millis`] to the inner value.
    #[derive(Deserialize)]
    struct Millis(#[serde(with = "unix_millis")] DateTimeOf<()>);

    /// Deserializes an optional [`DateTimeOf`] from milliseconds.
    pub(super) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTimeOf<()>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Millis>::deserialize(deserializer)?.map(|m| m.0))
    }
}
