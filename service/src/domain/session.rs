//! [`Session`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};

use super::account::{DisplayName, Email, PhotoUrl};

/// Locally held representation of the authenticated account.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    /// Unique identifier of the account.
    pub uid: Uid,

    /// [`DisplayName`] of the account, if any.
    pub display_name: Option<DisplayName>,

    /// [`Email`] of the account, if any.
    pub email: Option<Email>,

    /// [`PhotoUrl`] of the account avatar, if any.
    pub photo_url: Option<PhotoUrl>,

    /// [`DateTime`] when the account was created.
    pub created_at: Option<CreationDateTime>,

    /// [`DateTime`] when the account signed in last time.
    pub last_login_at: Option<LastLoginDateTime>,
}

impl Session {
    /// Returns the name to greet the account with: its [`DisplayName`],
    /// falling back to its [`Email`] and then its [`Uid`].
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_ref()
            .map(AsRef::<str>::as_ref)
            .or_else(|| self.email.as_ref().map(AsRef::<str>::as_ref))
            .unwrap_or(self.uid.as_ref())
    }
}

/// Unique identifier of an account assigned by an identity provider.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Uid(String);

impl Uid {
    /// Creates a new [`Uid`] if the given `uid` is not blank.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Option<Self> {
        let uid = uid.into();
        (!uid.trim().is_empty() && uid.len() <= 128).then_some(Self(uid))
    }
}

impl FromStr for Uid {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Uid`")
    }
}

/// [`DateTime`] when an account was created.
pub type CreationDateTime = DateTimeOf<(Session, unit::Creation)>;

/// [`DateTime`] when an account signed in last time.
pub type LastLoginDateTime = DateTimeOf<(Session, unit::LastLogin)>;
