//! Account definitions shared by [`Session`]s and [`Partner`]s.
//!
//! [`Partner`]: super::Partner
//! [`Session`]: super::Session

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};

use super::Violations;

/// Email address of an account.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]{1,64}@[^\s@]+\.[^\s@]+$")
                .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Human-readable name of an account.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a new [`DisplayName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`DisplayName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for DisplayName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DisplayName`")
    }
}

/// Absolute URL of a picture.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct PhotoUrl(String);

impl PhotoUrl {
    /// Creates a new [`PhotoUrl`] if the given `url` is a well-formed
    /// absolute URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`PhotoUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        /// Regular expression checking an absolute URL: a scheme followed by
        /// a non-empty whitespace-free remainder.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:(//)?[^\s/][^\s]*$")
                .expect("valid regex")
        });

        let url = url.as_ref();
        url.len() <= 2048 && REGEX.is_match(url)
    }
}

impl FromStr for PhotoUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PhotoUrl`")
    }
}

/// Password of an account.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is not empty and
    /// not longer than 128 bytes.
    ///
    /// No strength rules are checked here, use [`Password::strength`] for
    /// that.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        !password.is_empty() && password.len() <= 128
    }

    /// Checks this [`Password`] against every [`StrengthRule`].
    ///
    /// # Errors
    ///
    /// Lists every violated [`StrengthRule`].
    pub fn strength(&self) -> Result<(), Violations<StrengthRule>> {
        let p = &self.0;
        let violated = [
            (StrengthRule::Uppercase, p.chars().any(char::is_uppercase)),
            (StrengthRule::Lowercase, p.chars().any(char::is_lowercase)),
            (
                StrengthRule::MinLength,
                p.chars().count() >= StrengthRule::MIN_LENGTH,
            ),
        ]
        .into_iter()
        .filter_map(|(rule, ok)| (!ok).then_some(rule));
        Violations::check(violated)
    }

    /// Returns the raw value of this [`Password`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Strength rule a new [`Password`] must satisfy.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StrengthRule {
    /// At least one uppercase letter.
    #[display("Password must contain at least one uppercase letter")]
    Uppercase,

    /// At least one lowercase letter.
    #[display("Password must contain at least one lowercase letter")]
    Lowercase,

    /// At least [`StrengthRule::MIN_LENGTH`] characters.
    #[display("Password must be at least 6 characters long")]
    MinLength,
}

impl StrengthRule {
    /// Minimal number of characters in a [`Password`].
    pub const MIN_LENGTH: usize = 6;
}

#[cfg(test)]
mod spec {
    use super::{DisplayName, Email, Password, PhotoUrl, StrengthRule};

    #[test]
    fn lists_every_violated_strength_rule() {
        let short = Password::new("short").unwrap();
        let violations = short.strength().unwrap_err();

        assert_eq!(
            violations.as_slice(),
            [StrengthRule::Uppercase, StrengthRule::MinLength],
        );
        assert_eq!(
            violations.to_string(),
            "Password must contain at least one uppercase letter; \
             Password must be at least 6 characters long",
        );

        assert_eq!(
            Password::new("ABC").unwrap().strength().unwrap_err().as_slice(),
            [StrengthRule::Lowercase, StrengthRule::MinLength],
        );
        assert!(Password::new("Secret1").unwrap().strength().is_ok());
    }

    #[test]
    fn rejects_empty_password() {
        assert!(Password::new("").is_none());
        assert!(Password::new("x".repeat(129)).is_none());
    }

    #[test]
    fn validates_email() {
        assert!(Email::new("demo@gmail.com").is_some());
        assert!(Email::new("demo@gmail").is_none());
        assert!(Email::new("de mo@gmail.com").is_none());
        assert!(Email::new("").is_none());
    }

    #[test]
    fn validates_display_name() {
        assert!(DisplayName::new("Ada").is_some());
        assert!(DisplayName::new(" Ada").is_none());
        assert!(DisplayName::new("").is_none());
    }

    #[test]
    fn validates_photo_url() {
        assert!(PhotoUrl::new("https://i.ibb.co/x.png").is_some());
        assert!(PhotoUrl::new("ftp://host/file").is_some());
        assert!(PhotoUrl::new("i.ibb.co/x.png").is_none());
        assert!(PhotoUrl::new("https://").is_none());
        assert!(PhotoUrl::new("https://a b").is_none());
    }
}
