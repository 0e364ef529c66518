//! [`Config`]-related definitions.

use std::time;

use common::pagination::PageSize;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;
use service::infra::identity::Firebase;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote partner API configuration.
    pub api: Api,

    /// Identity provider configuration.
    pub identity: Identity,

    /// Partner listing configuration.
    pub listing: Listing,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Remote partner API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL every endpoint is relative to.
    #[default("http://localhost:5000/".to_owned())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Identity provider configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Identity {
    /// Base URL of the Identity Toolkit API.
    #[default(Firebase::ENDPOINT.to_owned())]
    pub endpoint: String,

    /// Web API key of the project.
    #[default(SecretString::from(""))]
    pub api_key: SecretString,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Partner listing configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Listing {
    /// Number of partners on a single page.
    #[default(8)]
    pub page_size: usize,
}

impl Listing {
    /// Returns the [`PageSize`] of this [`Listing`], falling back to the
    /// default one if zero is configured.
    #[must_use]
    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.page_size).unwrap_or_default()
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
