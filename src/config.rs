//! Tap configuration and credential handling.

use thiserror::Error;

/// Environment variable holding the ActiveCampaign account API URL.
pub const API_URL_VAR: &str = "TAP_ACTIVECAMPAIGN_API_URL";

/// Environment variable holding the ActiveCampaign API token.
pub const API_TOKEN_VAR: &str = "TAP_ACTIVECAMPAIGN_API_TOKEN";

/// Start date scenarios run from unless they override it.
pub const DEFAULT_START_DATE: &str = "2021-12-01T00:00:00Z";

/// Errors raised while building a [`TapConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required connection credentials are absent.
    ///
    /// Fails setup before any scenario runs; the message lists every
    /// missing variable so a single run surfaces all of them.
    #[error("set {}", .0.join(", "))]
    MissingCredentials(Vec<String>),
}

/// Connection and replication configuration for one scenario.
///
/// Passed explicitly into each scenario rather than held as shared mutable
/// state, so scenarios with different start dates can run in any order and
/// in parallel.
#[derive(Debug, Clone)]
pub struct TapConfig {
    /// ActiveCampaign account API URL
    pub api_url: String,

    /// ActiveCampaign API token
    pub api_token: String,

    /// Tap `start_date` setting, in [`bookmark::START_DATE_FORMAT`]
    pub start_date: String,
}

impl TapConfig {
    /// Build a config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] if [`API_URL_VAR`] or
    /// [`API_TOKEN_VAR`] is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// The lookup receives each required variable name; `None` and empty
    /// values both count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |var: &str| match lookup(var).filter(|value| !value.is_empty()) {
            Some(value) => value,
            None => {
                missing.push(var.to_string());
                String::new()
            }
        };

        let api_url = require(API_URL_VAR);
        let api_token = require(API_TOKEN_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        Ok(Self {
            api_url,
            api_token,
            start_date: DEFAULT_START_DATE.to_string(),
        })
    }

    /// Re-run the scenario from a different start date.
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self
    }
}
