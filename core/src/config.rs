//! Endpoint and session configuration.
//!
//! # Design
//! Defaults point at the public fixture host the product ships against.
//! `Endpoints::at` re-roots every endpoint on another host, which is how the
//! integration tests and local development reach `mock-server`. The core never
//! reads the environment; hosts that want a config file deserialize a
//! `SessionConfig` from JSON.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://dimanyen.github.io";

pub const USER_FILE: &str = "man.json";
pub const FRIENDS_PRIMARY_FILE: &str = "friend1.json";
pub const FRIENDS_SECONDARY_FILE: &str = "friend2.json";
pub const FRIENDS_WITH_INVITES_FILE: &str = "friend3.json";
pub const FRIENDS_EMPTY_FILE: &str = "friend4.json";

/// Absolute URLs of every fixture endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub user: String,
    /// First half of the friends-only list.
    pub friends_primary: String,
    /// Second half of the friends-only list, merged over the first.
    pub friends_secondary: String,
    pub friends_with_invites: String,
    pub friends_empty: String,
}

impl Endpoints {
    /// Endpoints rooted at `base_url`, using the standard fixture file names.
    pub fn at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            user: format!("{base}/{USER_FILE}"),
            friends_primary: format!("{base}/{FRIENDS_PRIMARY_FILE}"),
            friends_secondary: format!("{base}/{FRIENDS_SECONDARY_FILE}"),
            friends_with_invites: format!("{base}/{FRIENDS_WITH_INVITES_FILE}"),
            friends_empty: format!("{base}/{FRIENDS_EMPTY_FILE}"),
        }
    }

    /// Check that every endpoint parses as an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("user", &self.user),
            ("friends_primary", &self.friends_primary),
            ("friends_secondary", &self.friends_secondary),
            ("friends_with_invites", &self.friends_with_invites),
            ("friends_empty", &self.friends_empty),
        ];
        for (name, value) in named {
            if Url::parse(value).is_err() {
                return Err(ConfigError::InvalidEndpoint {
                    name,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::at(DEFAULT_BASE_URL)
    }
}

/// Which fixture set a session loads. Fixed for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// No friends at all.
    Empty,
    /// Friends and sent invitations from two endpoints, merged.
    FriendsOnly,
    /// Friends plus received invitations from a single endpoint.
    FriendsWithInvites,
}

impl Scenario {
    /// The endpoints this scenario fetches, in merge order.
    pub fn endpoints<'a>(&self, endpoints: &'a Endpoints) -> Vec<&'a str> {
        match self {
            Scenario::Empty => vec![endpoints.friends_empty.as_str()],
            Scenario::FriendsOnly => vec![
                endpoints.friends_primary.as_str(),
                endpoints.friends_secondary.as_str(),
            ],
            Scenario::FriendsWithInvites => vec![endpoints.friends_with_invites.as_str()],
        }
    }
}

/// Everything a `FriendsSession` is constructed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub scenario: Scenario,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Publish `DisplayState::Failed` instead of `Empty` when a load fails.
    #[serde(default)]
    pub surface_errors: bool,
}

impl SessionConfig {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            endpoints: Endpoints::default(),
            surface_errors: false,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_surface_errors(mut self, surface_errors: bool) -> Self {
        self.surface_errors = surface_errors;
        self
    }

    /// Parse and validate a JSON session config.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(raw)?;
        config.endpoints.validate()?;
        Ok(config)
    }
}
