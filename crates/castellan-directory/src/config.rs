//! Directory connection configuration.
//!
//! Loaded once at startup, validated, and threaded into constructors by
//! `Arc`; nothing in this crate reads configuration from ambient state.

use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Error raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("required environment variable {name} is not set")]
    MissingVariable { name: &'static str },

    /// A configuration value failed validation.
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Connection settings for the external directory.
#[derive(Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Directory URL, e.g. `ldap://directory.example.org:389`.
    pub url: String,

    /// DN used for the administrative bind of pooled sessions.
    pub bind_dn: String,

    /// Credential for the administrative bind.
    pub bind_password: String,

    /// Base DN of the directory tree.
    pub base_dn: String,

    /// Base DN under which user entries live, e.g. `ou=users,dc=example,dc=org`.
    pub user_base_dn: String,

    /// Base DN under which group entries live.
    pub group_base_dn: String,

    /// Dial timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl DirectoryConfig {
    /// Load from environment variables, fail-fast on missing values.
    ///
    /// Reads `LDAP_URL`, `LDAP_BIND_DN`, `LDAP_BIND_PASS`, `LDAP_BASE_DN`,
    /// `LDAP_USER_BASE_DN`, `LDAP_GROUP_BASE_DN` and the optional
    /// `LDAP_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            url: required_var("LDAP_URL")?,
            bind_dn: required_var("LDAP_BIND_DN")?,
            bind_password: required_var("LDAP_BIND_PASS")?,
            base_dn: required_var("LDAP_BASE_DN")?,
            user_base_dn: required_var("LDAP_USER_BASE_DN")?,
            group_base_dn: required_var("LDAP_GROUP_BASE_DN")?,
            connect_timeout_secs: match env::var("LDAP_CONNECT_TIMEOUT_SECS") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    message: format!("LDAP_CONNECT_TIMEOUT_SECS is not a number: {raw}"),
                })?,
                Err(_) => default_connect_timeout_secs(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the gateway cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Invalid {
                message: "directory url is required".to_string(),
            });
        }
        if self.bind_dn.is_empty() {
            return Err(ConfigError::Invalid {
                message: "administrative bind DN is required".to_string(),
            });
        }
        if self.base_dn.is_empty() {
            return Err(ConfigError::Invalid {
                message: "base DN is required".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &"***REDACTED***")
            .field("base_dn", &self.base_dn)
            .field("user_base_dn", &self.user_base_dn)
            .field("group_base_dn", &self.group_base_dn)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVariable { name }),
    }
}
