//! Access-layer configuration.
//!
//! Fields with defaults can be omitted when loading from environment
//! variables or configuration files.

use serde::{Deserialize, Serialize};

/// Where the token is kept and which paths the guard redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Storage key of the persisted bearer token.
    /// Default: "userToken"
    #[serde(default = "default_token_key")]
    token_key: String,
    /// Path of the login screen.
    /// Default: "/login"
    #[serde(default = "default_login_path")]
    login_path: String,
    /// Path of the (protected) home screen.
    /// Default: "/"
    #[serde(default = "default_home_path")]
    home_path: String,
}

fn default_token_key() -> String {
    "userToken".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

impl AccessConfig {
    /// Returns the storage key of the persisted token.
    #[must_use]
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Returns the login path.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Returns the home path.
    #[must_use]
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    /// Sets the storage key of the persisted token.
    #[must_use]
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    /// Sets the login path.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the home path.
    #[must_use]
    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            login_path: default_login_path(),
            home_path: default_home_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_config_has_correct_defaults() {
        let config = AccessConfig::default();
        assert_eq!(config.token_key(), "userToken");
        assert_eq!(config.login_path(), "/login");
        assert_eq!(config.home_path(), "/");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AccessConfig =
            serde_json::from_str(r#"{"login_path": "/sign-in"}"#).expect("deserialize");
        assert_eq!(config.login_path(), "/sign-in");
        assert_eq!(config.token_key(), "userToken");
        assert_eq!(config.home_path(), "/");
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = AccessConfig::default()
            .with_token_key("token")
            .with_login_path("/auth")
            .with_home_path("/dashboard");
        assert_eq!(config.token_key(), "token");
        assert_eq!(config.login_path(), "/auth");
        assert_eq!(config.home_path(), "/dashboard");
    }
}
