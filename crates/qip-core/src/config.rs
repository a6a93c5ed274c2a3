//! Configuration types for the QIP client
//!
//! Configuration is typed and validated here, at the boundary. Everything
//! past [`ClientConfig::validate`] only sees well-formed values.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_TIMEOUT;

/// Connection settings for one QIP backend
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the QIP server (e.g. `https://qip.example.com`)
    pub server: String,

    /// Organization name inside QIP
    pub org: String,

    /// Username for the REST API
    pub username: String,

    /// Password for the REST API
    /// ⚠️ NEVER log this value
    pub password: String,

    /// Timeout of each HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("org", &self.org)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with the default request timeout
    pub fn new(
        server: impl Into<String>,
        org: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            org: org.into(),
            username: username.into(),
            password: password.into(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Set the request timeout
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.server.is_empty()
            || self.org.is_empty()
            || self.username.is_empty()
            || self.password.is_empty()
        {
            return Err(crate::Error::config(
                "server, org, username and password must be set",
            ));
        }

        let url = url::Url::parse(&self.server)
            .map_err(|e| crate::Error::config(format!("server is not a valid URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(crate::Error::config(format!(
                "server must use http or https, got: {}",
                url.scheme()
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("request timeout must be > 0"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
