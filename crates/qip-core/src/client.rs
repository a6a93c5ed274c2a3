// # QIP Client (session)
//
// Holds the base URL, the organization scope and the authentication token.
//
// ## Token Lifecycle
//
// - `login` clears the current token, then exchanges credentials for a new one
// - the token is valid for `TOKEN_LIFETIME_SECS` (enforced by the server)
// - there is no automatic refresh: an expired token surfaces as
//   `Error::Unauthorized` and the caller has to `login` again
//
// ## Security
//
// - The token and the password are never logged
// - The `Debug` implementation redacts the token

use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::ApiRequest;

/// Default HTTP timeout for API requests (20 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Lifetime requested for session tokens (10 minutes)
pub const TOKEN_LIFETIME_SECS: u32 = 10 * 60;

/// Response header carrying a fresh token after login
pub const LOGIN_TOKEN_HEADER: &str = "authentication";

/// Client for the QIP REST API
///
/// All operations take `&self`; the token is behind a `RwLock` so concurrent
/// requests can read it while `login` is the only writer.
pub struct Client {
    /// Validated base URL (e.g. `https://qip.example.com`)
    base_url: Url,

    /// Organization name, the tenant path segment
    org: String,

    /// Session token
    /// ⚠️ NEVER log this value
    token: RwLock<Option<String>>,

    /// HTTP client for API requests
    http: reqwest::Client,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("org", &self.org)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    expires: u32,
}

impl Client {
    /// Create a new client with the default timeout
    ///
    /// # Parameters
    ///
    /// - `base_url`: Base URL of the QIP server, must be `http` or `https`
    /// - `org`: Organization name inside QIP
    pub fn new(base_url: &str, org: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, org, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(base_url: &str, org: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base URL must be an http or https URL: {}",
                base_url
            )));
        }

        let org = org.into();
        if org.is_empty() {
            return Err(Error::config("organization name cannot be empty"));
        }

        // Redirects are not part of the API contract, 3XX must reach the classifier
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::config(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            org,
            token: RwLock::new(None),
            http,
        })
    }

    /// Create a client from a validated configuration (does not log in)
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Self::with_timeout(&config.server, config.org.clone(), config.request_timeout())
    }

    /// Seed the client with an existing token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        *self.token.get_mut() = (!token.is_empty()).then_some(token);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// A copy of the current token, `None` when unauthenticated
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Exchange credentials for a session token
    ///
    /// The previous token is cleared first, so a failed login never leaves a
    /// stale token behind.
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /api/login
    /// {"username": "...", "password": "...", "expires": 600}
    /// ```
    ///
    /// # Returns
    ///
    /// - `Ok(())`: token stored
    /// - `Err(Error::NoAuthToken)`: 2XX without an `authentication` header
    /// - `Err(..)`: transport or HTTP-status error
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let body = LoginRequest {
            username,
            password,
            expires: TOKEN_LIFETIME_SECS,
        };

        let request = ApiRequest::post(self.api_url(&["login"])?).json(&body)?;

        *self.token.write().await = None;

        let response = self.execute(request).await?;

        let token = response
            .header(LOGIN_TOKEN_HEADER)
            .filter(|token| !token.is_empty())
            .ok_or(Error::NoAuthToken)?
            .to_string();

        *self.token.write().await = Some(token);

        tracing::info!("Logged in to QIP as {} (org: {})", username, self.org);
        Ok(())
    }

    /// `<base>/api/<segments...>`
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("base URL cannot carry a path"))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// `<base>/api/v1/<org>/<segments...>`
    ///
    /// An empty trailing segment produces a trailing slash.
    pub fn tenant_url(&self, segments: &[&str]) -> Result<Url> {
        let mut path = Vec::with_capacity(segments.len() + 2);
        path.push("v1");
        path.push(self.org.as_str());
        path.extend_from_slice(segments);
        self.api_url(&path)
    }
}
