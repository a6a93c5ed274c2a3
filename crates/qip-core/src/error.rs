//! Error types for the QIP client
//!
//! Every failed call produces exactly one variant. HTTP-status failures carry
//! the buffered [`ApiResponse`] so callers can inspect status, headers and body.

use reqwest::StatusCode;
use thiserror::Error;

use crate::transport::ApiResponse;

/// Result type alias for QIP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the QIP client
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a complete response
    /// (connection refused, timeout, TLS failure, unreadable body)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Status 3XX, the API contract does not use redirects
    #[error("HTTP 3XX unexpected redirect")]
    UnexpectedRedirect(Box<ApiResponse>),

    /// Status 401, missing or expired token
    #[error("HTTP 401 authentication failed")]
    Unauthorized(Box<ApiResponse>),

    /// Status 404
    #[error("HTTP 404 not found")]
    NotFound(Box<ApiResponse>),

    /// Any other 4XX status
    #[error("HTTP 4XX client error{}", with_message(.message))]
    Client {
        /// Message from the `error` field of the body, empty if absent
        message: String,
        /// The buffered response
        response: Box<ApiResponse>,
    },

    /// Status 5XX (or any status outside the known ranges)
    #[error("HTTP 5XX server error{}", with_message(.message))]
    Server {
        /// Message from the `error` field of the body, empty if absent
        message: String,
        /// The buffered response
        response: Box<ApiResponse>,
    },

    /// Login succeeded but no token was returned in the `authentication` header
    #[error("no authentication token was returned in header")]
    NoAuthToken,

    /// Address selection succeeded but returned no address
    #[error("no object address was returned")]
    NoSelection,

    /// More than one stored record matches an identity token
    #[error("non unique RR found")]
    NonUniqueRecord,

    /// An operation that addresses a single object was given an empty id
    #[error("can not load object with empty id")]
    IdRequired,

    /// Address and subnet must both be set before create/update
    #[error("objectAddr and subnetAddr are required")]
    BothAddressesRequired,

    /// Object name must be set before create/update
    #[error("objectName is required")]
    NameRequired,

    /// Identity token could not be decoded
    #[error("invalid identity token: {0}")]
    InvalidIdentity(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be parsed or extended
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

fn with_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid identity error
    pub fn invalid_identity(msg: impl Into<String>) -> Self {
        Self::InvalidIdentity(msg.into())
    }

    /// The buffered response for HTTP-status errors
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::UnexpectedRedirect(response)
            | Self::Unauthorized(response)
            | Self::NotFound(response)
            | Self::Client { response, .. }
            | Self::Server { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The HTTP status code for HTTP-status errors
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|response| response.status())
    }

    /// True for a 404 from the server, which callers usually treat as "absent"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True when the server was never reached or the response was incomplete
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
