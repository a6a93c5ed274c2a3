// # Transport
//
// JSON request building and response classification for the QIP REST API.
//
// ## Request Contract
//
// - `Accept` and `Content-Type` are always `application/json`
// - A body is only sent when one was attached with `ApiRequest::json`
// - The session token travels in an `Authentication: Token <value>` header.
//   QIP expects `Authentication`, not `Authorization`.
//
// ## Response Contract
//
// The body is always drained into memory, so the classifier and the caller can
// both read it. Status codes are classified in this order:
//
// | Status            | Result                     |
// |-------------------|----------------------------|
// | 200-299           | `Ok(ApiResponse)`          |
// | 300-399           | `Error::UnexpectedRedirect`|
// | 401               | `Error::Unauthorized`      |
// | 404               | `Error::NotFound`          |
// | other 400-499     | `Error::Client`            |
// | 500-599 and other | `Error::Server`            |

use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::Client;
use crate::error::{Error, Result};

/// Header carrying the session token on authenticated requests
pub const AUTHENTICATION_HEADER: &str = "Authentication";

const JSON_MEDIA_TYPE: &str = "application/json";

/// A request to the QIP API, built before it is handed to [`Client::execute`]
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request without a body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach `body` serialized as JSON
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The serialized JSON body, `None` when the request carries no body
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// A fully buffered response from the QIP API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Assemble a response from its parts
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as a string, `None` if missing or not valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The raw body bytes
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body decoded as (lossy) UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON
    ///
    /// The body stays buffered, so this can be called repeatedly.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Best-effort `{"error": "..."}` message from the body
    ///
    /// Anything that does not parse yields an empty message.
    pub fn error_message(&self) -> String {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            error: Option<String>,
        }

        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_default()
    }
}

/// Classify a buffered response by status code
pub(crate) fn classify(response: ApiResponse) -> Result<ApiResponse> {
    match response.status().as_u16() {
        200..=299 => Ok(response),
        300..=399 => Err(Error::UnexpectedRedirect(Box::new(response))),
        401 => Err(Error::Unauthorized(Box::new(response))),
        404 => Err(Error::NotFound(Box::new(response))),
        400..=499 => Err(Error::Client {
            message: response.error_message(),
            response: Box::new(response),
        }),
        _ => Err(Error::Server {
            message: response.error_message(),
            response: Box::new(response),
        }),
    }
}

impl Client {
    /// Execute a request and classify the response
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: 2XX response with the body buffered
    /// - `Err(Error::Transport)`: the server was not reached or the body could not be read
    /// - `Err(..)`: one HTTP-status error kind, see the module table
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let ApiRequest { method, url, body } = request;

        tracing::debug!("QIP request: {} {}", method, url);

        let mut builder = self
            .http()
            .request(method.clone(), url.clone())
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE);

        if let Some(body) = body {
            builder = builder.body(body);
        }

        // ⚠️ never log this value
        if let Some(token) = self.token().await {
            builder = builder.header(AUTHENTICATION_HEADER, format!("Token {}", token));
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        classify(ApiResponse::from_parts(status, headers, body)).inspect_err(|e| {
            tracing::debug!("QIP request {} {} failed: {}", method, url, e);
        })
    }
}
