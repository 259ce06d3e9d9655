//! HTTP resource client: the single point of entry for all REST calls.
//!
//! ARCHITECTURAL RULE: No other module may issue HTTP requests directly.
//! Repositories build typed operations on top of `HttpClient::request`.
//!
//! Every failure is normalized into `ApiError`; nothing is retried.
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{ApiError, ApiResult, GENERIC_FAILURE_MESSAGE};
use crate::session::SessionStore;

pub mod multipart;

pub use multipart::{FilePart, MultipartBody};

const JSON_CONTENT_TYPE: &str = "application/json";

/// What to do with an authenticated call when the session holds no token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Fail with `Unauthenticated` without touching the network.
    #[default]
    Strict,
    /// Send the request anyway and let the server reject it.
    Forward,
}

impl FromStr for AuthPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(AuthPolicy::Strict),
            "forward" => Ok(AuthPolicy::Forward),
            other => anyhow::bail!("Unknown auth policy '{other}' (expected 'strict' or 'forward')"),
        }
    }
}

#[derive(Debug)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

/// Per-request options: query string, body, and whether to attach the session token.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub auth: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authed() -> Self {
        Self {
            auth: true,
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = Some(RequestBody::Multipart(body));
        self
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Verbatim `Authorization` response header; login returns the token here.
    pub authorization: Option<String>,
    /// Parsed JSON body; `Value::Null` when the body is empty or not JSON.
    pub body: Value,
}

/// Builds the shared connection pool. Without `timeout` the stack default applies.
pub fn build_client(timeout: Option<Duration>) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

/// Client bound to one service base URL. Clones share the connection pool and the session.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: SessionStore,
    auth_policy: AuthPolicy,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        session: SessionStore,
        auth_policy: AuthPolicy,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        Ok(Self::with_client(
            build_client(timeout)?,
            base_url,
            session,
            auth_policy,
        ))
    }

    /// Reuses an existing `reqwest::Client` (and its pool) for another service.
    pub fn with_client(
        client: Client,
        base_url: &str,
        session: SessionStore,
        auth_policy: AuthPolicy,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            auth_policy,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth_policy(&self) -> AuthPolicy {
        self.auth_policy
    }

    /// Issues a request and returns the parsed JSON body of a 2xx response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        self.send(method, path, options).await.map(|r| r.body)
    }

    /// Issues a request and returns status, `Authorization` header and body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method.clone(), &url);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }

        if options.auth {
            let session = self.session.current();
            if !session.is_authenticated() {
                match self.auth_policy {
                    AuthPolicy::Strict => {
                        warn!(%method, %path, "Refusing authenticated call without a session token");
                        return Err(ApiError::Unauthenticated);
                    }
                    AuthPolicy::Forward => {
                        debug!(%method, %path, "Forwarding authenticated call without a session token");
                    }
                }
            }
            builder = builder.header(AUTHORIZATION, session.token);
        }

        builder = match options.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart(body)) => builder.multipart(body.into_form()?),
            None => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
        };

        debug!(%method, %url, "Sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                warn!(%method, %url, error = %e, "Could not build request");
                ApiError::Validation(format!("invalid request: {e}"))
            } else {
                warn!(%method, %url, error = %e, "Transport failure");
                ApiError::Network
            }
        })?;

        let status = response.status();
        let authorization = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await.map_err(|e| {
            warn!(%method, %url, error = %e, "Failed to read response body");
            ApiError::Network
        })?;
        let body = parse_body(&text);

        if !status.is_success() {
            let message = error_message(&body);
            warn!(%method, %url, status = status.as_u16(), %message, "Request failed");
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        debug!(%method, %url, status = status.as_u16(), "Request succeeded");

        Ok(ApiResponse {
            status: status.as_u16(),
            authorization,
            body,
        })
    }
}

/// Parses a response body as JSON; empty or non-JSON bodies become `Value::Null`.
fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        debug!(error = %e, "Response body is not JSON");
        Value::Null
    })
}

/// Takes the server's `message` field, else the generic failure text.
fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
