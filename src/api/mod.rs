//! HTTP client adapter for the task API.
//!
//! All task and auth calls go through [`ApiClient`], which owns the
//! cross-cutting request behavior:
//!
//! - **Authorization**: the current access token is read from the
//!   [`SessionStore`] for every outgoing request and sent as
//!   `Authorization: Bearer <token>`; public endpoints skip it
//! - **401**: the token is refreshed once (coalesced with any concurrent
//!   refresh) and the original request is retried once; a second 401 ends
//!   the session
//! - **403**: the session is cleared immediately, no refresh is attempted
//! - **Other failures**: mapped to [`ApiError`] with the server's `error`
//!   or `message` field when present
//!
//! Every terminal failure is reported to the [`Notifier`] exactly once,
//! here and nowhere else.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taskly::api::{ApiClient, ApiRequest};
//! use taskly::libs::task::TaskPage;
//!
//! let page: TaskPage = client
//!     .request(ApiRequest::get("task/get/all").params(params.to_request_pairs()))
//!     .await?;
//! ```

use crate::libs::messages::Message;
use crate::libs::notify::Notifier;
use crate::libs::session::SessionStore;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod auth;
pub mod error;
pub mod tasks;

pub use auth::AuthApi;
pub use error::ApiError;
pub use tasks::TasksApi;

/// Joins the base URL and an endpoint path with exactly one slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Extracts the server-provided message from an error body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

/// Reads a 2xx body; an empty body is read as JSON `null`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// One call against the API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    params: Vec<(&'static str, String)>,
    public: bool,
    fallback: Message,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            params: Vec::new(),
            public: false,
            fallback: Message::ApiError,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?);
        Ok(self)
    }

    pub fn params(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.params = params;
        self
    }

    /// Sent without a token and exempt from refresh and session teardown.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Message used when a non-2xx body carries none of its own.
    pub fn fallback(mut self, message: Message) -> Self {
        self.fallback = message;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            notifier,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Sends `request` and decodes the 2xx body into `T`.
    ///
    /// Failures are notified before they are returned, so callers must not
    /// notify them again.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let result = self.dispatch(&request).await;
        if let Err(err) = &result {
            debug!(path = %request.path, error = %err, "request failed");
            self.notifier.error(err.notification());
        }
        result
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        if request.public {
            let response = self.send(request, None).await?;
            return self.read(request, response).await;
        }

        let token = self.session.current_token();
        let response = self.send(request, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return self.read(request, response).await;
        }

        debug!(path = %request.path, "access token rejected, refreshing");
        let fresh = self.session.refresh_after(token.as_deref()).await?;
        let retried = self.send(request, Some(&fresh)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path, "retried request rejected, ending session");
            self.end_session();
            return Err(ApiError::AuthenticationExpired("retried request returned 401".to_string()));
        }
        self.read(request, retried).await
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let url = endpoint(&self.base_url, &request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, %url, "sending request");
        let response = builder.send().await.map_err(|e| {
            warn!(%url, error = %e, "no response from server");
            ApiError::NetworkUnreachable(e.to_string())
        })?;
        debug!(status = %response.status(), %url, "response received");
        Ok(response)
    }

    async fn read<T: DeserializeOwned>(&self, request: &ApiRequest, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        if status == StatusCode::FORBIDDEN && !request.public {
            warn!(path = %request.path, "session rejected by server");
            self.end_session();
            return Err(ApiError::SessionInvalid);
        }

        if !status.is_success() {
            return Err(ApiError::ApiRejected {
                status: status.as_u16(),
                message: server_message(&body).unwrap_or_else(|| request.fallback.to_string()),
            });
        }

        decode(&body)
    }

    fn end_session(&self) {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "failed to clear persisted session");
        }
    }
}
