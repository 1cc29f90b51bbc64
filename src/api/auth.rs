//! Authentication endpoints.
//!
//! Login and registration go through the regular [`ApiClient`] as public
//! requests. The refresh exchange uses its own bare [`RefreshClient`] so a
//! 401 from the refresh endpoint can never trigger another refresh.

use super::{decode, endpoint, server_message, ApiClient, ApiError, ApiRequest};
use crate::libs::messages::Message;
use reqwest::Client;
use serde::{de::IgnoredAny, Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const LOGIN_URL: &str = "auth/login";
const REGISTER_URL: &str = "auth/register";
const REFRESH_URL: &str = "auth/refresh-token";

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Token pair handed out by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Raw transport for `POST /auth/refresh-token`.
pub struct RefreshClient {
    client: Client,
    base_url: String,
}

impl RefreshClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn exchange(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        let url = endpoint(&self.base_url, REFRESH_URL);
        debug!(%url, "exchanging refresh token");

        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnreachable(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::ApiRejected {
                status: status.as_u16(),
                message: server_message(&body).unwrap_or_else(|| Message::ApiError.to_string()),
            });
        }
        decode(&body)
    }
}

pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Logs in and stores the returned credential in the session.
    pub async fn login(&self, credentials: &LoginCredentials) -> anyhow::Result<()> {
        let request = ApiRequest::post(LOGIN_URL)
            .json(credentials)?
            .public()
            .fallback(Message::LoginFailed);
        let grant: TokenGrant = self.client.request(request).await?;

        if grant.token.is_empty() {
            self.client.notifier().error(Message::LoginFailed);
            anyhow::bail!(ApiError::Decode("login response carried no token".to_string()));
        }
        self.client.session().login(&grant.token, grant.refresh_token)?;
        self.client.notifier().success(Message::LoginSuccessful);
        Ok(())
    }

    pub async fn register(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        let request = ApiRequest::post(REGISTER_URL)
            .json(credentials)?
            .public()
            .fallback(Message::RegistrationFailed);
        let _: IgnoredAny = self.client.request(request).await?;
        self.client.notifier().success(Message::RegistrationSuccessful);
        Ok(())
    }

    /// Clears the session; nothing is sent to the server.
    pub fn logout(&self) -> anyhow::Result<()> {
        self.client.session().logout()?;
        self.client.notifier().success(Message::LogoutSuccessful);
        Ok(())
    }
}
