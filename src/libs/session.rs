//! Session store: the single owner of the access/refresh credential pair.
//!
//! Every other component reads the credential through [`SessionStore`] at
//! the moment it needs it and never keeps a copy beyond one request.
//!
//! ## Lifecycle
//!
//! - **login**: persists the pair (encrypted, 7 day retention) and makes it
//!   current before returning
//! - **refresh**: exchanges the refresh token for a new access token over a
//!   transport that bypasses the API client's 401 handling; concurrent
//!   callers are coalesced into one exchange
//! - **logout**: clears memory and the persisted copy before returning
//!
//! Login status is derived from the current credential on every call and
//! published on a `watch` channel whenever it flips.

use super::data_storage::DataStorage;
use super::secret::Secret;
use crate::api::auth::RefreshClient;
use crate::api::ApiError;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// File holding the encrypted credential.
pub const SESSION_FILE: &str = ".session";

/// How long the persisted copy stays valid after it was written.
pub const SESSION_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(flatten)]
    credential: Credential,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    current: RwLock<Option<Credential>>,
    /// Bumped by every login and logout, always under the `current` write lock.
    epoch: AtomicU64,
    secret: Option<Secret>,
    refresher: RefreshClient,
    refresh_lock: Mutex<()>,
    status: watch::Sender<bool>,
}

impl SessionStore {
    /// Opens the store backed by `.session` in `storage`, restoring a
    /// persisted credential that has not expired yet.
    pub fn open(storage: &DataStorage, refresher: RefreshClient) -> Result<Self> {
        let secret = Secret::new(storage.get_path(SESSION_FILE)?);
        let restored = Self::restore(&secret);
        Ok(Self::build(restored, Some(secret), refresher))
    }

    /// A store that never touches the disk.
    pub fn in_memory(refresher: RefreshClient) -> Self {
        Self::build(None, None, refresher)
    }

    fn build(current: Option<Credential>, secret: Option<Secret>, refresher: RefreshClient) -> Self {
        let logged_in = current.as_ref().is_some_and(|c| !c.access_token.is_empty());
        let (status, _) = watch::channel(logged_in);
        Self {
            current: RwLock::new(current),
            epoch: AtomicU64::new(0),
            secret,
            refresher,
            refresh_lock: Mutex::new(()),
            status,
        }
    }

    fn restore(secret: &Secret) -> Option<Credential> {
        if !secret.exists() {
            return None;
        }

        let persisted = secret
            .read()
            .and_then(|raw| Ok(serde_json::from_str::<PersistedSession>(&raw)?));
        let persisted = match persisted {
            Ok(persisted) => persisted,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session file");
                Self::remove_file(secret);
                return None;
            }
        };

        if persisted.expires_at <= Utc::now() {
            debug!(expired_at = %persisted.expires_at, "persisted session expired");
            Self::remove_file(secret);
            return None;
        }

        Some(persisted.credential).filter(|c| !c.access_token.is_empty())
    }

    fn remove_file(secret: &Secret) {
        if let Err(e) = secret.remove() {
            warn!(error = %e, path = %secret.path().display(), "failed to remove session file");
        }
    }

    pub fn current_token(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|c| c.access_token.clone())
            .filter(|token| !token.is_empty())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.current.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_token().is_some()
    }

    /// Receives the login status after every transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.status.subscribe()
    }

    pub fn login(&self, token: &str, refresh_token: Option<String>) -> Result<()> {
        if token.is_empty() {
            anyhow::bail!("refusing to store an empty access token");
        }

        let credential = Credential {
            access_token: token.to_string(),
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
        };
        {
            let mut current = self.current.write();
            self.persist(&credential)?;
            *current = Some(credential);
            self.epoch.fetch_add(1, Ordering::SeqCst);
        }
        self.publish();
        info!("session started");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        {
            let mut current = self.current.write();
            *current = None;
            self.epoch.fetch_add(1, Ordering::SeqCst);
        }
        self.publish();
        if let Some(secret) = &self.secret {
            secret.remove()?;
        }
        info!("session cleared");
        Ok(())
    }

    /// Exchanges the stored refresh token for a new access token.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let stale = self.current_token();
        self.refresh_after(stale.as_deref()).await
    }

    /// Refreshes unless the access token already moved past `stale` while
    /// this caller was waiting, in which case the newer token is returned
    /// without another exchange.
    ///
    /// On failure the session is cleared. A login or logout that lands
    /// while the exchange is in flight wins over its result.
    pub async fn refresh_after(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.refresh_lock.lock().await;

        let epoch = self.epoch.load(Ordering::SeqCst);
        let current = self.credential();
        if let Some(current) = &current {
            if !current.access_token.is_empty() && stale != Some(current.access_token.as_str()) {
                debug!("token already refreshed by a concurrent caller");
                return Ok(current.access_token.clone());
            }
        }

        let Some(refresh_token) = current.and_then(|c| c.refresh_token) else {
            warn!("no refresh token available, session must be re-established");
            self.discard();
            return Err(ApiError::AuthenticationExpired("no refresh token".to_string()));
        };

        info!("refreshing access token");
        let exchanged = self.refresher.exchange(&refresh_token).await;

        if self.epoch.load(Ordering::SeqCst) != epoch {
            warn!("session changed during refresh, dropping refreshed token");
            return self
                .current_token()
                .ok_or_else(|| ApiError::AuthenticationExpired("session ended during refresh".to_string()));
        }

        match exchanged {
            Ok(grant) if !grant.token.is_empty() => {
                let credential = Credential {
                    access_token: grant.token.clone(),
                    refresh_token: grant.refresh_token.filter(|t| !t.is_empty()).or(Some(refresh_token)),
                };
                {
                    let mut current = self.current.write();
                    if self.epoch.load(Ordering::SeqCst) != epoch {
                        warn!("session changed during refresh, dropping refreshed token");
                        return current
                            .as_ref()
                            .map(|c| c.access_token.clone())
                            .filter(|token| !token.is_empty())
                            .ok_or_else(|| ApiError::AuthenticationExpired("session ended during refresh".to_string()));
                    }
                    if let Err(e) = self.persist(&credential) {
                        warn!(error = %e, "refreshed token kept in memory only");
                    }
                    *current = Some(credential);
                }
                self.publish();
                Ok(grant.token)
            }
            Ok(_) => {
                warn!("refresh returned an empty token");
                self.discard();
                Err(ApiError::AuthenticationExpired("empty token in refresh response".to_string()))
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                self.discard();
                Err(ApiError::AuthenticationExpired(err.to_string()))
            }
        }
    }

    fn discard(&self) {
        if let Err(e) = self.logout() {
            warn!(error = %e, "failed to remove persisted session");
        }
    }

    fn persist(&self, credential: &Credential) -> Result<()> {
        let Some(secret) = &self.secret else {
            return Ok(());
        };
        let persisted = PersistedSession {
            credential: credential.clone(),
            expires_at: Utc::now() + Duration::days(SESSION_RETENTION_DAYS),
        };
        secret.write(&serde_json::to_string(&persisted)?)
    }

    fn publish(&self) {
        let logged_in = self.is_logged_in();
        self.status.send_if_modified(|status| {
            let changed = *status != logged_in;
            *status = logged_in;
            changed
        });
    }
}
