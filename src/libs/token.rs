//! Claims read from the access token.
//!
//! The token is treated as a JWT and only its payload segment is decoded.
//! Signatures are not verified; the claims are for display only.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecodedToken {
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

impl DecodedToken {
    /// `None` when the token is not a JWT carrying a numeric `exp`.
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let bytes = BASE64_URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at().map_or(true, |at| at <= Utc::now())
    }
}
