//! API error types.

use crate::libs::messages::Message;

/// Failure of a remote task or auth operation.
///
/// Every variant maps to exactly one user-visible notification through
/// [`ApiError::notification`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401 that could not be recovered by refreshing the access token.
    #[error("authentication expired: {0}")]
    AuthenticationExpired(String),

    /// 403: the session is no longer valid and has been cleared.
    #[error("session invalid")]
    SessionInvalid,

    /// Rejected before any request was sent.
    #[error("{field} is required")]
    ValidationRejected {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Any other non-2xx response.
    #[error("API error ({status}): {message}")]
    ApiRejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the operation's fallback text.
        message: String,
    },

    /// No response was received.
    #[error("cannot reach server: {0}")]
    NetworkUnreachable(String),

    /// A 2xx response whose body could not be read.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The notification shown for this failure.
    pub fn notification(&self) -> Message {
        match self {
            ApiError::AuthenticationExpired(_) | ApiError::SessionInvalid => Message::SessionExpired,
            ApiError::ValidationRejected { field } => Message::FieldRequired(field.to_string()),
            ApiError::ApiRejected { message, .. } => Message::ApiMessage(message.clone()),
            ApiError::NetworkUnreachable(_) => Message::ServerUnreachable,
            ApiError::Decode(_) => Message::ApiResponseInvalid,
        }
    }
}
