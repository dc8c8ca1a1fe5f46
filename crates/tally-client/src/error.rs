//! # Client Errors
//!
//! Error type for everything the register does over the network or on disk.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Configuration   InvalidConfig, InvalidUrl, ConfigLoad, ConfigParse     │
//! │  Transport       Http (connect refused, timeout, TLS)                   │
//! │  Backend         Api { status, message }  ← message shown verbatim     │
//! │  Protocol        Decode (2xx body we could not read)                    │
//! │  Domain          Core (ticket rules, validation)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tally_core::{TicketError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid register configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read config: {0}")]
    ConfigLoad(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // =========================================================================
    // Transport & Backend Errors
    // =========================================================================
    /// The request never produced an HTTP response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend's own text, with array messages joined by ", ".
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] TicketError),
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(TicketError::Validation(err))
    }
}

// =============================================================================
// Backend Error Bodies
// =============================================================================

/// `{"message": "..."}` or `{"message": ["...", "..."]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ClientError {
    /// Builds an [`ClientError::Api`] from a non-success response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: Some(ErrorMessage::One(message)),
            }) => message,
            Ok(ErrorBody {
                message: Some(ErrorMessage::Many(messages)),
            }) => messages.join(", "),
            _ if !body.trim().is_empty() && !body.trim_start().starts_with('{') => {
                body.trim().to_string()
            }
            _ => format!("Request failed with status {}", status),
        };

        ClientError::Api { status, message }
    }

    /// Returns true if the backend received the request and refused it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoad(_)
                | ClientError::ConfigParse(_)
        )
    }
}
