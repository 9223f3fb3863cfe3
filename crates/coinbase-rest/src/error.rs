//! Error types for REST API operations
//!
//! Three families are kept apart so callers can tell them apart:
//! - configuration problems ([`RestError::Configuration`]), raised at construction
//! - rejections by the exchange ([`RestError::Api`]), carrying an [`ApiError`]
//! - transport failures ([`RestError::Http`], [`RestError::Decode`]), where the
//!   request never reliably completed

use coinbase_auth::AuthError;
use serde_json::Value;
use std::fmt;

/// Message used when an error body has no `message` field
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown error";

/// Category of an API rejection, derived from the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    InternalServerError,
    /// Any other status in the rejection range
    Unknown,
}

impl ApiErrorKind {
    /// Map an HTTP status to its category
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::InternalServerError,
            _ => Self::Unknown,
        }
    }

    /// Name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::InternalServerError => "InternalServerError",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when a status is treated as an API rejection (400..=500)
pub fn is_rejection_status(status: u16) -> bool {
    (400..=500).contains(&status)
}

/// A request rejected by the exchange
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({status}): {message}")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Message reported by the exchange
    pub message: String,
    /// Category derived from `status`
    pub kind: ApiErrorKind,
}

impl ApiError {
    /// Create an API error, deriving the kind from the status
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: ApiErrorKind::from_status(status),
        }
    }

    /// Create an API error from a decoded response body
    ///
    /// Uses the body's `message` field, falling back to `"Unknown error"`.
    pub fn from_body(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ERROR_MESSAGE);

        Self::new(status, message)
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Credentials could not be loaded or decoded
    #[error("Configuration error: {0}")]
    Configuration(#[from] AuthError),

    /// The exchange rejected the request
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// HTTP request failed (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("Failed to decode response body (status {status}): {source}")]
    Decode {
        /// HTTP status of the undecodable response
        status: u16,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Request body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// The exchange rejected the request
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// The request never reliably completed
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Decode { .. })
    }

    /// Get the API error, if this is a rejection
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// HTTP status associated with this error, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(error) => Some(error.status),
            Self::Decode { status, .. } => Some(*status),
            Self::Http(error) => error.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the same request could reasonably succeed if sent again
    ///
    /// Advisory only. Nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(error) => error.kind == ApiErrorKind::InternalServerError,
            Self::Http(error) => error.is_timeout() || error.is_connect(),
            Self::Configuration(_)
            | Self::Decode { .. }
            | Self::Serialize(_)
            | Self::InvalidParameter(_) => false,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
