//! Error types for the backend client.

use crate::wire::WireError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the REST backend.
#[derive(Debug, Error, Clone)]
pub enum BackendError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Backend answered with a status we don't handle
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    /// Bearer token missing, expired or rejected
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Payload could not be decoded or failed validation
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("URL error: {message}")]
    Url { message: String },
}

impl BackendError {
    /// Returns true if the caller must obtain a fresh token.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, BackendError::Unauthorized { .. })
    }

    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Network { .. } => true,
            BackendError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Classifies a non-success response.
    pub(crate) fn from_status(status: StatusCode, url: &str, entity: &'static str, id: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => BackendError::NotFound {
                entity,
                id: id.to_string(),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized {
                message: format!("{} from {}", status, url),
            },
            other => BackendError::UnexpectedStatus {
                status: other.as_u16(),
                url: url.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode {
                message: err.to_string(),
            }
        } else {
            BackendError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for BackendError {
    fn from(err: url::ParseError) -> Self {
        BackendError::Url {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<WireError> for BackendError {
    fn from(err: WireError) -> Self {
        BackendError::Decode {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = BackendError::from_status(StatusCode::NOT_FOUND, "http://x/courses/c1", "course", "c1");
        assert!(matches!(err, BackendError::NotFound { entity: "course", .. }));
        assert!(!err.is_retryable());

        let err = BackendError::from_status(StatusCode::UNAUTHORIZED, "http://x", "enrollment", "c1");
        assert!(err.needs_reauth());

        let err = BackendError::from_status(StatusCode::BAD_GATEWAY, "http://x", "course", "c1");
        assert!(err.is_retryable());
        assert!(!err.needs_reauth());
    }
}
