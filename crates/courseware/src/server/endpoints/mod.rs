use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ValidationError;
use crate::server::types::ApiErrorType;

pub mod activity;
pub mod analytics;
pub mod navigation;
pub mod progress;
pub mod quiz;
pub mod status;

/// Maps a payload that failed normalization to a 400 response.
fn invalid_payload(what: &str, error: ValidationError) -> Response {
    warn!(error = %error, "Rejected {} payload", what);
    ApiErrorType::from((
        StatusCode::BAD_REQUEST,
        format!("Invalid {}", what),
        Some(error.to_string()),
    ))
    .into_response()
}
