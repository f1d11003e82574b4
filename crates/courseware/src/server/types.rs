use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::backend::{BackendClient, BackendConfig, BackendError, SnapshotCacheState};
use crate::config::ServiceConfig;
use crate::gamification::GamificationConfig;

/// Shared state handed to every endpoint.
pub struct AppState {
    pub config: ServiceConfig,
    pub backend: BackendClient,
    pub gamification: GamificationConfig,
}

impl AppState {
    /// Builds the state, wiring a backend client with its own snapshot cache.
    pub fn new(config: ServiceConfig, gamification: GamificationConfig) -> Result<Self, BackendError> {
        let cache_state = Arc::new(SnapshotCacheState::with_ttl(config.cache_ttl));
        let backend = BackendClient::new(
            BackendConfig {
                base_url: config.backend_url.clone(),
                ..BackendConfig::default()
            },
            cache_state,
        )?;

        Ok(Self {
            config,
            backend,
            gamification,
        })
    }
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl ApiErrorType {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Into<String>> From<(StatusCode, T, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, T, Option<String>)) -> Self {
        Self {
            status,
            error: error.into(),
            context,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
