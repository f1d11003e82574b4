use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::server::types::AppState;

/// GET /health
pub async fn get_health() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
        .into_response()
}

/// GET /cache/stats
pub async fn get_cache_stats(State(s): State<Arc<AppState>>) -> Response {
    (StatusCode::OK, Json(s.backend.cache_state().stats())).into_response()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateBody {
    /// Only this course (and its enrollments); everything when absent
    #[serde(default)]
    pub course_id: Option<String>,
}

/// POST /cache/invalidate
pub async fn post_invalidate_cache(
    State(s): State<Arc<AppState>>,
    body: Option<Json<InvalidateBody>>,
) -> Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let cache = s.backend.cache_state();

    match body.course_id {
        Some(course_id) => {
            let removed = cache.invalidate_course(&course_id);
            info!(course_id = %course_id, removed, "POST /cache/invalidate");
            (StatusCode::OK, Json(json!({ "removed": removed }))).into_response()
        }
        None => {
            info!("POST /cache/invalidate - clearing all entries");
            cache.clear();
            (StatusCode::OK, Json(json!({ "message": "Cache invalidated" }))).into_response()
        }
    }
}

/// GET /gamification
pub async fn get_gamification(State(s): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "badges": s.gamification.badges_by_id(),
            "milestones": s.gamification.milestones_by_points(),
            "pointRule": s.gamification.point_rule,
        })),
    )
        .into_response()
}
