use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use super::invalid_payload;
use crate::backend::BackendError;
use crate::content::Course;
use crate::enrollment::EnrollmentSnapshot;
use crate::progress::{compute_progress, CourseProgress};
use crate::server::types::{ApiErrorType, AppState};
use crate::wire::{RawCourse, RawEnrollment};

#[derive(Debug, Deserialize)]
pub struct ProgressBody {
    pub course: RawCourse,
    #[serde(default)]
    pub enrollment: RawEnrollment,
}

/// POST /progress
///
/// Derives progress from a course tree and enrollment supplied by the caller.
pub async fn post_progress(Json(body): Json<ProgressBody>) -> Response {
    let course = match Course::try_from(body.course) {
        Ok(course) => course,
        Err(e) => return invalid_payload("course", e),
    };
    let enrollment = match EnrollmentSnapshot::try_from(body.enrollment) {
        Ok(enrollment) => enrollment,
        Err(e) => return invalid_payload("enrollment", e),
    };

    info!(course_id = %course.id, "POST /progress");
    (StatusCode::OK, Json(compute_progress(&course, &enrollment))).into_response()
}

/// GET /courses/:course_id/progress
///
/// Fetches the course and the caller's enrollment from the backend using
/// the request's bearer token.
pub async fn get_course_progress(
    Path(course_id): Path<String>,
    State(s): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    info!(course_id = %course_id, "GET /courses/:course_id/progress");

    let Some(token) = bearer_token(&headers) else {
        return ApiErrorType::from((
            StatusCode::UNAUTHORIZED,
            "Missing bearer token",
            None,
        ))
        .into_response();
    };

    let fetched = futures::try_join!(
        s.backend.fetch_course(&course_id),
        s.backend.fetch_enrollment(&course_id, token),
    );

    match fetched {
        Ok((course, enrollment)) => {
            let progress = compute_progress(&course, &enrollment);
            let points = lesson_points(&progress, s.gamification.point_rule.lesson_points);
            (
                StatusCode::OK,
                Json(json!({
                    "courseId": course.id,
                    "title": course.title,
                    "progress": progress,
                    "points": points,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(course_id = %course_id, error = %e, "Failed to fetch course progress");
            backend_error_to_response(e)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Points earned for completed lessons under the configured rule.
fn lesson_points(progress: &CourseProgress, per_lesson: u32) -> u32 {
    let completed: usize = progress.per_module.iter().map(|m| m.completed).sum();
    (completed as u32).saturating_mul(per_lesson)
}

fn backend_error_to_response(error: BackendError) -> Response {
    let (status, message) = match &error {
        BackendError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
        BackendError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "Token rejected by backend"),
        BackendError::Decode { .. } => (StatusCode::BAD_GATEWAY, "Backend sent an invalid payload"),
        BackendError::Network { .. } => (StatusCode::SERVICE_UNAVAILABLE, "Backend unavailable"),
        BackendError::UnexpectedStatus { .. } | BackendError::Url { .. } => {
            (StatusCode::BAD_GATEWAY, "Backend request failed")
        }
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_backend_error_status() {
        let response = backend_error_to_response(BackendError::NotFound {
            entity: "course",
            id: "c1".to_string(),
        });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = backend_error_to_response(BackendError::Network {
            message: "refused".to_string(),
        });
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
