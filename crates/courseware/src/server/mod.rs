use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::endpoints::{activity, analytics, navigation, progress, quiz, status};

mod endpoints;
mod types;

pub use types::{ApiErrorType, AppState};

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Pure derivations over caller-supplied snapshots
    let derive_router = Router::new()
        .route("/progress", post(progress::post_progress))
        .route("/quiz/score", post(quiz::post_score_quiz))
        .route("/activity", post(activity::post_activity))
        .route("/analytics/course", post(analytics::post_course_analytics))
        .route("/navigation/breadcrumbs", post(navigation::post_breadcrumbs))
        .route("/navigation/routes", get(navigation::get_routes))
        .route("/navigation/roles", get(navigation::get_role_profiles));

    // Backed by the REST backend and its snapshot cache
    let backend_router = Router::new()
        .route("/courses/:course_id/progress", get(progress::get_course_progress))
        .route("/cache/stats", get(status::get_cache_stats))
        .route("/cache/invalidate", post(status::post_invalidate_cache));

    Router::new()
        .route("/health", get(status::get_health))
        .route("/gamification", get(status::get_gamification))
        .merge(derive_router)
        .merge(backend_router)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::gamification::GamificationConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(quiz_passing_score: Option<u8>) -> Router {
        let config = ServiceConfig {
            quiz_passing_score,
            ..ServiceConfig::default()
        };
        let state = AppState::new(config, GamificationConfig::empty()).unwrap();
        create_router(Arc::new(state))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn course_json() -> Value {
        json!({
            "_id": "c1",
            "title": "Quantum 101",
            "difficultyLevel": "beginner",
            "instructor": "u9",
            "createdAt": "2024-01-01T00:00:00Z",
            "modules": [
                { "_id": "m1", "title": "Basics", "lessons": [
                    { "_id": "l1", "title": "Qubits" },
                    { "_id": "l2", "title": "Gates", "quiz": {
                        "_id": "q1", "title": "Gates Quiz", "questions": [
                            { "_id": "x1", "question": "H on |0>?", "type": "single-choice",
                              "options": ["|+>", "|->"], "answers": ["|+>"] }
                        ]
                    }}
                ]},
                { "_id": "m2", "title": "Circuits", "lessons": [
                    { "_id": "l3", "title": "Bell", "circuitId": "bell" },
                    { "_id": "l4", "title": "GHZ" }
                ]}
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(None), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_progress_endpoint() {
        let payload = json!({
            "course": course_json(),
            "enrollment": { "completions": [
                { "moduleId": "m1", "lessonIds": ["l1", "l2"] },
                { "moduleId": "m2", "lessonIds": ["l3"] }
            ]}
        });
        let (status, body) = send(app(None), "POST", "/progress", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["percentage"], 75);
        assert_eq!(body["currentLessonId"], "l4");
    }

    #[tokio::test]
    async fn test_progress_rejects_invalid_course() {
        let mut course = course_json();
        course["difficultyLevel"] = json!("impossible");
        let (status, body) = send(app(None), "POST", "/progress", Some(json!({ "course": course }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid course");
    }

    #[tokio::test]
    async fn test_quiz_passing_score_resolution() {
        let quiz = course_json()["modules"][0]["lessons"][1]["quiz"].clone();
        let submission = json!([{ "questionId": "x1", "answers": ["|+>"] }]);

        let (status, _) = send(
            app(None),
            "POST",
            "/quiz/score",
            Some(json!({ "quiz": quiz, "submission": submission })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            app(Some(70)),
            "POST",
            "/quiz/score",
            Some(json!({ "quiz": quiz, "submission": submission })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 100);
        assert_eq!(body["isPassed"], true);

        let (_, body) = send(
            app(Some(70)),
            "POST",
            "/quiz/score",
            Some(json!({ "quiz": quiz, "submission": [], "passingScore": 0 })),
        )
        .await;
        assert_eq!(body["score"], 0);
        assert_eq!(body["isPassed"], true);
    }

    #[tokio::test]
    async fn test_activity_endpoint() {
        let payload = json!({
            "history": [
                { "date": "2024-03-09", "lessonsCompleted": 1 },
                { "date": "2024-03-10T08:00:00Z", "lessonsCompleted": 2 },
                { "date": "2024-03-10", "lessonsCompleted": 1 },
                { "date": "garbage", "lessonsCompleted": 4 },
                { "date": null, "lessonsCompleted": 5 }
            ],
            "today": "2024-03-10"
        });
        let (status, body) = send(app(None), "POST", "/activity", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activity"]["2024-03-10"], 3);
        assert_eq!(body["streaks"]["current"], 2);
        assert_eq!(body["year"], 2024);
        assert_eq!(body["months"].as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_analytics_endpoint() {
        let payload = json!({
            "course": course_json(),
            "perStudentProgress": [
                { "studentId": "s1", "studentName": "Ada", "progress": 0 },
                { "studentId": "s2", "studentName": "Bo", "progress": 40 },
                { "studentId": "s3", "studentName": "Cy", "progress": 100 }
            ],
            "perQuiz": [
                { "quizId": "q1", "averageScore": 82.5 },
                { "quizId": "gone", "averageScore": 10.0 }
            ],
            "completionRate": 33.3
        });
        let (status, body) = send(app(None), "POST", "/analytics/course", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enrollmentCount"], 3);
        assert_eq!(body["activeStudentCount"], 1);
        assert_eq!(body["quizScores"].as_array().unwrap().len(), 1);
        assert_eq!(body["quizScores"][0]["quizName"], "Gates Quiz");
    }

    #[tokio::test]
    async fn test_breadcrumbs_endpoint() {
        let payload = json!({
            "pathname": "/courses/c1/modules",
            "user": { "_id": "u1", "name": "Ada", "role": "student" },
            "courseTitles": { "c1": "Quantum 101" }
        });
        let (status, body) = send(app(None), "POST", "/navigation/breadcrumbs", Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        let labels: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels.first(), Some(&"Home"));
        assert!(labels.contains(&"Quantum 101"));

        let (_, body) = send(
            app(None),
            "POST",
            "/navigation/breadcrumbs",
            Some(json!({ "pathname": "/login" })),
        )
        .await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_course_progress_requires_token() {
        let (status, body) = send(app(None), "GET", "/courses/c1/progress", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing bearer token");
    }

    #[tokio::test]
    async fn test_cache_endpoints() {
        let (status, body) = send(app(None), "GET", "/cache/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["courses"]["totalEntries"], 0);

        let (status, body) = send(
            app(None),
            "POST",
            "/cache/invalidate",
            Some(json!({ "courseId": "c1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], 0);
    }
}
