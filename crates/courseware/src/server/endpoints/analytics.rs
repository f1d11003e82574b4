use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::invalid_payload;
use crate::analytics::{compute_course_analytics, QuizAverage, StudentProgress};
use crate::content::Course;
use crate::wire::RawCourse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalyticsBody {
    pub course: RawCourse,
    #[serde(default)]
    pub per_student_progress: Vec<StudentProgress>,
    #[serde(default)]
    pub per_quiz: Vec<QuizAverage>,
    #[serde(default)]
    pub completion_rate: f64,
    pub overall_average: Option<f64>,
}

/// POST /analytics/course
pub async fn post_course_analytics(Json(body): Json<CourseAnalyticsBody>) -> Response {
    let course = match Course::try_from(body.course) {
        Ok(course) => course,
        Err(e) => return invalid_payload("course", e),
    };

    let analytics = compute_course_analytics(
        &course,
        &body.per_student_progress,
        &body.per_quiz,
        body.completion_rate,
        body.overall_average,
    );
    info!(
        course_id = %course.id,
        enrollments = analytics.enrollment_count,
        quizzes = analytics.quiz_scores.len(),
        "POST /analytics/course"
    );
    (StatusCode::OK, Json(analytics)).into_response()
}
