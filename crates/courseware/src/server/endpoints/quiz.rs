use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::invalid_payload;
use crate::content::Quiz;
use crate::quiz::{QuestionSubmission, QuizGrader};
use crate::server::types::{ApiErrorType, AppState};
use crate::wire::RawQuiz;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBody {
    pub quiz: RawQuiz,
    #[serde(default)]
    pub submission: Vec<QuestionSubmission>,
    /// Overrides the deployment-wide passing score
    pub passing_score: Option<u8>,
}

/// POST /quiz/score
pub async fn post_score_quiz(State(s): State<Arc<AppState>>, Json(body): Json<ScoreBody>) -> Response {
    let Some(passing_score) = body.passing_score.or(s.config.quiz_passing_score) else {
        return ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "passingScore is required",
            Some("no passing score in the request and none configured".to_string()),
        ))
        .into_response();
    };
    if passing_score > 100 {
        return ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "passingScore must be between 0 and 100",
            Some(passing_score.to_string()),
        ))
        .into_response();
    }

    let quiz = match Quiz::try_from(body.quiz) {
        Ok(quiz) => quiz,
        Err(e) => return invalid_payload("quiz", e),
    };

    let result = QuizGrader::new(passing_score).score(&quiz, &body.submission);
    info!(
        quiz_id = %quiz.id,
        score = result.score,
        passed = result.is_passed,
        "POST /quiz/score"
    );
    (StatusCode::OK, Json(result)).into_response()
}
