/// Quiz scoring
use crate::content::Quiz;
use crate::progress::rounded_percentage;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A learner's answers to one question.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSubmission {
    pub question_id: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// 0..=100
    pub score: u8,
    pub is_passed: bool,
    /// One entry per quiz question, in quiz order
    pub per_question: Vec<QuestionOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: String,
    pub correct_answers: Vec<String>,
    pub was_correct: bool,
}

/// Grades submissions against a fixed passing score.
///
/// The passing score is never defaulted here: it comes from the caller's
/// request or from deployment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizGrader {
    passing_score: u8,
}

impl QuizGrader {
    /// Creates a grader; scores at or above `passing_score` pass.
    pub fn new(passing_score: u8) -> Self {
        Self {
            passing_score: passing_score.min(100),
        }
    }

    pub fn passing_score(&self) -> u8 {
        self.passing_score
    }

    /// Scores a submission.
    ///
    /// Questions without a submission entry count as answered with nothing.
    /// Entries for question ids the quiz does not have are ignored, so they
    /// never change the denominator.
    pub fn score(&self, quiz: &Quiz, submission: &[QuestionSubmission]) -> QuizResult {
        let per_question: Vec<QuestionOutcome> = quiz
            .questions
            .iter()
            .map(|question| {
                let submitted: HashSet<&str> = submission
                    .iter()
                    .find(|s| s.question_id == question.id)
                    .map(|s| s.answers.iter().map(String::as_str).collect())
                    .unwrap_or_default();
                let expected: HashSet<&str> = question.answers.iter().map(String::as_str).collect();

                QuestionOutcome {
                    question_id: question.id.clone(),
                    correct_answers: question.answers.clone(),
                    was_correct: !expected.is_empty() && submitted == expected,
                }
            })
            .collect();

        let unknown = submission
            .iter()
            .filter(|s| !quiz.questions.iter().any(|q| q.id == s.question_id))
            .count();
        if unknown > 0 {
            debug!(quiz_id = %quiz.id, unknown, "Ignoring answers to questions not in the quiz");
        }

        let correct = per_question.iter().filter(|o| o.was_correct).count();
        let score = rounded_percentage(correct, per_question.len());

        QuizResult {
            score,
            is_passed: score >= self.passing_score,
            per_question,
        }
    }
}

/// Scores `submission` against `quiz`, passing at `passing_score` or above.
pub fn score_quiz(quiz: &Quiz, submission: &[QuestionSubmission], passing_score: u8) -> QuizResult {
    QuizGrader::new(passing_score).score(quiz, submission)
}
