/// Educator and admin analytics roll-ups
use crate::content::Course;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label of the synthetic entry used when only an overall average is known.
pub const OVERALL_QUIZ_LABEL: &str = "All Quizzes (avg)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub student_id: String,
    pub student_name: String,
    pub progress: i64,
}

/// Per-quiz average as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAverage {
    pub quiz_id: String,
    pub average_score: f64,
    #[serde(default)]
    pub quiz_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub quiz_name: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    pub enrollment_count: usize,
    /// Passed through from the backend, which computes it from richer data
    pub completion_rate: f64,
    /// Students with progress strictly between 0 and 100
    pub active_student_count: usize,
    pub quiz_scores: Vec<QuizScore>,
}

/// Rolls up per-student progress and per-quiz averages for one course.
///
/// Quiz entries whose title cannot be resolved (neither a `quiz_title` nor a
/// matching quiz or lesson in `course`) are dropped. When `per_quiz` is empty
/// and `overall_average` is known, a single [`OVERALL_QUIZ_LABEL`] entry is
/// emitted instead.
pub fn compute_course_analytics(
    course: &Course,
    per_student: &[StudentProgress],
    per_quiz: &[QuizAverage],
    completion_rate: f64,
    overall_average: Option<f64>,
) -> CourseAnalytics {
    let active_student_count = per_student
        .iter()
        .filter(|s| s.progress > 0 && s.progress < 100)
        .count();

    let quiz_scores = if per_quiz.is_empty() {
        overall_average
            .map(|average_score| QuizScore {
                quiz_name: OVERALL_QUIZ_LABEL.to_string(),
                average_score,
            })
            .into_iter()
            .collect()
    } else {
        per_quiz
            .iter()
            .filter_map(|entry| match resolve_quiz_title(course, entry) {
                Some(quiz_name) => Some(QuizScore {
                    quiz_name,
                    average_score: entry.average_score,
                }),
                None => {
                    debug!(course_id = %course.id, quiz_id = %entry.quiz_id, "Dropping quiz average without a title");
                    None
                }
            })
            .collect()
    };

    CourseAnalytics {
        enrollment_count: per_student.len(),
        completion_rate,
        active_student_count,
        quiz_scores,
    }
}

fn resolve_quiz_title(course: &Course, entry: &QuizAverage) -> Option<String> {
    if let Some(title) = non_blank(entry.quiz_title.as_deref()) {
        return Some(title);
    }

    let (lesson, quiz) = course.find_quiz(&entry.quiz_id)?;
    non_blank(Some(&quiz.title)).or_else(|| non_blank(Some(&lesson.title)))
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Totals across the courses an educator or admin oversees.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesOverview {
    pub course_count: usize,
    pub total_enrollments: usize,
    pub total_active_students: usize,
    /// Unweighted mean of the per-course completion rates; 0 with no courses
    pub average_completion_rate: f64,
}

/// Rolls several course analytics up into one overview.
pub fn summarize_courses(analytics: &[CourseAnalytics]) -> CoursesOverview {
    if analytics.is_empty() {
        return CoursesOverview::default();
    }

    let rate_sum: f64 = analytics.iter().map(|a| a.completion_rate).sum();
    CoursesOverview {
        course_count: analytics.len(),
        total_enrollments: analytics.iter().map(|a| a.enrollment_count).sum(),
        total_active_students: analytics.iter().map(|a| a.active_student_count).sum(),
        average_completion_rate: rate_sum / analytics.len() as f64,
    }
}
