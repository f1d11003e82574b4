/// Enrollment snapshots as read from the backend
use serde::Serialize;

/// Point-in-time read of one student's progress in one course.
///
/// The core never mutates these; completions and activity are appended
/// server-side when lessons and quizzes are completed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSnapshot {
    pub course_id: String,
    pub student_id: String,
    /// Server-computed percentage, if the backend sent one. May be out of range.
    pub progress_percentage: Option<i64>,
    pub completions: Vec<ModuleCompletion>,
    pub activity_history: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCompletion {
    pub module_id: String,
    pub lesson_ids: Vec<String>,
}

/// One day's worth of completed lessons.
///
/// `date` is kept as received; unparseable dates are dropped during
/// aggregation rather than at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub date: String,
    pub lessons_completed: u32,
}

impl EnrollmentSnapshot {
    /// All completed lesson ids across every module entry, in record order.
    pub fn completed_lesson_ids(&self) -> impl Iterator<Item = &str> {
        self.completions
            .iter()
            .flat_map(|c| c.lesson_ids.iter().map(String::as_str))
    }
}
