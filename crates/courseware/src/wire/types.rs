/// Loosely shaped payloads as the backend sends them
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Course document before validation.
///
/// Every field the backend may omit is optional here; [`crate::content::Course`]
/// is only produced after the tree passes validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCourse {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "thumbnail")]
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub instructor: Option<RawInstructor>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub notebook_url: Option<String>,
    #[serde(default)]
    pub modules: Vec<RawModule>,
}

/// Instructors arrive either as a bare id or as a populated document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawInstructor {
    Id(String),
    Populated {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModule {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub lessons: Vec<RawLesson>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLesson {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub quiz: Option<RawQuiz>,
    pub circuit_id: Option<String>,
    pub network_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuiz {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestion {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    #[serde(alias = "question")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnrollment {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub student_id: String,
    pub progress_percentage: Option<f64>,
    #[serde(default)]
    pub completions: Vec<RawModuleCompletion>,
    #[serde(default)]
    pub activity_history: Vec<RawActivity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModuleCompletion {
    #[serde(default)]
    pub module_id: String,
    #[serde(default, alias = "completedLessons")]
    pub lesson_ids: Vec<String>,
}

/// History entry; malformed fields degrade to values aggregation skips.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub lessons_completed: u32,
}

/// Any non-string value becomes an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Non-negative numbers saturate into `u32`; anything else counts as 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
