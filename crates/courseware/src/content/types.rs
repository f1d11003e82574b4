/// Types for the course content tree
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A course as authored by its instructor.
///
/// Module order is significant: it defines the flat lesson order used for
/// "current lesson" derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub difficulty_level: Difficulty,
    pub prerequisites: Vec<String>,
    pub instructor: Instructor,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub notebook_url: Option<String>,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instructor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Review state of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseStatus {
    Draft,
    UnderReview,
    Published,
    Rejected,
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CourseStatus::Draft => "draft",
            CourseStatus::UnderReview => "under-review",
            CourseStatus::Published => "published",
            CourseStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Markdown body
    pub content: Option<String>,
    pub quiz: Option<Quiz>,
    pub simulator: Option<SimulatorRef>,
}

/// Reference to a simulator configuration owned by an external tool.
///
/// The configuration itself is opaque; only the id is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SimulatorRef {
    Circuit {
        #[serde(rename = "circuitId")]
        circuit_id: String,
    },
    Network {
        #[serde(rename = "networkId")]
        network_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Option identity is the string value; unique within a question
    pub options: Vec<String>,
    /// Subset of `options` marked correct
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
}

impl QuestionType {
    /// Returns true if `count` correct answers is legal for this type.
    pub fn allows_answer_count(&self, count: usize) -> bool {
        match self {
            QuestionType::SingleChoice => count == 1,
            QuestionType::MultipleChoice => count >= 1,
        }
    }
}
