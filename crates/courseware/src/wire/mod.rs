//! Normalization of backend payloads into the strict content model.
//!
//! Everything that crosses the API boundary goes through here so the
//! derivations can assume well-formed trees.

mod types;

pub use types::*;

use crate::content::{
    Course, CourseStatus, Difficulty, Instructor, Lesson, Module, Question, QuestionType, Quiz, SimulatorRef,
};
use crate::enrollment::{ActivityEntry, EnrollmentSnapshot, ModuleCompletion};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

/// Failure to turn JSON text into a validated snapshot.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Parses and validates a course document.
pub fn course_from_json(json: &str) -> Result<Course, WireError> {
    let raw: RawCourse = serde_json::from_str(json)?;
    Ok(Course::try_from(raw)?)
}

/// Parses and validates an enrollment snapshot.
pub fn enrollment_from_json(json: &str) -> Result<EnrollmentSnapshot, WireError> {
    let raw: RawEnrollment = serde_json::from_str(json)?;
    Ok(EnrollmentSnapshot::try_from(raw)?)
}

fn required(value: Option<String>, entity: &'static str, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField { entity, field })
}

/// Matches `value` against `(accepted spellings, variant)` pairs, ignoring
/// case and treating `_` and `-` alike.
fn parse_variant<T: Copy>(kind: &'static str, value: &str, table: &[(&[&str], T)]) -> Result<T, ValidationError> {
    let wanted = value.trim().to_lowercase().replace('_', "-");
    table
        .iter()
        .find(|(spellings, _)| spellings.contains(&wanted.as_str()))
        .map(|(_, variant)| *variant)
        .ok_or_else(|| ValidationError::UnknownVariant {
            kind,
            value: value.to_string(),
        })
}

fn parse_difficulty(value: &str) -> Result<Difficulty, ValidationError> {
    parse_variant(
        "difficulty level",
        value,
        &[
            (&["beginner"], Difficulty::Beginner),
            (&["intermediate"], Difficulty::Intermediate),
            (&["advanced"], Difficulty::Advanced),
        ],
    )
}

fn parse_status(value: &str) -> Result<CourseStatus, ValidationError> {
    parse_variant(
        "course status",
        value,
        &[
            (&["draft"], CourseStatus::Draft),
            (&["under-review"], CourseStatus::UnderReview),
            (&["published"], CourseStatus::Published),
            (&["rejected"], CourseStatus::Rejected),
        ],
    )
}

fn parse_question_type(value: &str) -> Result<QuestionType, ValidationError> {
    parse_variant(
        "question type",
        value,
        &[
            (&["single-choice", "single"], QuestionType::SingleChoice),
            (&["multiple-choice", "multiple"], QuestionType::MultipleChoice),
        ],
    )
}

/// Rejects the first id seen twice.
fn ensure_unique<'a>(entity: &'static str, ids: impl IntoIterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                entity,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

impl TryFrom<RawCourse> for Course {
    type Error = ValidationError;

    fn try_from(raw: RawCourse) -> Result<Self, Self::Error> {
        let id = required(raw.id, "course", "id")?;
        let title = required(raw.title, "course", "title")?;
        let difficulty_level = parse_difficulty(&required(raw.difficulty_level, "course", "difficultyLevel")?)?;
        let status = match raw.status {
            Some(s) => parse_status(&s)?,
            None => CourseStatus::Draft,
        };

        let created_raw = required(raw.created_at, "course", "createdAt")?;
        let created_at = DateTime::parse_from_rfc3339(created_raw.trim())
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| ValidationError::InvalidTimestamp {
                field: "createdAt",
                value: created_raw.clone(),
            })?;

        let instructor = match raw.instructor {
            Some(RawInstructor::Id(id)) => Instructor {
                id: required(Some(id), "instructor", "id")?,
                name: String::new(),
            },
            Some(RawInstructor::Populated { id, name }) => Instructor {
                id: required(Some(id), "instructor", "id")?,
                name: name.unwrap_or_default(),
            },
            None => {
                return Err(ValidationError::MissingField {
                    entity: "course",
                    field: "instructor",
                })
            }
        };

        let modules = raw
            .modules
            .into_iter()
            .map(Module::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        ensure_unique("module", modules.iter().map(|m| m.id.as_str()))?;
        ensure_unique("lesson", modules.iter().flat_map(|m| m.lessons.iter()).map(|l| l.id.as_str()))?;
        ensure_unique(
            "quiz",
            modules
                .iter()
                .flat_map(|m| m.lessons.iter())
                .filter_map(|l| l.quiz.as_ref())
                .map(|q| q.id.as_str()),
        )?;

        Ok(Course {
            id,
            title,
            subtitle: raw.subtitle.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            thumbnail_url: raw.thumbnail_url.filter(|u| !u.is_empty()),
            category: raw.category.unwrap_or_default(),
            difficulty_level,
            prerequisites: raw.prerequisites,
            instructor,
            status,
            created_at,
            notebook_url: raw.notebook_url.filter(|u| !u.is_empty()),
            modules,
        })
    }
}

impl TryFrom<RawModule> for Module {
    type Error = ValidationError;

    fn try_from(raw: RawModule) -> Result<Self, Self::Error> {
        Ok(Module {
            id: required(raw.id, "module", "id")?,
            title: raw.title.unwrap_or_default(),
            lessons: raw
                .lessons
                .into_iter()
                .map(Lesson::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<RawLesson> for Lesson {
    type Error = ValidationError;

    fn try_from(raw: RawLesson) -> Result<Self, Self::Error> {
        let id = required(raw.id, "lesson", "id")?;

        let circuit = raw.circuit_id.filter(|s| !s.is_empty());
        let network = raw.network_id.filter(|s| !s.is_empty());
        let simulator = match (circuit, network) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingSimulator { lesson_id: id }),
            (Some(circuit_id), None) => Some(SimulatorRef::Circuit { circuit_id }),
            (None, Some(network_id)) => Some(SimulatorRef::Network { network_id }),
            (None, None) => None,
        };

        Ok(Lesson {
            id,
            title: raw.title.unwrap_or_default(),
            content: raw.content,
            quiz: raw.quiz.map(Quiz::try_from).transpose()?,
            simulator,
        })
    }
}

impl TryFrom<RawQuiz> for Quiz {
    type Error = ValidationError;

    fn try_from(raw: RawQuiz) -> Result<Self, Self::Error> {
        let questions = raw
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique("question", questions.iter().map(|q| q.id.as_str()))?;

        Ok(Quiz {
            id: required(raw.id, "quiz", "id")?,
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            questions,
        })
    }
}

impl TryFrom<RawQuestion> for Question {
    type Error = ValidationError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let id = required(raw.id, "question", "id")?;
        let kind = parse_question_type(&required(raw.kind, "question", "type")?)?;

        let mut options_seen = HashSet::new();
        for option in &raw.options {
            if !options_seen.insert(option.as_str()) {
                return Err(ValidationError::DuplicateOption {
                    question_id: id,
                    option: option.clone(),
                });
            }
        }

        let mut answers: Vec<String> = Vec::with_capacity(raw.answers.len());
        for answer in raw.answers {
            if !options_seen.contains(answer.as_str()) {
                return Err(ValidationError::AnswerNotAnOption { question_id: id, answer });
            }
            if !answers.contains(&answer) {
                answers.push(answer);
            }
        }

        if !kind.allows_answer_count(answers.len()) {
            return Err(ValidationError::AnswerCount {
                question_id: id,
                count: answers.len(),
            });
        }

        Ok(Question {
            id,
            text: raw.text.unwrap_or_default(),
            kind,
            options: raw.options,
            answers,
        })
    }
}

impl TryFrom<RawEnrollment> for EnrollmentSnapshot {
    type Error = ValidationError;

    fn try_from(raw: RawEnrollment) -> Result<Self, Self::Error> {
        let progress_percentage = match raw.progress_percentage {
            Some(p) if !p.is_finite() => {
                return Err(ValidationError::NonFinite {
                    field: "progressPercentage",
                })
            }
            Some(p) => Some(p.round() as i64),
            None => None,
        };

        Ok(EnrollmentSnapshot {
            course_id: raw.course_id,
            student_id: raw.student_id,
            progress_percentage,
            completions: raw
                .completions
                .into_iter()
                .map(|c| ModuleCompletion {
                    module_id: c.module_id,
                    lesson_ids: c.lesson_ids,
                })
                .collect(),
            activity_history: raw.activity_history.into_iter().map(ActivityEntry::from).collect(),
        })
    }
}

impl From<RawActivity> for ActivityEntry {
    fn from(raw: RawActivity) -> Self {
        ActivityEntry {
            date: raw.date,
            lessons_completed: raw.lessons_completed,
        }
    }
}
