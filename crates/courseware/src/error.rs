//! Boundary validation errors.

use thiserror::Error;

/// Errors raised when a snapshot or request does not satisfy the content
/// model's invariants.
///
/// Derivations never produce these; they are surfaced while normalizing
/// payloads in [`crate::wire`] or by the few constructors that take raw
/// indices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty
    #[error("Missing field `{field}` on {entity}")]
    MissingField { entity: &'static str, field: &'static str },

    /// An enum-like string did not match any known variant
    #[error("Unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },

    /// Two siblings in the content tree share an id
    #[error("Duplicate {entity} id `{id}`")]
    DuplicateId { entity: &'static str, id: String },

    /// A question lists the same option twice
    #[error("Question `{question_id}` repeats option `{option}`")]
    DuplicateOption { question_id: String, option: String },

    /// A correct answer is not one of the question's options
    #[error("Question `{question_id}` marks `{answer}` correct but it is not an option")]
    AnswerNotAnOption { question_id: String, answer: String },

    /// Single-choice questions need exactly one answer, multiple-choice at least one
    #[error("Question `{question_id}` has {count} correct answers, which its type does not allow")]
    AnswerCount { question_id: String, count: usize },

    /// A lesson points at both a circuit and a network simulator
    #[error("Lesson `{lesson_id}` references more than one simulator")]
    ConflictingSimulator { lesson_id: String },

    /// A timestamp could not be parsed
    #[error("Invalid timestamp `{value}` for {field}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// A numeric field was NaN or infinite
    #[error("Non-finite number for {field}")]
    NonFinite { field: &'static str },

    /// Month index outside 0..=11
    #[error("Month index {0} is out of range")]
    InvalidMonth(u32),

    /// Year outside what the calendar can represent
    #[error("Year {0} is out of range")]
    InvalidYear(i32),

    /// A course status change that the review workflow does not permit
    #[error("Cannot move course from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
