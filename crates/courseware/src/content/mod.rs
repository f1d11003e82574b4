/// Course content tree: Course -> Module -> Lesson -> Quiz -> Question
mod types;

pub use types::*;

use crate::error::ValidationError;
use tracing::info;

impl CourseStatus {
    /// Returns true if the review workflow allows moving to `next`.
    ///
    /// Drafts are submitted for review, reviews end in publication or
    /// rejection, and a rejected course goes back to draft for rework.
    pub fn can_transition_to(&self, next: CourseStatus) -> bool {
        matches!(
            (self, next),
            (CourseStatus::Draft, CourseStatus::UnderReview)
                | (CourseStatus::UnderReview, CourseStatus::Published)
                | (CourseStatus::UnderReview, CourseStatus::Rejected)
                | (CourseStatus::Rejected, CourseStatus::Draft)
        )
    }
}

impl Course {
    /// Iterates all lessons in flat order (modules in order, then lessons in order).
    pub fn flat_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    /// Total number of lessons across all modules.
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Finds a lesson anywhere in the tree by id.
    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.flat_lessons().find(|l| l.id == lesson_id)
    }

    /// Returns `(module index, lesson index)` of a lesson.
    pub fn lesson_position(&self, lesson_id: &str) -> Option<(usize, usize)> {
        self.modules.iter().enumerate().find_map(|(mi, m)| {
            m.lessons
                .iter()
                .position(|l| l.id == lesson_id)
                .map(|li| (mi, li))
        })
    }

    /// Finds a quiz by id together with the lesson that carries it.
    pub fn find_quiz(&self, quiz_id: &str) -> Option<(&Lesson, &Quiz)> {
        self.flat_lessons().find_map(|lesson| {
            lesson
                .quiz
                .as_ref()
                .filter(|q| q.id == quiz_id)
                .map(|q| (lesson, q))
        })
    }

    /// Moves the course to a new review status.
    ///
    /// # Returns
    /// * `Ok(previous)` - The status the course had before
    /// * `Err(ValidationError::InvalidTransition)` - If the workflow forbids the move
    pub fn transition_status(&mut self, next: CourseStatus) -> Result<CourseStatus, ValidationError> {
        if !self.status.can_transition_to(next) {
            return Err(ValidationError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        let previous = std::mem::replace(&mut self.status, next);
        info!(course_id = %self.id, from = %previous, to = %next, "Course status changed");
        Ok(previous)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub fn lesson(id: &str) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: format!("Lesson {id}"),
            content: None,
            quiz: None,
            simulator: None,
        }
    }

    pub fn module(id: &str, lessons: &[&str]) -> Module {
        Module {
            id: id.to_string(),
            title: format!("Module {id}"),
            lessons: lessons.iter().map(|l| lesson(l)).collect(),
        }
    }

    pub fn question(id: &str, kind: QuestionType, options: &[&str], answers: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {id}"),
            kind,
            options: options.iter().map(|s| s.to_string()).collect(),
            answers: answers.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn course(modules: Vec<Module>) -> Course {
        Course {
            id: "c1".to_string(),
            title: "Quantum 101".to_string(),
            subtitle: String::new(),
            description: String::new(),
            thumbnail_url: None,
            category: "physics".to_string(),
            difficulty_level: Difficulty::Beginner,
            prerequisites: Vec::new(),
            instructor: Instructor {
                id: "i1".to_string(),
                name: "Ada".to_string(),
            },
            status: CourseStatus::Draft,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            notebook_url: None,
            modules,
        }
    }

    /// Two modules with two lessons each: l1, l2 | l3, l4.
    pub fn two_by_two() -> Course {
        course(vec![module("m1", &["l1", "l2"]), module("m2", &["l3", "l4"])])
    }
}
