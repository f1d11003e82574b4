/// Progress derivation from a course tree and an enrollment snapshot
use crate::content::Course;
use crate::enrollment::EnrollmentSnapshot;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Derived progress of one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    /// 0..=100
    pub percentage: u8,
    /// First lesson in flat order that is not completed
    pub current_lesson_id: Option<String>,
    /// One entry per module, in module order
    pub per_module: Vec<ModuleProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub completed: usize,
    pub total: usize,
}

impl ModuleProgress {
    /// True only for a non-empty module whose lessons are all completed.
    ///
    /// Empty modules report `false`; callers wanting a different display
    /// policy should check `total` themselves.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Computes progress for an enrollment against the current course tree.
///
/// Completed lesson ids that no longer exist in the tree are ignored. An
/// explicit `progress_percentage` on the snapshot wins over the derived
/// value, clamped into `0..=100`.
pub fn compute_progress(course: &Course, enrollment: &EnrollmentSnapshot) -> CourseProgress {
    let completed: HashSet<&str> = enrollment.completed_lesson_ids().collect();

    let total = course.lesson_count();
    let mut done = 0usize;
    let mut current_lesson_id = None;

    for lesson in course.flat_lessons() {
        if completed.contains(lesson.id.as_str()) {
            done += 1;
        } else if current_lesson_id.is_none() {
            current_lesson_id = Some(lesson.id.clone());
        }
    }

    if completed.len() > done {
        debug!(
            course_id = %course.id,
            student_id = %enrollment.student_id,
            stale = completed.len() - done,
            "Ignoring completed lessons that are not in the course tree"
        );
    }

    let percentage = match enrollment.progress_percentage {
        Some(explicit) => explicit.clamp(0, 100) as u8,
        None => rounded_percentage(done, total),
    };

    let per_module = course
        .modules
        .iter()
        .map(|module| ModuleProgress {
            module_id: module.id.clone(),
            completed: module
                .lessons
                .iter()
                .filter(|l| completed.contains(l.id.as_str()))
                .count(),
            total: module.lessons.len(),
        })
        .collect();

    CourseProgress {
        percentage,
        current_lesson_id,
        per_module,
    }
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
pub(crate) fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::*;
    use crate::enrollment::ModuleCompletion;

    fn enrollment(entries: &[(&str, &[&str])]) -> EnrollmentSnapshot {
        EnrollmentSnapshot {
            course_id: "c1".to_string(),
            student_id: "s1".to_string(),
            completions: entries
                .iter()
                .map(|(m, ls)| ModuleCompletion {
                    module_id: m.to_string(),
                    lesson_ids: ls.iter().map(|l| l.to_string()).collect(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_half_complete_two_by_two() {
        let progress = compute_progress(&two_by_two(), &enrollment(&[("m1", &["l1", "l2"])]));

        assert_eq!(progress.percentage, 50);
        assert_eq!(progress.current_lesson_id.as_deref(), Some("l3"));
        assert_eq!(
            progress.per_module,
            vec![
                ModuleProgress { module_id: "m1".into(), completed: 2, total: 2 },
                ModuleProgress { module_id: "m2".into(), completed: 0, total: 2 },
            ]
        );
        assert!(progress.per_module[0].is_complete());
        assert!(!progress.per_module[1].is_complete());
    }

    #[test]
    fn test_all_complete_has_no_current_lesson() {
        let progress = compute_progress(
            &two_by_two(),
            &enrollment(&[("m1", &["l1", "l2"]), ("m2", &["l4", "l3"])]),
        );
        assert_eq!(progress.percentage, 100);
        assert_eq!(progress.current_lesson_id, None);
    }

    #[test]
    fn test_current_lesson_skips_out_of_order_completions() {
        let progress = compute_progress(&two_by_two(), &enrollment(&[("m2", &["l3"]), ("m1", &["l2"])]));
        assert_eq!(progress.current_lesson_id.as_deref(), Some("l1"));
        assert_eq!(progress.percentage, 50);
    }

    #[test]
    fn test_stale_lessons_are_ignored() {
        let progress = compute_progress(&two_by_two(), &enrollment(&[("m9", &["gone", "l1"])]));
        assert_eq!(progress.percentage, 25);
        assert_eq!(progress.per_module[0].completed, 1);
    }

    #[test]
    fn test_empty_course_reports_zero() {
        let course = course(vec![module("m1", &[])]);
        let progress = compute_progress(&course, &enrollment(&[("m1", &["l1"])]));
        assert_eq!(progress.percentage, 0);
        assert_eq!(progress.current_lesson_id, None);
        assert_eq!(progress.per_module[0].total, 0);
        assert!(!progress.per_module[0].is_complete());
    }

    #[test]
    fn test_explicit_percentage_is_clamped() {
        let mut snapshot = enrollment(&[]);
        snapshot.progress_percentage = Some(140);
        assert_eq!(compute_progress(&two_by_two(), &snapshot).percentage, 100);

        snapshot.progress_percentage = Some(-3);
        assert_eq!(compute_progress(&two_by_two(), &snapshot).percentage, 0);

        snapshot.progress_percentage = Some(42);
        assert_eq!(compute_progress(&two_by_two(), &snapshot).percentage, 42);
    }

    #[test]
    fn test_rounding_matches_half_up() {
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn test_adding_completions_never_lowers_percentage() {
        let course = course(vec![module("m1", &["a", "b", "c"]), module("m2", &["d", "e", "f", "g"])]);
        let order = ["e", "zzz", "a", "g", "b", "c", "d", "f"];

        let mut previous = 0;
        for n in 0..=order.len() {
            let snapshot = enrollment(&[("any", &order[..n])]);
            let pct = compute_progress(&course, &snapshot).percentage;
            assert!(pct >= previous, "{pct} < {previous} after {n} completions");
            assert!(pct <= 100);
            previous = pct;
        }
        assert_eq!(previous, 100);
    }
}
