use chrono::{Datelike, NaiveDate};
use courseware::activity::{build_activity_map, build_month_grid, compute_streaks, MIN_WEEKS};
use courseware::analytics::{compute_course_analytics, QuizAverage, StudentProgress};
use courseware::enrollment::ActivityEntry;
use courseware::navigation::{resolve_breadcrumbs, Role, User};
use courseware::progress::compute_progress;
use courseware::quiz::{score_quiz, QuestionSubmission};
use courseware::wire::{course_from_json, enrollment_from_json, WireError};
use courseware::ValidationError;
use serde_json::json;

fn course_json() -> String {
    json!({
        "_id": "abc123",
        "title": "Quantum 101",
        "difficultyLevel": "beginner",
        "status": "published",
        "instructor": { "_id": "u9", "name": "Grace" },
        "createdAt": "2024-01-01T00:00:00Z",
        "modules": [
            { "_id": "m1", "title": "Basics", "lessons": [
                { "_id": "l1", "title": "Qubits" },
                { "_id": "l2", "title": "Measurement", "quiz": {
                    "_id": "q1", "title": "", "questions": [
                        { "_id": "x1", "question": "Pick both", "type": "multiple-choice",
                          "options": ["A", "B", "C"], "answers": ["B", "A"] },
                        { "_id": "x2", "question": "Pick one", "type": "single-choice",
                          "options": ["yes", "no"], "answers": ["no"] }
                    ]
                }}
            ]},
            { "_id": "m2", "title": "Circuits", "lessons": [
                { "_id": "l3", "title": "Bell States", "circuitId": "bell" },
                { "_id": "l4", "title": "Routing", "networkId": "mesh" }
            ]}
        ]
    })
    .to_string()
}

fn submission(pairs: &[(&str, &[&str])]) -> Vec<QuestionSubmission> {
    pairs
        .iter()
        .map(|(id, answers)| QuestionSubmission {
            question_id: id.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}

#[test]
fn test_end_to_end_progress() {
    let course = course_from_json(&course_json()).unwrap();
    let enrollment = enrollment_from_json(
        &json!({
            "courseId": "abc123",
            "studentId": "s1",
            "completions": [{ "moduleId": "m1", "completedLessons": ["l1", "l2"] }]
        })
        .to_string(),
    )
    .unwrap();

    let progress = compute_progress(&course, &enrollment);
    assert_eq!(progress.percentage, 50);
    assert_eq!(progress.current_lesson_id.as_deref(), Some("l3"));
    let per_module: Vec<(usize, usize)> = progress.per_module.iter().map(|m| (m.completed, m.total)).collect();
    assert_eq!(per_module, vec![(2, 2), (0, 2)]);
    assert!(progress.per_module[0].is_complete());
    assert!(!progress.per_module[1].is_complete());
}

#[test]
fn test_boundary_rejects_malformed_trees() {
    let mut bad: serde_json::Value = serde_json::from_str(&course_json()).unwrap();
    bad["modules"][0]["lessons"][1]["quiz"]["questions"][1]["answers"] = json!(["maybe"]);
    let err = course_from_json(&bad.to_string()).unwrap_err();
    assert!(matches!(
        err,
        WireError::Invalid(ValidationError::AnswerNotAnOption { .. })
    ));

    let mut bad: serde_json::Value = serde_json::from_str(&course_json()).unwrap();
    bad["modules"][1]["_id"] = json!("m1");
    let err = course_from_json(&bad.to_string()).unwrap_err();
    assert!(matches!(
        err,
        WireError::Invalid(ValidationError::DuplicateId { entity: "module", .. })
    ));
}

#[test]
fn test_quiz_set_semantics() {
    let course = course_from_json(&course_json()).unwrap();
    let (_, quiz) = course.find_quiz("q1").unwrap();

    let exact = score_quiz(quiz, &submission(&[("x1", &["A", "B"]), ("x2", &["no"])]), 70);
    assert_eq!(exact.score, 100);
    assert!(exact.per_question.iter().all(|q| q.was_correct));

    let superset = score_quiz(quiz, &submission(&[("x1", &["A", "B", "C"]), ("x2", &["no"])]), 70);
    assert_eq!(superset.score, 50);
    assert!(!superset.is_passed);

    let none = score_quiz(quiz, &submission(&[("ghost", &["A"])]), 70);
    assert_eq!(none.score, 0);
}

#[test]
fn test_breadcrumb_exclusion_and_course_trail() {
    assert!(resolve_breadcrumbs("/login", None, |_| None).is_empty());

    let user = User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        role: Role::Student,
    };
    let crumbs = resolve_breadcrumbs("/courses/abc123/dashboard", Some(&user), |id| {
        (id == "abc123").then(|| "Quantum 101".to_string())
    });

    let course_crumb = crumbs.iter().find(|c| c.to == "/courses/abc123").unwrap();
    assert_eq!(course_crumb.label, "Quantum 101");
    assert!(course_crumb.clickable);

    let last = crumbs.last().unwrap();
    assert_eq!(last.to, "/courses/abc123/dashboard");
    assert_eq!(last.label, "Dashboard");
    assert!(!last.clickable);
}

#[test]
fn test_analytics_drops_untitled_quizzes() {
    let course = course_from_json(&course_json()).unwrap();
    let students = vec![StudentProgress {
        student_id: "s1".to_string(),
        student_name: "Ada".to_string(),
        progress: 50,
    }];

    let unknown = vec![QuizAverage {
        quiz_id: "nowhere".to_string(),
        average_score: 80.0,
        quiz_title: None,
    }];
    let analytics = compute_course_analytics(&course, &students, &unknown, 0.0, None);
    assert!(analytics.quiz_scores.is_empty());

    // Blank quiz title falls back to the lesson title
    let known = vec![QuizAverage {
        quiz_id: "q1".to_string(),
        average_score: 80.0,
        quiz_title: None,
    }];
    let analytics = compute_course_analytics(&course, &students, &known, 0.0, None);
    assert_eq!(analytics.quiz_scores[0].quiz_name, "Measurement");
    assert_eq!(analytics.active_student_count, 1);
}

#[test]
fn test_month_grid_reconstructs_every_month() {
    for year in [1900, 2000, 2023, 2024, 2100] {
        for month_index in 0..12u32 {
            let grid = build_month_grid(year, month_index).unwrap();
            assert!(grid.len() >= MIN_WEEKS);

            let days: Vec<NaiveDate> = grid.iter().flatten().flatten().copied().collect();
            assert_eq!(days[0].day(), 1);
            assert!(days.iter().all(|d| d.month0() == month_index && d.year() == year));
            for pair in days.windows(2) {
                assert_eq!(pair[0].succ_opt(), Some(pair[1]));
            }
            let next = days.last().unwrap().succ_opt().unwrap();
            assert_ne!(next.month0(), month_index);
        }
    }
}

#[test]
fn test_activity_map_is_pure_and_streaks_follow() {
    let history: Vec<ActivityEntry> = ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-06", "2024-05-07"]
        .iter()
        .map(|d| ActivityEntry {
            date: d.to_string(),
            lessons_completed: 1,
        })
        .collect();

    let first = build_activity_map(&history);
    assert_eq!(first, build_activity_map(&history));

    let today = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
    let streaks = compute_streaks(&first, today);
    assert_eq!(streaks.current, 2);
    assert_eq!(streaks.longest, 3);
}
