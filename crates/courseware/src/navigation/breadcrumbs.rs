//! Breadcrumb trails reconstructed from the current path.

use super::routes::{normalize_path, RouteTable, ROUTES};
use super::session::User;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub to: String,
    pub label: String,
    pub clickable: bool,
}

/// Segments that start a role dashboard area.
const DASHBOARD_KEYWORDS: &[&str] = &["dashboard", "educator", "admin", "site-admin"];

const KEYWORD_LABELS: &[(&str, &str)] = &[
    ("dashboard", "Dashboard"),
    ("courses", "Courses"),
    ("quiz", "Quiz"),
    ("lessons", "Lessons"),
    ("achievements", "Achievements"),
    ("profile", "Profile"),
    ("educator", "Educator Portal"),
    ("admin", "Course Admin"),
    ("site-admin", "Site Admin"),
    ("simulators", "Simulators"),
    ("circuit", "Circuit Simulator"),
    ("network", "Network Simulator"),
    ("my-courses", "My Courses"),
    ("recommended-courses", "Recommended Courses"),
];

/// Resolves breadcrumbs against the built-in route table.
///
/// # Arguments
/// * `pathname` - Current location path
/// * `user` - Signed-in user, if any
/// * `course_title` - Looks up a course title by id
pub fn resolve_breadcrumbs<F>(pathname: &str, user: Option<&User>, course_title: F) -> Vec<Breadcrumb>
where
    F: Fn(&str) -> Option<String>,
{
    resolve_breadcrumbs_with(&ROUTES, pathname, user, course_title)
}

/// Resolves breadcrumbs against `table`.
///
/// Excluded paths yield an empty trail. Otherwise the trail starts at Home
/// (the role dashboard when signed in) and adds one crumb per segment; a
/// crumb is clickable only when its accumulated path is a linkable route.
pub fn resolve_breadcrumbs_with<F>(
    table: &RouteTable,
    pathname: &str,
    user: Option<&User>,
    course_title: F,
) -> Vec<Breadcrumb>
where
    F: Fn(&str) -> Option<String>,
{
    if table.is_excluded(pathname) {
        return Vec::new();
    }

    let home = user.map_or("/", |u| u.role.dashboard_path());
    let mut crumbs = vec![Breadcrumb {
        to: home.to_string(),
        label: "Home".to_string(),
        clickable: table.is_linkable(home),
    }];

    let normalized = normalize_path(pathname);
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let mut accumulated = String::new();

    for (index, &segment) in segments.iter().enumerate() {
        accumulated.push('/');
        accumulated.push_str(segment);

        let label = if index == 0 && DASHBOARD_KEYWORDS.contains(&segment) {
            // Signed-in users reach this area through Home already.
            if user.is_some() {
                continue;
            }
            humanize(segment)
        } else {
            match index.checked_sub(1).map(|i| segments[i]) {
                Some("courses") => course_title(segment)
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| format!("Course {segment}")),
                Some("lessons") => format!("Lesson {segment}"),
                _ => keyword_label(segment).map_or_else(|| humanize(segment), str::to_string),
            }
        };

        crumbs.push(Breadcrumb {
            to: accumulated.clone(),
            label,
            clickable: table.is_linkable(&accumulated),
        });
    }

    crumbs
}

fn keyword_label(segment: &str) -> Option<&'static str> {
    KEYWORD_LABELS
        .iter()
        .find(|(keyword, _)| *keyword == segment)
        .map(|(_, label)| *label)
}

/// `"recommended_courses-v2"` -> `"Recommended Courses V2"`.
pub fn humanize(segment: &str) -> String {
    let words: Vec<String> = segment
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        segment.to_string()
    } else {
        words.join(" ")
    }
}
