//! Roles and the explicit session context.

use serde::{Deserialize, Serialize};

/// Closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Student,
    Educator,
    #[serde(alias = "course_admin", alias = "course-admin", alias = "admin")]
    CourseAdministrator,
    #[serde(alias = "site_admin", alias = "site-admin", alias = "system_admin")]
    SystemAdministrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Everything the presentation layer varies by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleProfile {
    pub role: Role,
    pub display_name: &'static str,
    pub dashboard_path: &'static str,
    pub nav_items: &'static [NavItem],
}

const STUDENT_NAV: &[NavItem] = &[
    NavItem { label: "Dashboard", path: "/dashboard" },
    NavItem { label: "Courses", path: "/courses" },
    NavItem { label: "My Courses", path: "/my-courses" },
    NavItem { label: "Recommended", path: "/recommended-courses" },
    NavItem { label: "Achievements", path: "/achievements" },
    NavItem { label: "Simulators", path: "/simulators" },
    NavItem { label: "Profile", path: "/profile" },
];

const EDUCATOR_NAV: &[NavItem] = &[
    NavItem { label: "Dashboard", path: "/educator/dashboard" },
    NavItem { label: "My Courses", path: "/educator/courses" },
    NavItem { label: "New Course", path: "/educator/courses/new" },
    NavItem { label: "Simulators", path: "/simulators" },
    NavItem { label: "Profile", path: "/profile" },
];

const COURSE_ADMIN_NAV: &[NavItem] = &[
    NavItem { label: "Dashboard", path: "/admin/dashboard" },
    NavItem { label: "Course Review", path: "/admin/courses" },
    NavItem { label: "Users", path: "/admin/users" },
    NavItem { label: "Profile", path: "/profile" },
];

const SYSTEM_ADMIN_NAV: &[NavItem] = &[
    NavItem { label: "Dashboard", path: "/site-admin/dashboard" },
    NavItem { label: "Users", path: "/site-admin/users" },
    NavItem { label: "Courses", path: "/site-admin/courses" },
    NavItem { label: "Settings", path: "/site-admin/settings" },
    NavItem { label: "Profile", path: "/profile" },
];

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Educator,
        Role::CourseAdministrator,
        Role::SystemAdministrator,
    ];

    pub fn profile(&self) -> RoleProfile {
        match self {
            Role::Student => RoleProfile {
                role: *self,
                display_name: "Student",
                dashboard_path: "/dashboard",
                nav_items: STUDENT_NAV,
            },
            Role::Educator => RoleProfile {
                role: *self,
                display_name: "Educator",
                dashboard_path: "/educator/dashboard",
                nav_items: EDUCATOR_NAV,
            },
            Role::CourseAdministrator => RoleProfile {
                role: *self,
                display_name: "Course Administrator",
                dashboard_path: "/admin/dashboard",
                nav_items: COURSE_ADMIN_NAV,
            },
            Role::SystemAdministrator => RoleProfile {
                role: *self,
                display_name: "System Administrator",
                dashboard_path: "/site-admin/dashboard",
                nav_items: SYSTEM_ADMIN_NAV,
            },
        }
    }

    pub fn dashboard_path(&self) -> &'static str {
        self.profile().dashboard_path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
}

/// Request-scoped session, passed explicitly instead of read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Where "Home" points: the role dashboard, or the landing page.
    pub fn home_path(&self) -> &'static str {
        self.user.as_ref().map_or("/", |u| u.role.dashboard_path())
    }
}
