//! The application route table.
//!
//! One table serves both the router (which page does a path render) and the
//! breadcrumb resolver (which accumulated prefixes are links).

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// The built-in route table.
pub static ROUTES: LazyLock<RouteTable> = LazyLock::new(|| {
    RouteTable::new(STANDARD_ROUTES, STANDARD_EXCLUDED).expect("built-in route templates are valid")
});

/// `(template, linkable)`; `:name` segments match any single segment.
const STANDARD_ROUTES: &[(&str, bool)] = &[
    ("/", true),
    ("/login", true),
    ("/register", true),
    ("/forgot-password", true),
    ("/reset-password/:token", false),
    ("/dashboard", true),
    ("/courses", true),
    ("/courses/:courseId", true),
    // Rendered, but breadcrumbs never link to it
    ("/courses/:courseId/dashboard", false),
    ("/courses/:courseId/lessons/:lessonId", true),
    ("/courses/:courseId/lessons/:lessonId/quiz", false),
    ("/my-courses", true),
    ("/recommended-courses", true),
    ("/achievements", true),
    ("/profile", true),
    ("/simulators", true),
    ("/simulators/circuit", true),
    ("/simulators/circuit/:circuitId", false),
    ("/simulators/network", true),
    ("/simulators/network/:networkId", false),
    ("/educator/dashboard", true),
    ("/educator/courses", true),
    ("/educator/courses/new", true),
    ("/educator/courses/:courseId/edit", true),
    ("/educator/courses/:courseId/analytics", true),
    ("/admin/dashboard", true),
    ("/admin/courses", true),
    ("/admin/courses/:courseId", true),
    ("/admin/users", true),
    ("/site-admin/dashboard", true),
    ("/site-admin/users", true),
    ("/site-admin/courses", true),
    ("/site-admin/settings", true),
];

/// Paths that render no breadcrumb trail at all.
const STANDARD_EXCLUDED: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/dashboard",
    "/educator",
    "/educator/dashboard",
    "/admin",
    "/admin/dashboard",
    "/site-admin",
    "/site-admin/dashboard",
];

#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub template: &'static str,
    /// Whether breadcrumbs may render this route as a link
    pub linkable: bool,
    #[serde(skip)]
    params: Vec<&'static str>,
    #[serde(skip)]
    matcher: Regex,
}

impl Route {
    fn new(template: &'static str, linkable: bool) -> Result<Self, regex::Error> {
        let mut pattern = String::from("^");
        let mut params = Vec::new();

        for segment in template.split('/').filter(|s| !s.is_empty()) {
            pattern.push('/');
            match segment.strip_prefix(':') {
                Some(name) => {
                    params.push(name);
                    pattern.push_str("([^/]+)");
                }
                None => pattern.push_str(&regex::escape(segment)),
            }
        }
        if params.is_empty() && pattern.len() == 1 {
            pattern.push('/');
        }
        pattern.push('$');

        Ok(Self {
            template,
            linkable,
            params,
            matcher: Regex::new(&pattern)?,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

/// A matched route with its dynamic segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub template: &'a str,
    pub params: Vec<(&'a str, String)>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    routes: Vec<Route>,
    excluded: Vec<&'static str>,
}

impl RouteTable {
    /// Builds a table from `(template, linkable)` pairs and excluded paths.
    pub fn new(routes: &[(&'static str, bool)], excluded: &[&'static str]) -> Result<Self, regex::Error> {
        Ok(Self {
            routes: routes
                .iter()
                .map(|&(template, linkable)| Route::new(template, linkable))
                .collect::<Result<_, _>>()?,
            excluded: excluded.to_vec(),
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolves a path to the first route that matches it.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        self.routes.iter().find_map(|route| {
            let caps = route.matcher.captures(&path)?;
            let params = route
                .params
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (*name, m.as_str().to_string())))
                .collect();
            Some(RouteMatch {
                template: route.template,
                params,
            })
        })
    }

    /// True if some linkable route matches `path`.
    pub fn is_linkable(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.routes.iter().any(|r| r.linkable && r.is_match(&path))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.excluded.iter().any(|e| *e == path)
    }
}

/// Drops query, fragment, repeated and trailing slashes.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
