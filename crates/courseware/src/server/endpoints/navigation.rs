use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

use crate::navigation::{resolve_breadcrumbs, Role, User, ROUTES};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbBody {
    pub pathname: String,
    #[serde(default)]
    pub user: Option<User>,
    /// Known course titles by id
    #[serde(default)]
    pub course_titles: HashMap<String, String>,
}

/// POST /navigation/breadcrumbs
pub async fn post_breadcrumbs(Json(body): Json<BreadcrumbBody>) -> Response {
    let crumbs = resolve_breadcrumbs(&body.pathname, body.user.as_ref(), |id| {
        body.course_titles.get(id).cloned()
    });
    info!(pathname = %body.pathname, crumbs = crumbs.len(), "POST /navigation/breadcrumbs");
    (StatusCode::OK, Json(crumbs)).into_response()
}

/// GET /navigation/routes
pub async fn get_routes() -> Response {
    (StatusCode::OK, Json(ROUTES.routes())).into_response()
}

/// GET /navigation/roles
pub async fn get_role_profiles() -> Response {
    let profiles: Vec<_> = Role::ALL.iter().map(Role::profile).collect();
    (StatusCode::OK, Json(profiles)).into_response()
}
