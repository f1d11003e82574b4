use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::invalid_payload;
use crate::activity::{build_activity_map, build_year_heatmap, compute_streaks, keyed_by_day};
use crate::enrollment::ActivityEntry;
use crate::wire::RawActivity;

#[derive(Debug, Deserialize)]
pub struct ActivityBody {
    #[serde(default)]
    pub history: Vec<RawActivity>,
    /// Heatmap year; defaults to the year of `today`
    pub year: Option<i32>,
    /// Defaults to the current UTC date
    pub today: Option<NaiveDate>,
}

/// POST /activity
///
/// Returns the per-day activity map, streaks and a year heatmap.
pub async fn post_activity(Json(body): Json<ActivityBody>) -> Response {
    let today = body.today.unwrap_or_else(|| Utc::now().date_naive());
    let year = body.year.unwrap_or_else(|| today.year());

    let history: Vec<ActivityEntry> = body.history.into_iter().map(ActivityEntry::from).collect();
    let map = build_activity_map(&history);

    let heatmap = match build_year_heatmap(year, &map, today) {
        Ok(heatmap) => heatmap,
        Err(e) => return invalid_payload("activity year", e),
    };
    let streaks = compute_streaks(&map, today);

    info!(
        days = map.len(),
        current_streak = streaks.current,
        longest_streak = streaks.longest,
        "POST /activity"
    );
    (
        StatusCode::OK,
        Json(json!({
            "activity": keyed_by_day(&map),
            "streaks": streaks,
            "year": year,
            "months": heatmap,
        })),
    )
        .into_response()
}
