//! Activity aggregation: per-day counts, intensity tiers and streaks.

mod calendar;

pub use calendar::*;

use crate::enrollment::ActivityEntry;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Lessons completed per calendar day.
pub type ActivityMap = BTreeMap<NaiveDate, u32>;

/// Buckets activity history into a per-day count map.
///
/// Entries falling on the same day are summed. Dates that cannot be parsed
/// are skipped.
pub fn build_activity_map(history: &[ActivityEntry]) -> ActivityMap {
    let mut map = ActivityMap::new();

    for entry in history {
        match parse_activity_date(&entry.date) {
            Some(day) => {
                let count = map.entry(day).or_insert(0);
                *count = count.saturating_add(entry.lessons_completed);
            }
            None => debug!(date = %entry.date, "Skipping activity entry with unparseable date"),
        }
    }

    map
}

/// Renders an activity map with `YYYY-MM-DD` keys.
pub fn keyed_by_day(map: &ActivityMap) -> BTreeMap<String, u32> {
    map.iter()
        .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), *count))
        .collect()
}

/// Accepts plain dates, RFC 3339 timestamps and offset-less ISO timestamps.
fn parse_activity_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

/// Display tier for a heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    None,
    Light,
    Medium,
    Dark,
    /// Today with no activity yet
    Today,
}

impl ActivityLevel {
    pub fn for_count(count: u32, is_today: bool) -> Self {
        match count {
            0 if is_today => ActivityLevel::Today,
            0 => ActivityLevel::None,
            1 => ActivityLevel::Light,
            2 => ActivityLevel::Medium,
            _ => ActivityLevel::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    /// Consecutive active days ending on `today`
    pub current: u32,
    /// Longest run of consecutive active days anywhere in the map
    pub longest: u32,
}

/// Computes current and longest streaks of days with at least one lesson.
pub fn compute_streaks(map: &ActivityMap, today: NaiveDate) -> Streaks {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for (&day, _) in map.iter().filter(|(_, &count)| count > 0) {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    let mut current = 0u32;
    let mut day = today;
    while map.get(&day).is_some_and(|&count| count > 0) {
        current += 1;
        day = match day.checked_sub_signed(Duration::days(1)) {
            Some(d) => d,
            None => break,
        };
    }

    Streaks { current, longest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, n: u32) -> ActivityEntry {
        ActivityEntry {
            date: date.to_string(),
            lessons_completed: n,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_build_activity_map_sums_and_skips() {
        let history = vec![
            entry("2024-03-01", 1),
            entry("2024-03-01T18:30:00Z", 2),
            entry("2024-03-02T08:00:00.000", 1),
            entry("not a date", 5),
            entry("2024-02-30", 4),
        ];
        let map = build_activity_map(&history);

        assert_eq!(map.len(), 2);
        assert_eq!(map[&day("2024-03-01")], 3);
        assert_eq!(map[&day("2024-03-02")], 1);
        assert_eq!(build_activity_map(&history), map);

        let keyed = keyed_by_day(&map);
        assert_eq!(keyed.get("2024-03-01"), Some(&3));
    }

    #[test]
    fn test_activity_levels() {
        assert_eq!(ActivityLevel::for_count(0, false), ActivityLevel::None);
        assert_eq!(ActivityLevel::for_count(0, true), ActivityLevel::Today);
        assert_eq!(ActivityLevel::for_count(1, true), ActivityLevel::Light);
        assert_eq!(ActivityLevel::for_count(2, false), ActivityLevel::Medium);
        assert_eq!(ActivityLevel::for_count(7, false), ActivityLevel::Dark);
    }

    #[test]
    fn test_streaks() {
        let history = vec![
            entry("2024-03-01", 1),
            entry("2024-03-02", 1),
            entry("2024-03-03", 2),
            entry("2024-03-05", 0),
            entry("2024-03-09", 1),
            entry("2024-03-10", 1),
        ];
        let map = build_activity_map(&history);

        assert_eq!(
            compute_streaks(&map, day("2024-03-10")),
            Streaks { current: 2, longest: 3 }
        );
        assert_eq!(compute_streaks(&map, day("2024-03-11")).current, 0);
        assert_eq!(compute_streaks(&map, day("2024-03-05")).current, 0);
        assert_eq!(compute_streaks(&ActivityMap::new(), day("2024-03-05")), Streaks::default());
    }

    #[test]
    fn test_streak_spans_month_boundary() {
        let map = build_activity_map(&[entry("2024-02-28", 1), entry("2024-02-29", 1), entry("2024-03-01", 1)]);
        assert_eq!(compute_streaks(&map, day("2024-03-01")), Streaks { current: 3, longest: 3 });
    }
}
