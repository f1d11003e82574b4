//! Calendar grids for the activity heatmap.

use super::{ActivityLevel, ActivityMap};
use crate::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Week rows every grid is padded up to, so month panels line up.
pub const MIN_WEEKS: usize = 5;

/// Seven cells, Sunday first.
pub type Week = [Option<NaiveDate>; 7];

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

/// Lays out a month as Sunday-first weeks.
///
/// Cells before day 1 and after the last day are `None`; grids shorter than
/// [`MIN_WEEKS`] rows are padded with empty weeks.
///
/// # Arguments
/// * `year` - Calendar year
/// * `month_index` - Zero-based month (0 = January)
pub fn build_month_grid(year: i32, month_index: u32) -> Result<Vec<Week>, ValidationError> {
    if month_index > 11 {
        return Err(ValidationError::InvalidMonth(month_index));
    }
    let first = NaiveDate::from_ymd_opt(year, month_index + 1, 1).ok_or(ValidationError::InvalidYear(year))?;
    let days = days_in_month(first).ok_or(ValidationError::InvalidYear(year))?;

    let mut weeks = Vec::with_capacity(6);
    let mut week: Week = [None; 7];
    let mut column = first.weekday().num_days_from_sunday() as usize;

    for day in first.iter_days().take(days as usize) {
        week[column] = Some(day);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    while weeks.len() < MIN_WEEKS {
        weeks.push([None; 7]);
    }

    Ok(weeks)
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// One day in the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: ActivityLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthHeatmap {
    pub month_index: u32,
    pub name: &'static str,
    pub weeks: Vec<[Option<HeatCell>; 7]>,
}

/// Builds the twelve month panels of a year heatmap from an activity map.
pub fn build_year_heatmap(
    year: i32,
    activity: &ActivityMap,
    today: NaiveDate,
) -> Result<Vec<MonthHeatmap>, ValidationError> {
    (0..12u32)
        .map(|month_index| {
            let weeks = build_month_grid(year, month_index)?
                .into_iter()
                .map(|week| {
                    week.map(|cell| {
                        cell.map(|date| {
                            let count = activity.get(&date).copied().unwrap_or(0);
                            HeatCell {
                                date,
                                count,
                                level: ActivityLevel::for_count(count, date == today),
                            }
                        })
                    })
                })
                .collect();

            Ok(MonthHeatmap {
                month_index,
                name: MONTH_NAMES[month_index as usize],
                weeks,
            })
        })
        .collect()
}
