//! Season calendar - maps calendar months to sequential season codes.
//!
//! The ladder runs one season per calendar month, identified by an
//! `S<number>` code. The mapping is anchored at a fixed point:
//! 2024-08 is season 32, so 2025-12 is S48 and 2026-01 is S49.

use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{date_key, DateRange};

/// Calendar anchor: `BASE_YEAR`-`BASE_MONTH` is season `BASE_SEASON`.
/// These encode the real ladder schedule; change them together if the
/// season cadence ever changes.
pub const BASE_YEAR: i32 = 2024;
pub const BASE_MONTH: u32 = 8;
pub const BASE_SEASON: i32 = 32;

/// Resolved calendar placement of a season code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    /// Canonical code ("S" + number)
    pub code: String,

    pub season_number: i32,

    pub year: i32,

    /// 1-12
    pub month: u32,

    /// First day of the season's month
    pub start: NaiveDate,

    /// Last day of the season's month
    pub end: NaiveDate,
}

impl SeasonInfo {
    /// Inclusive calendar range covering the whole season.
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

fn season_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[Ss](\d+)$").expect("season code pattern compiles"))
}

/// Extract the numeric part of an `S<number>` code, trimming surrounding
/// whitespace. `None` when the code does not match (including numbers too
/// large for `i32`).
fn parse_season_number(code: &str) -> Option<i32> {
    season_code_pattern()
        .captures(code.trim())
        .and_then(|caps| caps[1].parse().ok())
}

/// Map a season number to its calendar year and 1-12 month.
///
/// Euclidean month arithmetic carries correctly across year boundaries in
/// both directions, so seasons before the anchor resolve too.
pub fn season_number_to_year_month(season_number: i32) -> (i32, u32) {
    let total_months = BASE_YEAR * 12 + (BASE_MONTH as i32 - 1) + (season_number - BASE_SEASON);
    (total_months.div_euclid(12), total_months.rem_euclid(12) as u32 + 1)
}

/// Inverse of [`season_number_to_year_month`].
pub fn year_month_to_season_number(year: i32, month: u32) -> i32 {
    (year - BASE_YEAR) * 12 + (month as i32 - BASE_MONTH as i32) + BASE_SEASON
}

/// Resolve a season code to its calendar bounds.
///
/// Returns `None` for anything that is not `S<number>` (the prefix letter
/// is case-insensitive); callers treat that as "invalid code", never as an
/// error to propagate.
pub fn get_season_info(code: &str) -> Option<SeasonInfo> {
    let season_number = parse_season_number(code)?;
    let (year, month) = season_number_to_year_month(season_number);

    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = last_day_of_month(year, month)?;

    Some(SeasonInfo {
        code: format!("S{season_number}"),
        season_number,
        year,
        month,
        start,
        end,
    })
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Season code for today's local calendar month.
pub fn current_season_code() -> String {
    let today = Local::now().date_naive();
    format!("S{}", year_month_to_season_number(today.year(), today.month()))
}

/// `count` consecutive season codes, most recent first, starting at
/// `from_code` (or the current season when omitted). Empty when `count`
/// is non-positive or the starting code is unparseable.
pub fn recent_season_codes(count: i32, from_code: Option<&str>) -> Vec<String> {
    if count <= 0 {
        return Vec::new();
    }
    let base = match from_code {
        Some(code) => code.to_string(),
        None => current_season_code(),
    };
    let Some(start) = parse_season_number(&base) else {
        return Vec::new();
    };
    (0..count).map(|offset| format!("S{}", start - offset)).collect()
}

/// Season code for the month a date string falls in, after day-key
/// normalization. `None` when the date does not parse as `YYYY-MM-DD`.
pub fn season_code_from_date(date: &str) -> Option<String> {
    let day = NaiveDate::parse_from_str(date_key(date), "%Y-%m-%d").ok()?;
    Some(format!(
        "S{}",
        year_month_to_season_number(day.year(), day.month())
    ))
}
