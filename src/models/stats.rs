//! Derived statistics models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar range for a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Per-deck win/loss summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStatRow {
    pub name: String,

    /// wins + losses, always
    pub games: u32,

    pub wins: u32,

    pub losses: u32,

    /// 0-100; 0 when no games
    pub win_rate: f64,
}

/// One calendar day of the daily series.
///
/// Rate fields are `None` when their denominator is zero: a day with no
/// matches reads as "no data", not as a 0% day. This is deliberately
/// different from the aggregate rates on [`SeasonStats`], which use 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatRow {
    /// `YYYY-MM-DD`
    pub date: String,

    pub games: u32,
    pub wins: u32,
    pub losses: u32,

    /// Games going first / second that day
    pub first: u32,
    pub second: u32,

    pub first_wins: u32,
    pub first_losses: u32,
    pub second_wins: u32,
    pub second_losses: u32,

    /// Share of games going first (of that day's games)
    pub first_rate: Option<f64>,
    pub win_rate: Option<f64>,
    pub first_win_rate: Option<f64>,
    pub second_win_rate: Option<f64>,
}

/// Complete aggregation result for one population of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStats {
    pub total: u32,
    pub wins: u32,
    pub losses: u32,

    /// 0-100; 0 when no matches
    pub win_rate: f64,

    pub first_count: u32,
    pub second_count: u32,
    pub first_wins: u32,
    pub second_wins: u32,

    /// Share of all matches that went first
    pub first_rate: f64,
    pub first_win_rate: f64,
    pub second_win_rate: f64,

    /// Ranked by games played, descending
    pub opp_decks: Vec<DeckStatRow>,
    pub my_decks: Vec<DeckStatRow>,

    /// Ascending by date; contiguous when built with a range
    pub daily: Vec<DailyStatRow>,
}
