//! Match records - one logged ladder game each.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Fallback archetype label for a deck with no recorded main archetype.
pub const UNKNOWN_DECK: &str = "未知";

/// Which ladder queue a match was played in. Not used in aggregation math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Ranked,
    Rating,
    #[serde(rename = "DC")]
    Dc,
}

/// Whether the player moved first or second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOrder {
    #[serde(rename = "先攻")]
    First,
    #[serde(rename = "後攻")]
    Second,
}

/// Game outcome from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl MatchResult {
    pub fn is_win(&self) -> bool {
        matches!(self, MatchResult::Win)
    }
}

/// A deck as recorded on a match: a primary archetype plus an optional
/// secondary one. Only `main` feeds aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub main: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl Deck {
    pub fn new(main: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            sub: None,
        }
    }

    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }
}

/// One logged ladder match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Unique identifier
    pub id: MatchId,

    /// Season the match was logged under ("S<number>")
    pub season_code: String,

    /// `YYYY-MM-DD`, or an ISO-8601 timestamp from older imports
    pub date: String,

    /// Ladder queue type
    #[serde(default)]
    pub mode: GameMode,

    /// Display rank at the time of the match
    pub rank: String,

    /// The player's deck
    pub my_deck: Deck,

    /// The opponent's deck
    pub opp_deck: Deck,

    /// Who moved first
    pub play_order: PlayOrder,

    /// Win or loss
    pub result: MatchResult,

    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Day bucket for this match: the date-only prefix of `date`.
    pub fn date_key(&self) -> &str {
        date_key(&self.date)
    }
}

/// Normalize a stored date string to its `YYYY-MM-DD` day key.
///
/// Timestamps keep only the part before the first `T`; plain dates pass
/// through verbatim. No timezone conversion happens anywhere in the day
/// bucketing path.
pub fn date_key(raw: &str) -> &str {
    match raw.find('T') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}
