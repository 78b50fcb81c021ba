//! Season statistics engine.
//!
//! Computes the aggregated view of a match population:
//! - Overall and play-order win rates
//! - Per-deck breakdowns for both sides of the table
//! - A daily time series, contiguous when a calendar range is supplied
//!
//! Everything here is a pure function of its inputs; callers scope the
//! match list (season, deck, date sub-range) before calling in.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    DailyStatRow, DateRange, DeckStatRow, Match, PlayOrder, SeasonStats, UNKNOWN_DECK,
};

/// Percentage of `part` in `total`; 0 when `total` is zero.
fn rate(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Percentage with a "no data" state: `None` when `total` is zero.
/// Daily rows use this so an empty day is distinguishable from an 0% day.
fn rate_opt(part: u32, total: u32) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64 * 100.0)
}

#[derive(Debug, Default, Clone, Copy)]
struct WinLoss {
    wins: u32,
    losses: u32,
}

impl WinLoss {
    fn record(&mut self, win: bool) {
        if win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    fn games(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Accumulate win/loss counters per deck label and rank the result by games
/// played, descending. One implementation serves both deck axes; `key`
/// selects which side of the table to group by.
pub fn deck_breakdown<'a, F>(matches: &'a [Match], key: F) -> Vec<DeckStatRow>
where
    F: Fn(&'a Match) -> &'a str,
{
    let mut counters: HashMap<&str, WinLoss> = HashMap::new();
    for m in matches {
        let label = key(m);
        let label = if label.is_empty() { UNKNOWN_DECK } else { label };
        counters.entry(label).or_default().record(m.result.is_win());
    }

    let mut rows: Vec<DeckStatRow> = counters
        .into_iter()
        .map(|(name, counts)| DeckStatRow {
            name: name.to_string(),
            games: counts.games(),
            wins: counts.wins,
            losses: counts.losses,
            win_rate: rate(counts.wins, counts.games()),
        })
        .collect();
    rows.sort_by(|a, b| b.games.cmp(&a.games));
    rows
}

/// Per-day tallies, prior to rate derivation.
#[derive(Debug, Default, Clone, Copy)]
struct DayAccumulator {
    wins: u32,
    losses: u32,
    first: u32,
    second: u32,
    first_wins: u32,
    first_losses: u32,
    second_wins: u32,
    second_losses: u32,
}

impl DayAccumulator {
    fn record(&mut self, m: &Match) {
        let win = m.result.is_win();
        if win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        match m.play_order {
            PlayOrder::First => {
                self.first += 1;
                if win {
                    self.first_wins += 1;
                } else {
                    self.first_losses += 1;
                }
            }
            PlayOrder::Second => {
                self.second += 1;
                if win {
                    self.second_wins += 1;
                } else {
                    self.second_losses += 1;
                }
            }
        }
    }

    fn into_row(self, date: String) -> DailyStatRow {
        let games = self.wins + self.losses;
        DailyStatRow {
            date,
            games,
            wins: self.wins,
            losses: self.losses,
            first: self.first,
            second: self.second,
            first_wins: self.first_wins,
            first_losses: self.first_losses,
            second_wins: self.second_wins,
            second_losses: self.second_losses,
            first_rate: rate_opt(self.first, games),
            win_rate: rate_opt(self.wins, games),
            first_win_rate: rate_opt(self.first_wins, self.first),
            second_win_rate: rate_opt(self.second_wins, self.second),
        }
    }
}

/// Build the complete [`SeasonStats`] for a match population.
///
/// With `range`, the daily series carries one row for every day in it,
/// inclusive and ascending, zero-filled (rates `None`) where nothing was
/// played. Without a range, only days that saw at least one match appear,
/// ascending by date key.
pub fn build_season_stats(matches: &[Match], range: Option<&DateRange>) -> SeasonStats {
    let total = matches.len() as u32;
    let wins = matches.iter().filter(|m| m.result.is_win()).count() as u32;
    let losses = total - wins;

    let first_count = matches
        .iter()
        .filter(|m| m.play_order == PlayOrder::First)
        .count() as u32;
    let second_count = total - first_count;
    let first_wins = matches
        .iter()
        .filter(|m| m.play_order == PlayOrder::First && m.result.is_win())
        .count() as u32;
    let second_wins = wins - first_wins;

    let opp_decks = deck_breakdown(matches, |m| m.opp_deck.main.as_str());
    let my_decks = deck_breakdown(matches, |m| m.my_deck.main.as_str());

    // BTreeMap keeps day keys in ascending string order, which is the
    // required ordering for the unranged series.
    let mut days: BTreeMap<String, DayAccumulator> = BTreeMap::new();
    for m in matches {
        days.entry(m.date_key().to_string()).or_default().record(m);
    }

    let daily = match range {
        Some(range) => {
            let mut rows = Vec::new();
            let mut day = range.start;
            while day <= range.end {
                let key = day.to_string();
                let tallies = days.get(&key).copied().unwrap_or_default();
                rows.push(tallies.into_row(key));
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
            rows
        }
        None => days
            .into_iter()
            .map(|(date, tallies)| tallies.into_row(date))
            .collect(),
    };

    SeasonStats {
        total,
        wins,
        losses,
        win_rate: rate(wins, total),
        first_count,
        second_count,
        first_wins,
        second_wins,
        first_rate: rate(first_count, total),
        first_win_rate: rate(first_wins, first_count),
        second_win_rate: rate(second_wins, second_count),
        opp_decks,
        my_decks,
        daily,
    }
}
