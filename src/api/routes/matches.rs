use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{
    Deck, DeckTemplate, GameMode, Match, MatchId, MatchResult, PlayOrder, NONE_LABEL,
};
use crate::storage;

/// Placeholder rank stored for queues that have no visible rank.
const RANK_PLACEHOLDER: &str = "—";

// ── Listing ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub season_code: Option<String>,
    pub mode: Option<GameMode>,
    pub my_deck_main: Option<String>,
    pub opp_deck_main: Option<String>,
    pub result: Option<MatchResult>,
    pub play_order: Option<PlayOrder>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
    pub total: usize,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let mut matches = storage::read_matches(&state.storage)?;

    matches.retain(|m| {
        params
            .season_code
            .as_deref()
            .map_or(true, |code| m.season_code == code)
            && params.mode.map_or(true, |mode| m.mode == mode)
            && params
                .my_deck_main
                .as_deref()
                .map_or(true, |deck| m.my_deck.main == deck)
            && params
                .opp_deck_main
                .as_deref()
                .map_or(true, |deck| m.opp_deck.main == deck)
            && params.result.map_or(true, |result| m.result == result)
            && params
                .play_order
                .map_or(true, |order| m.play_order == order)
            && params
                .date_from
                .as_deref()
                .map_or(true, |from| m.date_key() >= from)
            && params
                .date_to
                .as_deref()
                .map_or(true, |to| m.date_key() <= to)
    });

    // Newest first; creation time breaks same-day ties
    matches.sort_by(|a, b| {
        b.date_key()
            .cmp(&a.date_key())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let total = matches.len();
    Ok(Json(MatchesResponse { matches, total }))
}

// ── Mutations ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub season_code: String,
    pub date: String,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub rank: String,
    pub my_deck: Deck,
    pub opp_deck: Deck,
    pub play_order: PlayOrder,
    pub result: MatchResult,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    pub season_code: Option<String>,
    pub date: Option<String>,
    pub mode: Option<GameMode>,
    pub rank: Option<String>,
    pub my_deck: Option<Deck>,
    pub opp_deck: Option<Deck>,
    pub play_order: Option<PlayOrder>,
    pub result: Option<MatchResult>,
    pub note: Option<String>,
}

impl UpdateMatchRequest {
    fn is_empty(&self) -> bool {
        self.season_code.is_none()
            && self.date.is_none()
            && self.mode.is_none()
            && self.rank.is_none()
            && self.my_deck.is_none()
            && self.opp_deck.is_none()
            && self.play_order.is_none()
            && self.result.is_none()
            && self.note.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub id: String,
    pub message: String,
}

pub async fn create_match(
    State(state): State<AppState>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    if req.season_code.trim().is_empty() || req.date.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "seasonCode and date are required".to_string(),
        ));
    }

    let rank = if req.rank.is_empty() && req.mode != GameMode::Ranked {
        RANK_PLACEHOLDER.to_string()
    } else {
        req.rank
    };

    let now = Utc::now();
    let record = Match {
        id: MatchId::generate(),
        season_code: req.season_code,
        date: req.date,
        mode: req.mode,
        rank,
        my_deck: req.my_deck,
        opp_deck: req.opp_deck,
        play_order: req.play_order,
        result: req.result,
        note: req.note,
        created_at: now,
        updated_at: now,
    };

    let _guard = state.write_guard.lock().await;
    register_deck_templates(&state, &record)?;
    storage::append_match(&state.storage, &record)?;
    tracing::info!("Logged match {} on {}", record.id, record.date_key());

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            id: record.id.to_string(),
            message: "match created".to_string(),
        }),
    ))
}

pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateMatchRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".to_string()));
    }

    let _guard = state.write_guard.lock().await;
    let mut matches = storage::read_matches(&state.storage)?;
    let record = matches
        .iter_mut()
        .find(|m| m.id.as_str() == id)
        .ok_or_else(|| ApiError::NotFound(format!("match {id}")))?;

    if let Some(season_code) = req.season_code {
        record.season_code = season_code;
    }
    if let Some(date) = req.date {
        record.date = date;
    }
    if let Some(mode) = req.mode {
        record.mode = mode;
        // Leaving the ranked queue with no explicit rank keeps the placeholder
        if mode != GameMode::Ranked && req.rank.is_none() {
            record.rank = RANK_PLACEHOLDER.to_string();
        }
    }
    if let Some(rank) = req.rank {
        record.rank = rank;
    }
    if let Some(my_deck) = req.my_deck {
        record.my_deck = my_deck;
    }
    if let Some(opp_deck) = req.opp_deck {
        record.opp_deck = opp_deck;
    }
    if let Some(play_order) = req.play_order {
        record.play_order = play_order;
    }
    if let Some(result) = req.result {
        record.result = result;
    }
    if let Some(note) = req.note {
        record.note = if note.is_empty() { None } else { Some(note) };
    }
    record.updated_at = Utc::now();

    let updated = record.clone();
    storage::write_matches(&state.storage, &matches)?;
    // Deck renames may introduce archetypes the template list has not seen
    register_deck_templates(&state, &updated)?;

    Ok(Json(MutationResponse {
        id,
        message: "match updated".to_string(),
    }))
}

pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    let _guard = state.write_guard.lock().await;
    let mut matches = storage::read_matches(&state.storage)?;

    let before = matches.len();
    matches.retain(|m| m.id.as_str() != id);
    if matches.len() == before {
        return Err(ApiError::NotFound(format!("match {id}")));
    }

    storage::write_matches(&state.storage, &matches)?;
    tracing::info!("Deleted match {}", id);

    Ok(Json(MutationResponse {
        id,
        message: "match deleted".to_string(),
    }))
}

/// Make sure every archetype named on a match has a deck template, so the
/// display layer can color it. First sight gets the default theme.
fn register_deck_templates(state: &AppState, record: &Match) -> Result<(), ApiError> {
    let mut templates = storage::read_deck_templates(&state.storage)?;
    let mut added = false;

    for deck in [&record.my_deck, &record.opp_deck] {
        for name in deck_names(deck) {
            if !templates.iter().any(|t| t.name == name) {
                tracing::debug!("Auto-registering deck template {}", name);
                templates.push(DeckTemplate::auto(name));
                added = true;
            }
        }
    }

    if added {
        storage::write_deck_templates(&state.storage, &templates)?;
    }
    Ok(())
}

fn deck_names(deck: &Deck) -> Vec<&str> {
    let mut names = Vec::new();
    if !deck.main.is_empty() {
        names.push(deck.main.as_str());
    }
    if let Some(sub) = deck.sub.as_deref() {
        if !sub.is_empty() && sub != NONE_LABEL {
            names.push(sub);
        }
    }
    names
}
