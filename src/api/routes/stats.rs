use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::build_season_stats;
use crate::models::{get_season_info, SeasonStats};
use crate::storage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatsParams {
    pub season_code: Option<String>,
    pub my_deck_main: Option<String>,
    pub opp_deck_main: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

pub async fn season_stats(
    State(state): State<AppState>,
    Query(params): Query<SeasonStatsParams>,
) -> Result<Json<SeasonStats>, ApiError> {
    let mut matches = storage::read_matches(&state.storage)?;

    // An unparseable season code degrades to an unranged daily series
    // instead of erroring; the code then only acts as a match filter.
    let range = params
        .season_code
        .as_deref()
        .and_then(get_season_info)
        .map(|info| info.range());

    if let Some(code) = params.season_code.as_deref() {
        matches.retain(|m| m.season_code == code);
    }
    if let Some(deck) = params.my_deck_main.as_deref() {
        matches.retain(|m| m.my_deck.main == deck);
    }
    if let Some(deck) = params.opp_deck_main.as_deref() {
        matches.retain(|m| m.opp_deck.main == deck);
    }
    if let Some(from) = params.date_from.as_deref() {
        matches.retain(|m| m.date_key() >= from);
    }
    if let Some(to) = params.date_to.as_deref() {
        matches.retain(|m| m.date_key() <= to);
    }

    Ok(Json(build_season_stats(&matches, range.as_ref())))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::build_router;
    use crate::api::testing::{get_json, send, test_state};
    use crate::api::state::AppState;

    async fn log_match(state: &AppState, season: &str, date: &str, my: &str, result: &str) {
        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(json!({
                "seasonCode": season,
                "date": date,
                "rank": "Master 1",
                "myDeck": {"main": my},
                "oppDeck": {"main": "相手デッキ"},
                "playOrder": "先攻",
                "result": result,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_season_stats_full_month_series() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        // S41 is 2025-05
        log_match(&state, "S41", "2025-05-03", "A", "W").await;
        log_match(&state, "S41", "2025-05-05", "A", "L").await;

        let (status, json) = get_json(
            build_router(state),
            "/api/stats/season?seasonCode=S41",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(json["total"], 2);
        assert_eq!(json["wins"], 1);
        assert_eq!(json["winRate"], 50.0);

        // Every day of May, zero-filled between the two played days
        let daily = json["daily"].as_array().unwrap();
        assert_eq!(daily.len(), 31);
        assert_eq!(daily[0]["date"], "2025-05-01");
        assert_eq!(daily[30]["date"], "2025-05-31");
        assert!(daily[0]["winRate"].is_null());
        assert_eq!(daily[2]["games"], 1);
        assert_eq!(daily[2]["winRate"], 100.0);
        assert_eq!(daily[4]["winRate"], 0.0);
    }

    #[tokio::test]
    async fn test_season_stats_filters_other_seasons() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        log_match(&state, "S41", "2025-05-03", "A", "W").await;
        log_match(&state, "S40", "2025-04-10", "A", "L").await;

        let (_, json) = get_json(
            build_router(state),
            "/api/stats/season?seasonCode=S41",
        )
        .await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["wins"], 1);
    }

    #[tokio::test]
    async fn test_season_stats_deck_filter() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        log_match(&state, "S41", "2025-05-03", "A", "W").await;
        log_match(&state, "S41", "2025-05-03", "B", "L").await;

        let (_, json) = get_json(
            build_router(state),
            "/api/stats/season?seasonCode=S41&myDeckMain=A",
        )
        .await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["myDecks"].as_array().unwrap().len(), 1);
        assert_eq!(json["myDecks"][0]["name"], "A");
    }

    #[tokio::test]
    async fn test_season_stats_no_season_unranged() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        log_match(&state, "S41", "2025-05-03", "A", "W").await;
        log_match(&state, "S41", "2025-05-05", "A", "L").await;

        let (_, json) = get_json(build_router(state), "/api/stats/season").await;

        // No range: only the two played days appear
        let daily = json["daily"].as_array().unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0]["date"], "2025-05-03");
        assert_eq!(daily[1]["date"], "2025-05-05");
    }

    #[tokio::test]
    async fn test_season_stats_invalid_code_falls_back_unranged() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        log_match(&state, "S41", "2025-05-03", "A", "W").await;

        let (status, json) = get_json(
            build_router(state),
            "/api/stats/season?seasonCode=banana",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // The bogus code filters out everything but never errors
        assert_eq!(json["total"], 0);
        assert!(json["daily"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_season_stats_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, json) = get_json(build_router(state), "/api/stats/season").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 0);
        assert_eq!(json["winRate"], 0.0);
        assert!(json["oppDecks"].as_array().unwrap().is_empty());
    }
}
