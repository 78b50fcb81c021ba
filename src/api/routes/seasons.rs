use axum::extract::{Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::models::{current_season_code, get_season_info, recent_season_codes, SeasonInfo};

pub async fn current_season() -> Result<Json<SeasonInfo>, ApiError> {
    let code = current_season_code();
    get_season_info(&code)
        .map(Json)
        .ok_or_else(|| ApiError::Internal(format!("current season unresolvable: {code}")))
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub count: Option<i32>,
    pub from: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<SeasonInfo>,
}

pub async fn recent_seasons(Query(params): Query<RecentParams>) -> Json<SeasonsResponse> {
    let count = params.count.unwrap_or(12);
    let seasons = recent_season_codes(count, params.from.as_deref())
        .iter()
        .filter_map(|code| get_season_info(code))
        .collect();
    Json(SeasonsResponse { seasons })
}

pub async fn season_info(Path(code): Path<String>) -> Result<Json<SeasonInfo>, ApiError> {
    get_season_info(&code)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("invalid season code: {code}")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::api::build_router;
    use crate::api::testing::{get_json, test_state};
    use crate::models::current_season_code;

    #[tokio::test]
    async fn test_season_info_route() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let (status, json) = get_json(app, "/api/seasons/S32").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], "S32");
        assert_eq!(json["seasonNumber"], 32);
        assert_eq!(json["year"], 2024);
        assert_eq!(json["month"], 8);
        assert_eq!(json["start"], "2024-08-01");
        assert_eq!(json["end"], "2024-08-31");
    }

    #[tokio::test]
    async fn test_season_info_invalid_code() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let (status, json) = get_json(app, "/api/seasons/banana").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_current_season_route() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let (status, json) = get_json(app, "/api/seasons/current").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["code"], current_season_code());
    }

    #[tokio::test]
    async fn test_recent_seasons_route() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let (status, json) = get_json(app, "/api/seasons/recent?count=3&from=S40").await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = json["seasons"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["S40", "S39", "S38"]);
    }

    #[tokio::test]
    async fn test_recent_seasons_bad_start_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let (status, json) = get_json(app, "/api/seasons/recent?count=3&from=banana").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["seasons"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_seasons_default_count() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path()));

        let (_, json) = get_json(app, "/api/seasons/recent?from=S40").await;
        assert_eq!(json["seasons"].as_array().unwrap().len(), 12);
    }
}
