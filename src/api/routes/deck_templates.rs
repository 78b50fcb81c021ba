use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DeckTemplate, DeckType, NONE_LABEL};
use crate::storage;

use super::matches::MutationResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub deck_type: Option<DeckType>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<DeckTemplate>,
    pub total: usize,
}

pub async fn list_templates(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TemplatesResponse>, ApiError> {
    let mut templates = storage::read_deck_templates(&state.storage)?;

    if let Some(deck_type) = params.deck_type {
        templates.retain(|t| t.deck_type == deck_type);
    }
    templates.sort_by(|a, b| a.name.cmp(&b.name));

    let total = templates.len();
    Ok(Json(TemplatesResponse { templates, total }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub deck_type: DeckType,
}

pub async fn create_template(
    State(state): State<AppState>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let _guard = state.write_guard.lock().await;
    let templates = storage::read_deck_templates(&state.storage)?;
    if templates
        .iter()
        .any(|t| t.name == req.name && t.deck_type == req.deck_type)
    {
        return Err(ApiError::Conflict(format!(
            "deck template already exists: {}",
            req.name
        )));
    }

    let template = DeckTemplate::new(
        req.name,
        req.theme.unwrap_or_else(|| NONE_LABEL.to_string()),
        req.deck_type,
    );
    storage::append_deck_template(&state.storage, &template)?;
    tracing::info!("Created deck template {}", template.name);

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            id: template.id.to_string(),
            message: "deck template created".to_string(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub theme: Option<String>,
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    if req.name.is_none() && req.theme.is_none() {
        return Err(ApiError::BadRequest("no fields to update".to_string()));
    }

    let _guard = state.write_guard.lock().await;
    let mut templates = storage::read_deck_templates(&state.storage)?;
    let template = templates
        .iter_mut()
        .find(|t| t.id.as_str() == id)
        .ok_or_else(|| ApiError::NotFound(format!("deck template {id}")))?;

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        template.name = name;
    }
    if let Some(theme) = req.theme {
        template.theme = theme;
    }

    storage::write_deck_templates(&state.storage, &templates)?;

    Ok(Json(MutationResponse {
        id,
        message: "deck template updated".to_string(),
    }))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    let _guard = state.write_guard.lock().await;
    let mut templates = storage::read_deck_templates(&state.storage)?;

    let before = templates.len();
    templates.retain(|t| t.id.as_str() != id);
    if templates.len() == before {
        return Err(ApiError::NotFound(format!("deck template {id}")));
    }

    storage::write_deck_templates(&state.storage, &templates)?;

    Ok(Json(MutationResponse {
        id,
        message: "deck template deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::build_router;
    use crate::api::testing::{get_json, send, test_state};

    #[tokio::test]
    async fn test_template_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, created) = send(
            build_router(state.clone()),
            "POST",
            "/api/deck-templates",
            Some(json!({"name": "白森林", "theme": "儀式"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (_, json) = get_json(build_router(state.clone()), "/api/deck-templates").await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["templates"][0]["name"], "白森林");
        assert_eq!(json["templates"][0]["theme"], "儀式");
        assert_eq!(json["templates"][0]["deckType"], "main");

        let (status, _) = send(
            build_router(state.clone()),
            "PATCH",
            &format!("/api/deck-templates/{id}"),
            Some(json!({"theme": "ドラゴン"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = get_json(build_router(state.clone()), "/api/deck-templates").await;
        assert_eq!(json["templates"][0]["theme"], "ドラゴン");

        let (status, _) = send(
            build_router(state.clone()),
            "DELETE",
            &format!("/api/deck-templates/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = get_json(build_router(state), "/api/deck-templates").await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let body = json!({"name": "炎王", "deckType": "main"});
        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/deck-templates",
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(
            build_router(state.clone()),
            "POST",
            "/api/deck-templates",
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");

        // Same name on the other axis is allowed
        let (status, _) = send(
            build_router(state),
            "POST",
            "/api/deck-templates",
            Some(json!({"name": "炎王", "deckType": "sub"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, _) = send(
            build_router(state),
            "POST",
            "/api/deck-templates",
            Some(json!({"name": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filter_by_deck_type() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        for (name, deck_type) in [("A", "main"), ("B", "sub")] {
            send(
                build_router(state.clone()),
                "POST",
                "/api/deck-templates",
                Some(json!({"name": name, "deckType": deck_type})),
            )
            .await;
        }

        let (_, json) = get_json(build_router(state), "/api/deck-templates?deckType=sub").await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["templates"][0]["name"], "B");
    }

    #[tokio::test]
    async fn test_update_unknown_template() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, _) = send(
            build_router(state),
            "PATCH",
            "/api/deck-templates/missing",
            Some(json!({"theme": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
