/// AI writing-assistant endpoints
///
/// All four take `{ "content": "..." }` and require authentication. They
/// forward the content to the configured provider and relay the reply.
///
/// | Endpoint | Response |
/// |---|---|
/// | `POST /api/ai/improve` | `{ "improvedContent": "..." }` |
/// | `POST /api/ai/summary` | `{ "summary": "..." }` |
/// | `POST /api/ai/suggest-title` | `{ "title": "..." }` |
/// | `POST /api/ai/suggest-tags` | `{ "tags": ["..."] }` |
///
/// # Errors
///
/// - `400 Bad Request`: `content` missing or blank
/// - `500 Internal Server Error`: provider unconfigured or the call failed

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use quillpress_shared::{ai::AiAssistant, auth::middleware::AuthContext};
use serde::{Deserialize, Serialize};

/// Request body shared by all AI endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AiRequest {
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    pub improved_content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

/// Checks the body and returns the assistant plus the content to send
fn prepare(
    state: &AppState,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> ApiResult<(&AiAssistant, String)> {
    let Json(req) = payload?;

    let content = req
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Content is required".to_string()))?;

    let assistant = state
        .ai
        .as_ref()
        .ok_or_else(|| ApiError::InternalError("AI service is not configured".to_string()))?;

    Ok((assistant, content))
}

pub async fn improve(
    State(state): State<AppState>,
    _auth: AuthContext,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> ApiResult<Json<ImproveResponse>> {
    let (assistant, content) = prepare(&state, payload)?;
    let improved_content = assistant.improve_content(&content).await?;

    Ok(Json(ImproveResponse { improved_content }))
}

pub async fn summary(
    State(state): State<AppState>,
    _auth: AuthContext,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let (assistant, content) = prepare(&state, payload)?;
    let summary = assistant.summarize(&content).await?;

    Ok(Json(SummaryResponse { summary }))
}

pub async fn suggest_title(
    State(state): State<AppState>,
    _auth: AuthContext,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> ApiResult<Json<TitleResponse>> {
    let (assistant, content) = prepare(&state, payload)?;
    let title = assistant.suggest_title(&content).await?;

    Ok(Json(TitleResponse { title }))
}

pub async fn suggest_tags(
    State(state): State<AppState>,
    _auth: AuthContext,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> ApiResult<Json<TagsResponse>> {
    let (assistant, content) = prepare(&state, payload)?;
    let tags = assistant.suggest_tags(&content).await?;

    Ok(Json(TagsResponse { tags }))
}
