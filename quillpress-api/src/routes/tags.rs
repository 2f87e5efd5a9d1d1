/// Tag endpoints
///
/// - `GET /api/tags` - Every tag, alphabetical

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use quillpress_shared::models::tag::Tag;

/// Lists all tags by name
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(Tag::list_all(&state.db).await?))
}
