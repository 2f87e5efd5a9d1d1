/// Article endpoints
///
/// Reads are public. Writes require a bearer token, and update/delete are
/// limited to the article's author.
///
/// # Endpoints
///
/// - `GET    /api/articles?category=AI&search=rust` - List, newest first
/// - `GET    /api/articles/my` - The caller's articles
/// - `GET    /api/articles/:id` - One article
/// - `POST   /api/articles` - Create
/// - `PUT    /api/articles/:id` - Update (owner)
/// - `DELETE /api/articles/:id` - Delete (owner)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use quillpress_shared::{
    auth::middleware::AuthContext,
    models::article::{Article, ArticleDetail, ArticleFilter, Category, CreateArticle, UpdateArticle},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string for the article list
///
/// Empty values mean "no filter", which is what a frontend sends for an
/// unset select box or search field.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ArticleQuery {
    fn into_filter(self) -> ApiResult<ArticleFilter> {
        let category = non_empty(self.category)
            .map(|c| c.parse::<Category>())
            .transpose()?;

        Ok(ArticleFilter {
            category,
            search: non_empty(self.search),
            author_id: None,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of a successful delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Lists articles, newest first, optionally filtered
pub async fn list_articles(
    State(state): State<AppState>,
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ArticleDetail>>> {
    let Query(query) = query?;
    let articles = Article::list(&state.db, query.into_filter()?).await?;

    Ok(Json(articles))
}

/// Lists the caller's own articles
pub async fn list_my_articles(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<ArticleDetail>>> {
    let articles = Article::list_by_author(&state.db, auth.user_id).await?;

    Ok(Json(articles))
}

/// Fetches one article with its author and tags
///
/// # Errors
///
/// - `400 Bad Request`: id is not a UUID
/// - `404 Not Found`: no such article
pub async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ArticleDetail>> {
    let Path(id) = id?;

    Article::find_detail(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Article not found".to_string()))
}

/// Creates an article owned by the caller
///
/// ```text
/// POST /api/articles
///
/// {
///   "title": "Borrowing",
///   "content": "<p>...</p>",
///   "summary": null,
///   "category": "Tech",
///   "tags": ["Rust", "rust", "memory"]
/// }
/// ```
///
/// Responds `201 Created` with the stored article. The example links two
/// tags: `rust` and `memory`.
pub async fn create_article(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreateArticle>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ArticleDetail>)> {
    let Json(data) = payload?;

    let article = Article::create_with_tags(&state.db, auth.user_id, data).await?;

    Ok((StatusCode::CREATED, Json(article)))
}

/// Updates an article the caller owns
///
/// Omitted fields are unchanged. `tags` replaces the whole tag set when
/// present; omit it to keep the current tags.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not the author
/// - `404 Not Found`: no such article
pub async fn update_article(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateArticle>, JsonRejection>,
) -> ApiResult<Json<ArticleDetail>> {
    let Path(id) = id?;
    let Json(data) = payload?;

    let article = Article::update_with_tags(&state.db, id, auth.user_id, data).await?;

    Ok(Json(article))
}

/// Deletes an article the caller owns; its tag links go with it
///
/// # Errors
///
/// - `403 Forbidden`: caller is not the author
/// - `404 Not Found`: no such article
pub async fn delete_article(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;

    Article::delete_owned(&state.db, id, auth.user_id).await?;

    Ok(Json(DeleteResponse {
        message: "Article deleted successfully".to_string(),
    }))
}
