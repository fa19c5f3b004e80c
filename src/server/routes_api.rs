//! Catalog browsing routes.

use crate::library::{EntryDetail, PaginatedView};
use crate::server::{error::ApiError, AppContext};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use vidshelf_common::EntryId;
use vidshelf_db::MediaEntry;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/videos", get(list_page))
        .route("/videos/all", get(list_all))
        .route("/videos/:id", get(get_video).delete(delete_video))
}

#[derive(Deserialize)]
struct ListPageQuery {
    query: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

/// GET /api/videos
///
/// Unparseable `page` values are treated as page 1.
async fn list_page(
    State(ctx): State<AppContext>,
    Query(params): Query<ListPageQuery>,
) -> Result<Json<PaginatedView>, ApiError> {
    let page = params
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(1);
    let page_size = params
        .page_size
        .as_deref()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(ctx.config.server.page_size);
    let query = params.query.as_deref().filter(|q| !q.is_empty());

    Ok(Json(ctx.service.page(query, page, page_size)?))
}

#[derive(Deserialize)]
struct ListAllQuery {
    title: Option<String>,
}

/// GET /api/videos/all
async fn list_all(
    State(ctx): State<AppContext>,
    Query(params): Query<ListAllQuery>,
) -> Result<Json<Vec<MediaEntry>>, ApiError> {
    Ok(Json(ctx.service.list(params.title.as_deref())?))
}

/// GET /api/videos/:id
async fn get_video(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<EntryDetail>, ApiError> {
    let id: EntryId = id.parse()?;
    Ok(Json(ctx.service.detail(id)?))
}

/// DELETE /api/videos/:id
///
/// Removes the file from disk and the entry from the catalog.
async fn delete_video(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: EntryId = id.parse()?;
    let service = ctx.service.clone();
    tokio::task::spawn_blocking(move || service.delete_entry(id))
        .await
        .map_err(|e| ApiError::internal(format!("Delete task failed: {e}")))??;
    Ok(Json(serde_json::json!({})))
}
