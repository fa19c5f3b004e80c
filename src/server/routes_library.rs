//! Library maintenance and scan policy routes.

use crate::scanner::{ScanPolicy, SyncReport};
use crate::server::{error::ApiError, AppContext};
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

pub fn library_routes() -> Router<AppContext> {
    Router::new()
        .route("/library", get(library_info))
        .route("/library/refresh", post(refresh_library))
        .route("/policy", get(get_policy))
        .route(
            "/policy/extensions/:ext",
            put(add_extension).delete(remove_extension),
        )
        .route(
            "/policy/ignored/:name",
            put(add_ignored_dir).delete(remove_ignored_dir),
        )
}

#[derive(Serialize)]
struct LibraryInfo {
    root: String,
    count: usize,
}

async fn library_info(State(ctx): State<AppContext>) -> Result<Json<LibraryInfo>, ApiError> {
    Ok(Json(LibraryInfo {
        root: ctx.library_root().display().to_string(),
        count: ctx.service.count()?,
    }))
}

/// POST /api/library/refresh
///
/// Crawls the library root and reconciles the catalog. The crawl runs on
/// the blocking pool.
async fn refresh_library(State(ctx): State<AppContext>) -> Result<Json<SyncReport>, ApiError> {
    let service = ctx.service.clone();
    let root = ctx.library_root();
    let report = tokio::task::spawn_blocking(move || service.ensure_catalog(&root, true))
        .await
        .map_err(|e| ApiError::internal(format!("Refresh task failed: {e}")))??;
    Ok(Json(report))
}

#[derive(Serialize)]
struct PolicyResponse {
    extensions: Vec<String>,
    ignored_dirs: Vec<String>,
}

impl From<ScanPolicy> for PolicyResponse {
    fn from(policy: ScanPolicy) -> Self {
        Self {
            extensions: policy.extensions(),
            ignored_dirs: policy.ignored_dirs(),
        }
    }
}

fn current_policy(ctx: &AppContext) -> Json<PolicyResponse> {
    Json(ctx.service.policy().snapshot().into())
}

async fn get_policy(State(ctx): State<AppContext>) -> Json<PolicyResponse> {
    current_policy(&ctx)
}

async fn add_extension(
    State(ctx): State<AppContext>,
    Path(ext): Path<String>,
) -> Json<PolicyResponse> {
    ctx.service.policy().add_extension(&ext);
    current_policy(&ctx)
}

async fn remove_extension(
    State(ctx): State<AppContext>,
    Path(ext): Path<String>,
) -> Json<PolicyResponse> {
    ctx.service.policy().remove_extension(&ext);
    current_policy(&ctx)
}

async fn add_ignored_dir(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Json<PolicyResponse> {
    ctx.service.policy().add_ignored_dir(&name);
    current_policy(&ctx)
}

async fn remove_ignored_dir(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Json<PolicyResponse> {
    ctx.service.policy().remove_ignored_dir(&name);
    current_policy(&ctx)
}
