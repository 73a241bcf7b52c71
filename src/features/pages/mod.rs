pub mod model;

use crate::error::AppResult;
use crate::services::site::LoadedPage;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use model::{OperationsRequest, SavePageRequest, SavePageResponse};
use uuid::Uuid;

pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/{business_id}", get(get_page_handler).put(save_page_handler))
        .route("/{business_id}/operations", post(apply_operations_handler))
        .route("/{business_id}/draft", get(draft_handler))
}

async fn get_page_handler(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<LoadedPage>> {
    Ok(Json(state.sites.load_page(business_id).await?))
}

async fn save_page_handler(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Json(request): Json<SavePageRequest>,
) -> AppResult<Json<SavePageResponse>> {
    let version = state
        .sites
        .save_page(business_id, request.expected_version, request.content)
        .await?;
    Ok(Json(SavePageResponse { version }))
}

async fn apply_operations_handler(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Json(request): Json<OperationsRequest>,
) -> AppResult<Json<LoadedPage>> {
    let page = state
        .sites
        .apply_operations(business_id, request.expected_version, &request.operations)
        .await?;
    Ok(Json(page))
}

// unpublished pages render too; this is what the editor shows before publishing
async fn draft_handler(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Html<String>> {
    Ok(Html(state.sites.render_draft(business_id).await?))
}
