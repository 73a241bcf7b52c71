pub mod analytics;
pub mod businesses;
pub mod pages;
pub mod preview;
pub mod seo;
pub mod sites;

use crate::AppState;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

/// All routes: the JSON api under `/api`, published sites under `/sites`.
pub fn app_router(state: AppState) -> Router {
    // api router, where features are composed
    let api_router = Router::new()
        .nest("/pages", pages::pages_router())
        .nest("/businesses", businesses::businesses_router())
        .nest("/seo", seo::seo_router())
        .nest("/analytics", analytics::analytics_router())
        .nest("/preview", preview::preview_router());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest("/sites", sites::sites_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
