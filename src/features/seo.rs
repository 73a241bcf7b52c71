use crate::domain::SeoSettings;
use crate::seo::{evaluate, SeoReport};
use crate::AppState;
use axum::{routing::post, Json, Router};

pub fn seo_router() -> Router<AppState> {
    Router::new().route("/score", post(score_handler))
}

// pure: scores the form as typed, nothing is stored
async fn score_handler(Json(settings): Json<SeoSettings>) -> Json<SeoReport> {
    Json(evaluate(&settings))
}
