use crate::analytics::{AnalyticsEvent, AnalyticsSummary};
use crate::error::{AppError, AppResult};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

pub const MAX_EVENTS_PER_BATCH: usize = 500;

pub fn analytics_router() -> Router<AppState> {
    Router::new()
        .route("/events", post(record_events_handler))
        .route("/{business_id}/summary", get(summary_handler))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub received: usize,
    pub delivered_to: usize,
}

async fn record_events_handler(
    State(state): State<AppState>,
    Json(events): Json<Vec<AnalyticsEvent>>,
) -> AppResult<(StatusCode, Json<RecordResponse>)> {
    if events.len() > MAX_EVENTS_PER_BATCH {
        return Err(AppError::BadRequest(format!(
            "At most {} events per batch",
            MAX_EVENTS_PER_BATCH
        )));
    }

    let delivered_to = state.analytics.record(&events).await;
    Ok((
        StatusCode::ACCEPTED,
        Json(RecordResponse {
            received: events.len(),
            delivered_to,
        }),
    ))
}

async fn summary_handler(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
) -> AppResult<Json<AnalyticsSummary>> {
    Ok(Json(state.analytics.summary(business_id).await?))
}
