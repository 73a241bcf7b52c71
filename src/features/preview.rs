use crate::error::AppResult;
use crate::preview::{PreviewMessage, PreviewSession, PreviewState};
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::Html,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

pub fn preview_router() -> Router<AppState> {
    Router::new().route("/", post(preview_handler))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub state: PreviewState,
    #[serde(default)]
    pub messages: Vec<PreviewMessage>,
}

async fn preview_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PreviewRequest>,
) -> AppResult<Html<String>> {
    let origin = headers
        .get(http::header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let mut session = PreviewSession::new(state.config.public_origin.clone(), request.state);
    for message in request.messages {
        session.receive(origin, message)?;
    }
    Ok(Html(session.render()))
}
