use crate::error::{AppError, AppResult};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use http::header::{ETAG, IF_NONE_MATCH};

pub fn sites_router() -> Router<AppState> {
    Router::new().route("/{subdomain}", get(site_handler))
}

async fn site_handler(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let subdomain = subdomain.to_ascii_lowercase();
    let site = state
        .sites
        .render_site(&subdomain)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No published site at '{}'", subdomain)))?;

    let unchanged = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|tag| tag == site.etag);
    if unchanged {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, site.etag)]).into_response());
    }

    Ok(([(ETAG, site.etag)], Html(site.html)).into_response())
}
