use crate::database::StoreError;
use crate::editor::EditError;
use crate::preview::PreviewError;
use crate::publish::PublishError;
use crate::services::SiteError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error type for HTTP handlers. Renders as `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Site(err) => classify_site_error(err),
            AppError::Store(err) => classify_store_error(err),
            AppError::Preview(PreviewError::Edit(err)) => classify_edit_error(err),
            AppError::Preview(err) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_site_error(err: &SiteError) -> Classified {
    match err {
        SiteError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        SiteError::Store(store) => classify_store_error(store),
        SiteError::Edit(edit) => classify_edit_error(edit),
        SiteError::Content(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
        SiteError::Publish(publish) => classify_publish_error(publish),
        SiteError::Serialize(_) => internal(err),
    }
}

fn classify_edit_error(err: &EditError) -> Classified {
    match err {
        EditError::SectionNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        _ => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string()),
    }
}

fn classify_publish_error(err: &PublishError) -> Classified {
    match err {
        PublishError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.user_message()),
        PublishError::NoDomain | PublishError::Domain(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.user_message())
        }
        PublishError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, "CONFLICT", err.user_message())
        }
        PublishError::Store(StoreError::Database(_) | StoreError::Corrupt(_)) => internal(err),
        PublishError::Store(store) => {
            let (status, code, _) = classify_store_error(store);
            (status, code, err.user_message())
        }
    }
}

fn classify_store_error(err: &StoreError) -> Classified {
    match err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        StoreError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreError::SubdomainTaken(_) | StoreError::AlreadyClaimed => {
            (StatusCode::CONFLICT, "CONFLICT", err.to_string())
        }
        StoreError::Corrupt(_) | StoreError::Database(_) => internal(err),
    }
}

fn internal(err: &dyn std::fmt::Display) -> Classified {
    tracing::error!(error = %err, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
