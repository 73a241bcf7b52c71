use crate::domain::content::Review;
use crate::domain::{Business, OpeningHours, SeoSettings};
use crate::error::{AppError, AppResult};
use crate::publish::PublishOutcome;
use crate::seo::SeoReport;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

pub fn businesses_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_business_handler))
        .route("/{id}", get(get_business_handler))
        .route("/{id}/domain", put(update_domain_handler))
        .route("/{id}/publish", post(publish_handler))
        .route("/{id}/unpublish", post(unpublish_handler))
        .route("/{id}/seo", put(update_seo_handler))
}

/// Listing data as imported for a new business.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewBusiness {
    pub name: String,
    pub category: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub hours: Vec<OpeningHours>,
    pub photos: Vec<String>,
    pub rating: Option<f32>,
    pub review_count: u32,
    pub reviews: Vec<Review>,
    pub theme_preset: Option<String>,
}

impl NewBusiness {
    fn into_business(self) -> AppResult<Business> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Business name is required".to_string()));
        }
        let mut business = Business::new(self.name.trim(), self.category.trim());
        business.description = self.description;
        business.address = self.address;
        business.phone = self.phone;
        business.email = self.email;
        business.website = self.website;
        business.hours = self.hours;
        business.photos = self.photos;
        business.rating = self.rating;
        business.review_count = self.review_count;
        business.reviews = self.reviews;
        business.theme_preset = self.theme_preset;
        Ok(business)
    }
}

#[derive(Debug, Deserialize)]
pub struct DomainRequest {
    pub subdomain: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub user_id: String,
}

async fn create_business_handler(
    State(state): State<AppState>,
    Json(request): Json<NewBusiness>,
) -> AppResult<(StatusCode, Json<Business>)> {
    let business = state.sites.create_business(request.into_business()?).await?;
    Ok((StatusCode::CREATED, Json(business)))
}

async fn get_business_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Business>> {
    Ok(Json(state.sites.business(id).await?))
}

async fn update_domain_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DomainRequest>,
) -> AppResult<Json<PublishOutcome>> {
    Ok(Json(state.sites.update_domain(id, &request.subdomain).await?))
}

async fn publish_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PublishRequest>,
) -> AppResult<Json<PublishOutcome>> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("userId is required".to_string()));
    }
    Ok(Json(state.sites.publish(id, &request.user_id).await?))
}

async fn unpublish_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PublishOutcome>> {
    Ok(Json(state.sites.unpublish(id).await?))
}

async fn update_seo_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(settings): Json<SeoSettings>,
) -> AppResult<Json<SeoReport>> {
    Ok(Json(state.sites.update_seo(id, &settings).await?))
}
