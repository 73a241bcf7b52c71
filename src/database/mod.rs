use crate::analytics::events::{AnalyticsEvent, AnalyticsSummary};
use crate::domain::{Business, SeoSettings};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

pub mod model;
pub mod sqlite;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    // optimistic concurrency: the caller's copy is older than the stored one
    #[error("stale write: expected version {expected}, stored version is {actual}")]
    Conflict { expected: i64, actual: i64 },

    #[error("subdomain '{0}' is already taken")]
    SubdomainTaken(String),

    #[error("business is already claimed by another account")]
    AlreadyClaimed,

    #[error("stored row is corrupt: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    pub raw: String,
    pub version: i64,
    pub updated_at: NaiveDateTime,
}

// repositories are shared between handlers; sqlx::Pool is thread safe
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_content(&self, business_id: Uuid) -> Result<Option<StoredContent>, StoreError>;

    /// Overwrites the content blob if the stored version still equals `expected_version`
    /// (0 when nothing is stored yet). Returns the new version.
    async fn save_content(
        &self,
        business_id: Uuid,
        raw: &str,
        expected_version: i64,
    ) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn get_business(&self, id: Uuid) -> Result<Option<Business>, StoreError>;
    async fn get_business_by_subdomain(&self, subdomain: &str)
        -> Result<Option<Business>, StoreError>;
    async fn list_published(&self) -> Result<Vec<Business>, StoreError>;

    // write operations
    async fn save_business(&self, business: &Business) -> Result<(), StoreError>;
    /// Associates the business with `user_id`. Claiming an already-owned business
    /// succeeds for the same user and fails with `AlreadyClaimed` otherwise.
    async fn claim_business(&self, id: Uuid, user_id: &str) -> Result<(), StoreError>;
    async fn set_published(&self, id: Uuid, published: bool) -> Result<(), StoreError>;
    async fn set_subdomain(&self, id: Uuid, subdomain: &str) -> Result<(), StoreError>;
    async fn update_seo(&self, id: Uuid, seo: &SeoSettings) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn record_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError>;
    async fn summary(&self, business_id: Uuid) -> Result<AnalyticsSummary, StoreError>;
}
