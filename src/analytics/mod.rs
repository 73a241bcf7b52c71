use crate::database::StoreError;
use thiserror::Error;

pub mod events;
pub mod identity;
pub mod ingestion;
pub mod sink;
pub mod tracker;

pub use events::{AnalyticsEvent, AnalyticsSummary, PageView, PageViewUpdate};
pub use identity::{Clock, Identity, IdentityProvider, IdentityStore, MemoryIdentityStore, SystemClock};
pub use ingestion::IngestionClient;
pub use sink::{AnalyticsSink, BackendSink, DualWriter};
pub use tracker::PageViewTracker;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("analytics request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analytics endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid analytics url: {0}")]
    InvalidUrl(String),

    #[error("could not encode event: {0}")]
    Encode(#[from] serde_json::Error),
}
