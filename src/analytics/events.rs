use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub id: Uuid,
    pub business_id: Uuid,
    pub visitor_id: String,
    pub session_id: String,
    pub path: String,
    pub referrer: Option<String>,
    pub started_at: DateTime<Utc>,
    pub load_time_ms: Option<u64>,
}

/// Accumulated engagement for a page view, sent when the visitor leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViewUpdate {
    pub id: Uuid,
    pub business_id: Uuid,
    pub time_on_page_ms: u64,
    pub scroll_depth: u8,
    pub clicks: u32,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    VisitorUpserted {
        visitor_id: String,
        business_id: Uuid,
        seen_at: DateTime<Utc>,
        user_agent: Option<String>,
    },
    SessionStarted {
        session_id: String,
        visitor_id: String,
        business_id: Uuid,
        started_at: DateTime<Utc>,
        landing_path: String,
        referrer: Option<String>,
    },
    PageView(PageView),
    PageViewUpdated(PageViewUpdate),
}

impl AnalyticsEvent {
    pub fn business_id(&self) -> Uuid {
        match self {
            AnalyticsEvent::VisitorUpserted { business_id, .. }
            | AnalyticsEvent::SessionStarted { business_id, .. } => *business_id,
            AnalyticsEvent::PageView(view) => view.business_id,
            AnalyticsEvent::PageViewUpdated(update) => update.business_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::VisitorUpserted { .. } => "visitor_upserted",
            AnalyticsEvent::SessionStarted { .. } => "session_started",
            AnalyticsEvent::PageView(_) => "page_view",
            AnalyticsEvent::PageViewUpdated(_) => "page_view_updated",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub page_views: i64,
    pub unique_visitors: i64,
    pub sessions: i64,
    pub avg_time_on_page_ms: Option<f64>,
    pub avg_scroll_depth: Option<f64>,
}
