use crate::analytics::events::{PageView, PageViewUpdate};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Accumulates engagement for one page view until the visitor leaves.
#[derive(Debug, Clone)]
pub struct PageViewTracker {
    view: PageView,
    max_scroll_depth: u8,
    clicks: u32,
}

impl PageViewTracker {
    pub fn start(
        business_id: Uuid,
        visitor_id: &str,
        session_id: &str,
        path: &str,
        referrer: Option<String>,
        started_at: DateTime<Utc>,
        load_time_ms: Option<u64>,
    ) -> Self {
        Self {
            view: PageView {
                id: Uuid::new_v4(),
                business_id,
                visitor_id: visitor_id.to_string(),
                session_id: session_id.to_string(),
                path: path.to_string(),
                referrer: referrer.filter(|r| !r.is_empty()),
                started_at,
                load_time_ms,
            },
            max_scroll_depth: 0,
            clicks: 0,
        }
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    /// Scroll depth in percent; only the deepest point counts.
    pub fn record_scroll(&mut self, percent: f64) {
        let depth = if percent.is_nan() {
            0
        } else {
            percent.clamp(0.0, 100.0).round() as u8
        };
        self.max_scroll_depth = self.max_scroll_depth.max(depth);
    }

    pub fn record_click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    pub fn finish(&self, ended_at: DateTime<Utc>) -> PageViewUpdate {
        let elapsed = (ended_at - self.view.started_at).num_milliseconds().max(0);
        PageViewUpdate {
            id: self.view.id,
            business_id: self.view.business_id,
            time_on_page_ms: elapsed as u64,
            scroll_depth: self.max_scroll_depth,
            clicks: self.clicks,
            ended_at,
        }
    }
}
