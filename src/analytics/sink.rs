use crate::analytics::events::AnalyticsEvent;
use crate::analytics::AnalyticsError;
use crate::database::AnalyticsRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// A destination for analytics events.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError>;
}

/// Writes events into the application's own tables.
pub struct BackendSink {
    repo: Arc<dyn AnalyticsRepository>,
}

impl BackendSink {
    pub fn new(repo: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AnalyticsSink for BackendSink {
    fn name(&self) -> &'static str {
        "backend"
    }

    /// Records events one by one. A failing event is logged and dropped; the
    /// rest of the batch is still written. Errors only when nothing was stored.
    async fn send(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError> {
        let mut last_error = None;
        let mut recorded = 0;
        for event in events {
            match self.repo.record_event(event).await {
                Ok(()) => recorded += 1,
                Err(e) => {
                    tracing::warn!(event = event.name(), error = %e, "Dropping analytics event");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if recorded == 0 => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Fans events out to every sink. A failing sink is logged and its copy of the
/// events is dropped; the other sinks still receive them.
#[derive(Clone, Default)]
pub struct DualWriter {
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl DualWriter {
    pub fn new(sinks: Vec<Arc<dyn AnalyticsSink>>) -> Self {
        Self { sinks }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Returns how many sinks accepted the batch.
    pub async fn dispatch(&self, events: &[AnalyticsEvent]) -> usize {
        if events.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.send(events).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        sink = sink.name(),
                        events = events.len(),
                        error = %e,
                        "Analytics sink failed, dropping events"
                    );
                }
            }
        }
        delivered
    }
}
