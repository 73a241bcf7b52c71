use crate::analytics::{
    AnalyticsEvent, AnalyticsSink, AnalyticsSummary, BackendSink, DualWriter, IngestionClient,
};
use crate::database::{AnalyticsRepository, StoreError};
use std::sync::Arc;
use uuid::Uuid;

pub struct AnalyticsService {
    writer: DualWriter,
    repo: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    /// Events always go to the backend tables, and to the ingestion API when one is configured.
    pub fn new(repo: Arc<dyn AnalyticsRepository>, ingestion: Option<IngestionClient>) -> Self {
        let mut writer = DualWriter::default().with_sink(Arc::new(BackendSink::new(repo.clone())));
        match ingestion {
            Some(client) => {
                tracing::info!(api = %client.api_url, datasource = %client.datasource, "Analytics ingestion enabled");
                writer = writer.with_sink(Arc::new(client) as Arc<dyn AnalyticsSink>);
            }
            None => tracing::info!("ANALYTICS_TOKEN not set, analytics ingestion disabled"),
        }
        Self::with_writer(writer, repo)
    }

    pub fn with_writer(writer: DualWriter, repo: Arc<dyn AnalyticsRepository>) -> Self {
        Self { writer, repo }
    }

    pub fn sinks(&self) -> Vec<&'static str> {
        self.writer.sink_names()
    }

    /// Returns how many sinks accepted the batch.
    pub async fn record(&self, events: &[AnalyticsEvent]) -> usize {
        self.writer.dispatch(events).await
    }

    pub async fn summary(&self, business_id: Uuid) -> Result<AnalyticsSummary, StoreError> {
        self.repo.summary(business_id).await
    }
}
