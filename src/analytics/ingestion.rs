use crate::analytics::events::AnalyticsEvent;
use crate::analytics::sink::AnalyticsSink;
use crate::analytics::AnalyticsError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

/// Client for the hosted event store: NDJSON ingestion and pipe queries.
pub struct IngestionClient {
    pub client: Client,
    pub api_url: String,
    pub token: String,
    pub datasource: String,
}

#[derive(Deserialize)]
struct PipeResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl IngestionClient {
    /// `None` when no token is configured; ingestion is then disabled.
    pub fn from_token(
        api_url: impl Into<String>,
        token: Option<String>,
        datasource: impl Into<String>,
    ) -> Option<Self> {
        let token = token.filter(|t| !t.trim().is_empty())?;
        Some(Self {
            client: Client::new(),
            api_url: api_url.into(),
            token,
            datasource: datasource.into(),
        })
    }

    fn base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn events_url(&self) -> Result<Url, AnalyticsError> {
        let endpoint = format!("{}/v0/events", self.base());
        Url::parse_with_params(&endpoint, &[("name", self.datasource.as_str())])
            .map_err(|e| AnalyticsError::InvalidUrl(e.to_string()))
    }

    pub fn pipe_url(&self, pipe: &str, params: &[(&str, &str)]) -> Result<Url, AnalyticsError> {
        let endpoint = format!("{}/v0/pipes/{}.json", self.base(), pipe);
        let mut url = Url::parse_with_params(&endpoint, &[("token", self.token.as_str())])
            .map_err(|e| AnalyticsError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// One JSON document per line.
    pub fn encode_ndjson(events: &[AnalyticsEvent]) -> Result<String, AnalyticsError> {
        let mut body = String::new();
        for event in events {
            body.push_str(&serde_json::to_string(event)?);
            body.push('\n');
        }
        Ok(body)
    }

    pub async fn ingest(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError> {
        let body = Self::encode_ndjson(events)?;
        let res = self
            .client
            .post(self.events_url()?)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AnalyticsError::Rejected { status, body });
        }

        tracing::debug!(
            datasource = %self.datasource,
            events = events.len(),
            "Ingested analytics events"
        );
        Ok(())
    }

    /// Runs a published pipe and returns its `data` rows.
    pub async fn query(
        &self,
        pipe: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Value>, AnalyticsError> {
        let res = self.client.get(self.pipe_url(pipe, params)?).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AnalyticsError::Rejected { status, body });
        }

        let parsed: PipeResponse = res.json().await?;
        Ok(parsed.data)
    }
}

#[async_trait]
impl AnalyticsSink for IngestionClient {
    fn name(&self) -> &'static str {
        "ingestion"
    }

    async fn send(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError> {
        self.ingest(events).await
    }
}
