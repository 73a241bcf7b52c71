use crate::analytics::{
    AnalyticsError, AnalyticsEvent, AnalyticsSink, AnalyticsSummary, DualWriter, PageView,
};
use crate::database::{
    AnalyticsRepository, BusinessRepository, ContentRepository, StoreError, StoredContent,
};
use crate::domain::content::{PageContent, SectionData, CURRENT_SCHEMA_VERSION};
use crate::domain::{Business, SeoSettings};
use crate::editor::{EditorSession, SectionOp, SessionError};
use crate::services::site::SiteService;
use crate::services::SiteError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// --- Manual Mock: BusinessRepository ---
// keeps businesses in a HashMap and records every write so tests can assert
// which store calls were (or were not) made
#[derive(Clone, Default)]
pub struct MockBusinessRepository {
    pub businesses: Arc<Mutex<HashMap<Uuid, Business>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_set_published: Arc<Mutex<bool>>,
}

impl MockBusinessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, business: Business) -> Uuid {
        let id = business.id;
        self.businesses.lock().unwrap().insert(id, business);
        id
    }

    pub fn get(&self, id: Uuid) -> Business {
        self.businesses.lock().unwrap()[&id].clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn not_found(id: Uuid) -> StoreError {
        StoreError::NotFound {
            entity: "business",
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl BusinessRepository for MockBusinessRepository {
    async fn get_business(&self, id: Uuid) -> Result<Option<Business>, StoreError> {
        Ok(self.businesses.lock().unwrap().get(&id).cloned())
    }

    async fn get_business_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<Business>, StoreError> {
        Ok(self
            .businesses
            .lock()
            .unwrap()
            .values()
            .find(|b| b.subdomain.as_deref() == Some(subdomain))
            .cloned())
    }

    async fn list_published(&self) -> Result<Vec<Business>, StoreError> {
        Ok(self
            .businesses
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.is_published)
            .cloned()
            .collect())
    }

    async fn save_business(&self, business: &Business) -> Result<(), StoreError> {
        self.record("save_business");
        self.businesses
            .lock()
            .unwrap()
            .insert(business.id, business.clone());
        Ok(())
    }

    async fn claim_business(&self, id: Uuid, user_id: &str) -> Result<(), StoreError> {
        self.record("claim_business");
        let mut businesses = self.businesses.lock().unwrap();
        let business = businesses.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        match business.owner_id.as_deref() {
            Some(owner) if owner != user_id => Err(StoreError::AlreadyClaimed),
            _ => {
                business.owner_id = Some(user_id.to_string());
                Ok(())
            }
        }
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<(), StoreError> {
        self.record("set_published");
        if *self.fail_set_published.lock().unwrap() {
            return Err(StoreError::Corrupt("publish flag write failed".to_string()));
        }
        let mut businesses = self.businesses.lock().unwrap();
        let business = businesses.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        business.is_published = published;
        Ok(())
    }

    async fn set_subdomain(&self, id: Uuid, subdomain: &str) -> Result<(), StoreError> {
        self.record("set_subdomain");
        let mut businesses = self.businesses.lock().unwrap();
        let taken = businesses
            .values()
            .any(|b| b.id != id && b.subdomain.as_deref() == Some(subdomain));
        if taken {
            return Err(StoreError::SubdomainTaken(subdomain.to_string()));
        }
        let business = businesses.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        business.subdomain = Some(subdomain.to_string());
        Ok(())
    }

    async fn update_seo(&self, id: Uuid, seo: &SeoSettings) -> Result<(), StoreError> {
        self.record("update_seo");
        let mut businesses = self.businesses.lock().unwrap();
        let business = businesses.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        business.seo = seo.clone();
        Ok(())
    }
}

// --- Manual Mock: ContentRepository ---
// same version check as the sqlite store: a write must name the version it read
#[derive(Clone, Default)]
pub struct MockContentRepository {
    pub pages: Arc<Mutex<HashMap<Uuid, StoredContent>>>,
}

impl MockContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_raw(&self, business_id: Uuid, raw: &str, version: i64) {
        self.pages.lock().unwrap().insert(
            business_id,
            StoredContent {
                raw: raw.to_string(),
                version,
                updated_at: Utc::now().naive_utc(),
            },
        );
    }
}

#[async_trait]
impl ContentRepository for MockContentRepository {
    async fn get_content(&self, business_id: Uuid) -> Result<Option<StoredContent>, StoreError> {
        Ok(self.pages.lock().unwrap().get(&business_id).cloned())
    }

    async fn save_content(
        &self,
        business_id: Uuid,
        raw: &str,
        expected_version: i64,
    ) -> Result<i64, StoreError> {
        let mut pages = self.pages.lock().unwrap();
        let actual = pages.get(&business_id).map(|p| p.version).unwrap_or(0);
        if actual != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                actual,
            });
        }
        let version = actual + 1;
        pages.insert(
            business_id,
            StoredContent {
                raw: raw.to_string(),
                version,
                updated_at: Utc::now().naive_utc(),
            },
        );
        Ok(version)
    }
}

// --- Manual Mock: AnalyticsRepository ---
#[derive(Clone, Default)]
pub struct MockAnalyticsRepository {
    pub events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

#[async_trait]
impl AnalyticsRepository for MockAnalyticsRepository {
    async fn record_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn summary(&self, business_id: Uuid) -> Result<AnalyticsSummary, StoreError> {
        let events = self.events.lock().unwrap();
        let views: Vec<&PageView> = events
            .iter()
            .filter_map(|e| match e {
                AnalyticsEvent::PageView(view) if view.business_id == business_id => Some(view),
                _ => None,
            })
            .collect();
        let visitors: HashSet<&str> = views.iter().map(|v| v.visitor_id.as_str()).collect();
        let sessions = events
            .iter()
            .filter(|e| {
                matches!(e, AnalyticsEvent::SessionStarted { .. }) && e.business_id() == business_id
            })
            .count();

        Ok(AnalyticsSummary {
            page_views: views.len() as i64,
            unique_visitors: visitors.len() as i64,
            sessions: sessions as i64,
            ..Default::default()
        })
    }
}

// --- Manual Mock: AnalyticsSink ---
// counts events, or fails every send when `fail` is set
#[derive(Clone, Default)]
pub struct MockSink {
    pub received: Arc<Mutex<Vec<AnalyticsEvent>>>,
    pub fail: bool,
}

#[async_trait]
impl AnalyticsSink for MockSink {
    fn name(&self) -> &'static str {
        if self.fail {
            "failing"
        } else {
            "recording"
        }
    }

    async fn send(&self, events: &[AnalyticsEvent]) -> Result<(), AnalyticsError> {
        if self.fail {
            return Err(AnalyticsError::Rejected {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.received.lock().unwrap().extend_from_slice(events);
        Ok(())
    }
}

pub fn sample_business(name: &str) -> Business {
    let mut business = Business::new(name, "restaurant");
    business.description = "Family kitchen".to_string();
    business.address = "1 Main St".to_string();
    business
}

pub async fn setup_site_service() -> (SiteService, MockBusinessRepository, MockContentRepository) {
    let businesses = MockBusinessRepository::new();
    let content = MockContentRepository::new();
    let service = SiteService::new(
        Arc::new(businesses.clone()),
        Arc::new(content.clone()),
        "example.com",
    )
    .await
    .unwrap();
    (service, businesses, content)
}

fn add_hero() -> SectionOp {
    SectionOp::Add {
        variation_id: "hero-centered".to_string(),
        data: None,
        id: None,
    }
}

#[tokio::test]
async fn test_blank_page_for_new_business() {
    let (service, businesses, _) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));

    let page = service.load_page(id).await.unwrap();
    assert_eq!(page.version, 0);
    assert_eq!(page.content.title, "Luigi's");
    assert!(page.content.sections.is_empty());
    // themed for the business category
    assert_eq!(
        page.content.theme,
        crate::domain::theme::Theme::for_category("restaurant")
    );
}

#[tokio::test]
async fn test_unknown_business_is_not_found() {
    let (service, _, _) = setup_site_service().await;
    let result = service.load_page(Uuid::new_v4()).await;
    assert!(matches!(result, Err(SiteError::NotFound(_))));
}

#[tokio::test]
async fn test_unreadable_content_loads_blank_at_stored_version() {
    let (service, businesses, content) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));
    content.put_raw(id, "{ definitely not json", 4);

    let page = service.load_page(id).await.unwrap();
    assert_eq!(page.version, 4);
    assert!(page.content.sections.is_empty());
}

#[tokio::test]
async fn test_apply_operations_saves_new_version() {
    let (service, businesses, _) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));

    let page = service
        .apply_operations(id, 0, &[add_hero(), add_hero()])
        .await
        .unwrap();
    assert_eq!(page.version, 1);
    assert_eq!(page.content.sections.len(), 2);

    let reloaded = service.load_page(id).await.unwrap();
    assert_eq!(reloaded, page);
}

#[tokio::test]
async fn test_stale_save_is_rejected() {
    let (service, businesses, _) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));

    let first = service.load_page(id).await.unwrap();
    let second = service.load_page(id).await.unwrap();

    service
        .save_page(id, first.version, first.content)
        .await
        .unwrap();
    let stale = service.save_page(id, second.version, second.content).await;

    assert!(matches!(
        stale,
        Err(SiteError::Store(StoreError::Conflict {
            expected: 0,
            actual: 1
        }))
    ));

    let stale_ops = service.apply_operations(id, 0, &[add_hero()]).await;
    assert!(matches!(
        stale_ops,
        Err(SiteError::Store(StoreError::Conflict { .. }))
    ));
}

#[tokio::test]
async fn test_saved_page_is_stamped_with_current_schema() {
    let (service, businesses, _) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));

    let mut content = service
        .apply_operations(id, 0, &[add_hero()])
        .await
        .unwrap()
        .content;
    // a client claiming a schema this server does not know
    content.version = 99;
    assert_eq!(service.save_page(id, 1, content).await.unwrap(), 2);

    let page = service.load_page(id).await.unwrap();
    assert_eq!(page.version, 2);
    assert_eq!(page.content.version, CURRENT_SCHEMA_VERSION);
    assert_eq!(page.content.sections.len(), 1);
}

#[tokio::test]
async fn test_save_for_unknown_business_writes_nothing() {
    let (service, _, content) = setup_site_service().await;
    let id = Uuid::new_v4();

    let result = service.save_page(id, 0, PageContent::empty()).await;
    assert!(matches!(result, Err(SiteError::NotFound(missing)) if missing == id));
    assert!(content.get_content(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_operation_changes_nothing() {
    let (service, businesses, _) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));

    let result = service
        .apply_operations(
            id,
            0,
            &[
                add_hero(),
                SectionOp::Remove {
                    id: "missing".to_string(),
                },
            ],
        )
        .await;
    assert!(matches!(result, Err(SiteError::Edit(_))));

    let page = service.load_page(id).await.unwrap();
    assert_eq!(page.version, 0);
}

#[tokio::test]
async fn test_published_site_is_cached_until_saved() {
    let (service, businesses, _) = setup_site_service().await;
    let mut business = sample_business("Luigi's");
    business.subdomain = Some("luigis".to_string());
    let id = businesses.add(business);

    // not published yet
    assert!(service.render_site("luigis").await.unwrap().is_none());

    service.apply_operations(id, 0, &[add_hero()]).await.unwrap();
    let outcome = service.publish(id, "user-1").await.unwrap();
    assert_eq!(outcome.url.as_deref(), Some("https://luigis.example.com"));

    let first = service.render_site("luigis").await.unwrap().unwrap();
    assert!(first.html.contains("Welcome to Luigi&#39;s"));
    let cached = service.render_site("luigis").await.unwrap().unwrap();
    assert_eq!(first, cached);

    service
        .apply_operations(
            id,
            1,
            &[SectionOp::SetTitle {
                title: "New title".to_string(),
            }],
        )
        .await
        .unwrap();
    let page = service.load_page(id).await.unwrap();
    let hero_id = page.content.sections[0].id.clone();
    service
        .apply_operations(
            id,
            2,
            &[SectionOp::EditField {
                id: hero_id,
                path: "headline".to_string(),
                value: serde_json::json!("Best pasta in town"),
            }],
        )
        .await
        .unwrap();

    let refreshed = service.render_site("luigis").await.unwrap().unwrap();
    assert_ne!(refreshed.etag, first.etag);
    assert!(refreshed.html.contains("Best pasta in town"));

    service.unpublish(id).await.unwrap();
    assert!(service.render_site("luigis").await.unwrap().is_none());
}

#[tokio::test]
async fn test_domain_change_moves_the_site() {
    let (service, businesses, _) = setup_site_service().await;
    let mut business = sample_business("Luigi's");
    business.subdomain = Some("luigis".to_string());
    let id = businesses.add(business);

    service.publish(id, "user-1").await.unwrap();
    assert!(service.render_site("luigis").await.unwrap().is_some());

    let outcome = service.update_domain(id, "  Luigis-Kitchen ").await.unwrap();
    assert_eq!(outcome.subdomain.as_deref(), Some("luigis-kitchen"));
    assert_eq!(outcome.url.as_deref(), Some("https://luigis-kitchen.example.com"));

    assert!(service.render_site("luigis").await.unwrap().is_none());
    assert!(service.render_site("luigis-kitchen").await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_seo_returns_score() {
    let (service, businesses, _) = setup_site_service().await;
    let id = businesses.add(sample_business("Luigi's"));

    let settings = SeoSettings {
        og_image: Some("https://img.example.com/og.jpg".to_string()),
        ..Default::default()
    };
    let report = service.update_seo(id, &settings).await.unwrap();
    assert_eq!(report.score, 15);
    assert_eq!(businesses.get(id).seo, settings);
}

#[tokio::test]
async fn test_editor_session_rebases_after_conflict() {
    let businesses = MockBusinessRepository::new();
    let content = MockContentRepository::new();
    let id = businesses.add(sample_business("Luigi's"));

    let mut mine = EditorSession::open(&content, id, "Luigi's", Default::default())
        .await
        .unwrap();
    let mut theirs = EditorSession::open(&content, id, "Luigi's", Default::default())
        .await
        .unwrap();

    theirs
        .apply(SectionOp::SetTitle {
            title: "Theirs".to_string(),
        })
        .unwrap();
    theirs.save(&content).await.unwrap();

    mine.apply(add_hero()).unwrap();
    let added = mine.content.sections[0].id.clone();
    mine.apply(SectionOp::EditField {
        id: added.clone(),
        path: "headline".to_string(),
        value: serde_json::json!("Mine"),
    })
    .unwrap();

    let conflict = mine.save(&content).await;
    assert!(matches!(
        conflict,
        Err(SessionError::Store(StoreError::Conflict { .. }))
    ));
    assert!(mine.is_dirty());
    assert_eq!(mine.pending().len(), 2);

    let dropped = mine.rebase(&content).await.unwrap();
    assert!(dropped.is_empty());
    assert_eq!(mine.content.title, "Theirs");
    // the replayed add kept its id, so the edit still found it
    assert_eq!(mine.content.sections[0].id, added);
    match &mine.content.sections[0].data {
        SectionData::Hero(hero) => assert_eq!(hero.headline, "Mine"),
        other => panic!("expected hero, got {:?}", other),
    }

    assert_eq!(mine.save(&content).await.unwrap(), 2);
    assert!(!mine.is_dirty());
}

#[tokio::test]
async fn test_dual_writer_drops_events_for_failing_sink() {
    let recording = MockSink::default();
    let failing = MockSink {
        fail: true,
        ..Default::default()
    };
    let sinks: Vec<Arc<dyn AnalyticsSink>> = vec![Arc::new(failing), Arc::new(recording.clone())];
    let writer = DualWriter::new(sinks);
    assert_eq!(writer.sink_names(), vec!["failing", "recording"]);

    let event = AnalyticsEvent::VisitorUpserted {
        visitor_id: "v1".to_string(),
        business_id: Uuid::new_v4(),
        seen_at: Utc::now(),
        user_agent: None,
    };

    assert_eq!(writer.dispatch(&[event.clone()]).await, 1);
    assert_eq!(recording.received.lock().unwrap().as_slice(), &[event]);
    assert_eq!(writer.dispatch(&[]).await, 0);
}
