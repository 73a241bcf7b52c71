use crate::analytics::{AnalyticsEvent, AnalyticsSink, BackendSink, PageViewTracker};
use crate::database::sqlite::SqliteRepository;
use crate::database::{AnalyticsRepository, BusinessRepository, ContentRepository, StoreError};
use crate::domain::{Business, OpeningHours, SeoSettings};
use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use uuid::Uuid;

// fresh in-memory database per test
async fn setup_test_db() -> SqliteRepository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    SqliteRepository::new(pool)
}

fn create_mock_business(name: &str, subdomain: Option<&str>) -> Business {
    let mut business = Business::new(name, "salon");
    business.phone = "555 0100".to_string();
    business.photos = vec!["https://img.example.com/a.jpg".to_string()];
    business.rating = Some(4.5);
    business.hours = vec![OpeningHours {
        day: "Tuesday".to_string(),
        open: "09:00".to_string(),
        close: "18:00".to_string(),
    }];
    business.subdomain = subdomain.map(str::to_string);
    business
}

#[tokio::test]
async fn test_business_save_and_retrieve() {
    let repo = setup_test_db().await;
    let business = create_mock_business("Cut & Co", Some("cutco"));
    repo.save_business(&business).await.expect("Should save business");

    let loaded = repo
        .get_business(business.id)
        .await
        .unwrap()
        .expect("Business should exist");
    assert_eq!(loaded.name, "Cut & Co");
    assert_eq!(loaded.photos, business.photos);
    assert_eq!(loaded.hours, business.hours);
    assert_eq!(loaded.rating, Some(4.5));
    assert_eq!(loaded.seo, SeoSettings::default());

    let by_subdomain = repo.get_business_by_subdomain("cutco").await.unwrap();
    assert_eq!(by_subdomain.map(|b| b.id), Some(business.id));

    assert!(repo.get_business(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_content_versions_and_conflicts() {
    let repo = setup_test_db().await;
    let business = create_mock_business("Cut & Co", None);
    repo.save_business(&business).await.unwrap();

    assert!(repo.get_content(business.id).await.unwrap().is_none());

    let v1 = repo.save_content(business.id, "{\"a\":1}", 0).await.unwrap();
    assert_eq!(v1, 1);
    let v2 = repo.save_content(business.id, "{\"a\":2}", 1).await.unwrap();
    assert_eq!(v2, 2);

    // a second first-save and a stale update both lose
    let stale_insert = repo.save_content(business.id, "{}", 0).await;
    assert!(matches!(
        stale_insert,
        Err(StoreError::Conflict {
            expected: 0,
            actual: 2
        })
    ));
    let stale_update = repo.save_content(business.id, "{}", 1).await;
    assert!(matches!(
        stale_update,
        Err(StoreError::Conflict {
            expected: 1,
            actual: 2
        })
    ));

    let stored = repo.get_content(business.id).await.unwrap().unwrap();
    assert_eq!(stored.raw, "{\"a\":2}");
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn test_subdomain_must_be_unique() {
    let repo = setup_test_db().await;
    let first = create_mock_business("First", Some("shared"));
    let second = create_mock_business("Second", None);
    repo.save_business(&first).await.unwrap();
    repo.save_business(&second).await.unwrap();

    let result = repo.set_subdomain(second.id, "shared").await;
    assert!(matches!(result, Err(StoreError::SubdomainTaken(ref s)) if s == "shared"));

    // re-assigning your own subdomain is fine
    repo.set_subdomain(first.id, "shared").await.unwrap();

    let clash = create_mock_business("Third", Some("shared"));
    assert!(matches!(
        repo.save_business(&clash).await,
        Err(StoreError::SubdomainTaken(_))
    ));
}

#[tokio::test]
async fn test_claim_and_publish() {
    let repo = setup_test_db().await;
    let business = create_mock_business("Cut & Co", Some("cutco"));
    repo.save_business(&business).await.unwrap();

    repo.claim_business(business.id, "alice").await.unwrap();
    // claiming again as the owner is a no-op
    repo.claim_business(business.id, "alice").await.unwrap();
    assert!(matches!(
        repo.claim_business(business.id, "bob").await,
        Err(StoreError::AlreadyClaimed)
    ));
    assert!(matches!(
        repo.claim_business(Uuid::new_v4(), "bob").await,
        Err(StoreError::NotFound { .. })
    ));

    assert!(repo.list_published().await.unwrap().is_empty());
    repo.set_published(business.id, true).await.unwrap();

    let published = repo.list_published().await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].owner_id.as_deref(), Some("alice"));
    assert!(published[0].is_published);

    assert!(matches!(
        repo.set_published(Uuid::new_v4(), true).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_seo() {
    let repo = setup_test_db().await;
    let business = create_mock_business("Cut & Co", None);
    repo.save_business(&business).await.unwrap();

    let seo = SeoSettings {
        seo_title: "Cut & Co | Hair salon".to_string(),
        keywords: "hair, salon".to_string(),
        favicon: Some("/favicon.ico".to_string()),
        ..Default::default()
    };
    repo.update_seo(business.id, &seo).await.unwrap();

    let loaded = repo.get_business(business.id).await.unwrap().unwrap();
    assert_eq!(loaded.seo, seo);
}

#[tokio::test]
async fn test_analytics_events_and_summary() {
    let repo = setup_test_db().await;
    let business_id = Uuid::new_v4();
    let now = Utc::now();

    let visitor = AnalyticsEvent::VisitorUpserted {
        visitor_id: "v1".to_string(),
        business_id,
        seen_at: now,
        user_agent: Some("test-agent".to_string()),
    };
    // upserting the same visitor twice keeps one row
    repo.record_event(&visitor).await.unwrap();
    repo.record_event(&visitor).await.unwrap();

    repo.record_event(&AnalyticsEvent::SessionStarted {
        session_id: "s1".to_string(),
        visitor_id: "v1".to_string(),
        business_id,
        started_at: now,
        landing_path: "/".to_string(),
        referrer: None,
    })
    .await
    .unwrap();

    let mut home = PageViewTracker::start(business_id, "v1", "s1", "/", None, now, Some(200));
    let mut menu = PageViewTracker::start(business_id, "v2", "s2", "/menu", None, now, None);
    repo.record_event(&AnalyticsEvent::PageView(home.view().clone()))
        .await
        .unwrap();
    repo.record_event(&AnalyticsEvent::PageView(menu.view().clone()))
        .await
        .unwrap();

    home.record_scroll(100.0);
    menu.record_scroll(50.0);
    repo.record_event(&AnalyticsEvent::PageViewUpdated(
        home.finish(now + Duration::seconds(10)),
    ))
    .await
    .unwrap();
    repo.record_event(&AnalyticsEvent::PageViewUpdated(
        menu.finish(now + Duration::seconds(30)),
    ))
    .await
    .unwrap();

    let summary = repo.summary(business_id).await.unwrap();
    assert_eq!(summary.page_views, 2);
    assert_eq!(summary.unique_visitors, 2);
    assert_eq!(summary.sessions, 1);
    assert_eq!(summary.avg_time_on_page_ms, Some(20_000.0));
    assert_eq!(summary.avg_scroll_depth, Some(75.0));

    let empty = repo.summary(Uuid::new_v4()).await.unwrap();
    assert_eq!(empty.page_views, 0);
    assert_eq!(empty.avg_time_on_page_ms, None);
}

#[tokio::test]
async fn test_update_for_unknown_page_view() {
    let repo = setup_test_db().await;
    let tracker = PageViewTracker::start(Uuid::new_v4(), "v", "s", "/", None, Utc::now(), None);

    let result = repo
        .record_event(&AnalyticsEvent::PageViewUpdated(tracker.finish(Utc::now())))
        .await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_backend_sink_keeps_events_after_a_failed_one() {
    let repo = Arc::new(setup_test_db().await);
    let sink = BackendSink::new(repo.clone());
    let business_id = Uuid::new_v4();
    let now = Utc::now();

    let stale = PageViewTracker::start(business_id, "v1", "s1", "/old", None, now, None);
    let fresh = PageViewTracker::start(business_id, "v1", "s1", "/", None, now, None);
    let batch = [
        AnalyticsEvent::PageViewUpdated(stale.finish(now)),
        AnalyticsEvent::PageView(fresh.view().clone()),
    ];

    sink.send(&batch).await.unwrap();
    assert_eq!(repo.summary(business_id).await.unwrap().page_views, 1);

    // a batch where nothing lands is reported
    assert!(sink.send(&batch[..1]).await.is_err());
}

#[tokio::test]
async fn test_page_view_update_is_clamped() {
    let repo = setup_test_db().await;
    let business_id = Uuid::new_v4();
    let tracker = PageViewTracker::start(business_id, "v1", "s1", "/", None, Utc::now(), None);
    repo.record_event(&AnalyticsEvent::PageView(tracker.view().clone()))
        .await
        .unwrap();

    // raw client payload, not built by the tracker
    let mut update = tracker.finish(Utc::now());
    update.scroll_depth = 255;
    update.time_on_page_ms = u64::MAX;
    repo.record_event(&AnalyticsEvent::PageViewUpdated(update))
        .await
        .unwrap();

    let summary = repo.summary(business_id).await.unwrap();
    assert_eq!(summary.avg_scroll_depth, Some(100.0));
    assert_eq!(summary.avg_time_on_page_ms, Some(i64::MAX as f64));
}

// same repository against a database file, created the way the server creates it
#[tokio::test]
async fn test_on_disk_database_persists_across_pools() {
    use sqlx::migrate::MigrateDatabase;
    use sqlx::Sqlite;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("pagesmith.db").display());
    Sqlite::create_database(&url).await.unwrap();

    let business = create_mock_business("Cut & Co", Some("cutco"));
    {
        let pool = SqlitePoolOptions::new().connect(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let repo = SqliteRepository::new(pool.clone());
        repo.save_business(&business).await.unwrap();
        repo.save_content(business.id, "{}", 0).await.unwrap();
        pool.close().await;
    }

    let pool = SqlitePoolOptions::new().connect(&url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    let repo = SqliteRepository::new(pool);

    assert!(repo.get_business(business.id).await.unwrap().is_some());
    assert_eq!(repo.get_content(business.id).await.unwrap().unwrap().version, 1);
}
