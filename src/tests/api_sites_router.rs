use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use crate::domain::Business;
use crate::tests::api_pages_router::{send, setup_api_test_app, TestApp};
use crate::tests::integration_site_service::sample_business;
use serde_json::json;

async fn publish_site(test: &TestApp, name: &str, subdomain: &str) -> Business {
    let mut business = sample_business(name);
    business.subdomain = Some(subdomain.to_string());
    let id = test.businesses.add(business);

    let (status, _) = send(
        &test.app,
        "POST",
        &format!("/api/pages/{}/operations", id),
        Some(json!({
            "expectedVersion": 0,
            "operations": [ { "op": "add", "variationId": "hero-centered" } ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &test.app,
        "POST",
        &format!("/api/businesses/{}/publish", id),
        Some(json!({ "userId": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    test.businesses.get(id)
}

async fn get_site(app: &Router, uri: &str, if_none_match: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(tag) = if_none_match {
        builder = builder.header(header::IF_NONE_MATCH, tag);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_unknown_site_is_404() {
    let test = setup_api_test_app().await;
    let response = get_site(&test.app, "/sites/nobody", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unpublished_site_is_404() {
    let test = setup_api_test_app().await;
    let mut business = sample_business("Draft");
    business.subdomain = Some("draft".to_string());
    test.businesses.add(business);

    let response = get_site(&test.app, "/sites/draft", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_published_site_renders_with_etag() {
    let test = setup_api_test_app().await;
    publish_site(&test, "Luigi's", "luigis").await;

    // subdomains are case insensitive
    let response = get_site(&test.app, "/sites/Luigis", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let etag = response
        .headers()
        .get(header::ETAG)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Welcome to Luigi&#39;s"));

    let response = get_site(&test.app, "/sites/luigis", Some(&etag)).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(body_text(response).await.is_empty());

    let response = get_site(&test.app, "/sites/luigis", Some("\"stale\"")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unpublish_takes_site_down() {
    let test = setup_api_test_app().await;
    let business = publish_site(&test, "Luigi's", "luigis").await;
    assert_eq!(get_site(&test.app, "/sites/luigis", None).await.status(), StatusCode::OK);

    let (status, json) = send(
        &test.app,
        "POST",
        &format!("/api/businesses/{}/unpublish", business.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "unpublished");

    assert_eq!(
        get_site(&test.app, "/sites/luigis", None).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_preview_applies_messages_from_editor_origin() {
    let test = setup_api_test_app().await;
    let business = sample_business("Luigi's");

    let body = json!({
        "content": {
            "version": 3,
            "title": "Home",
            "theme": crate::domain::theme::Theme::default(),
            "sections": [
                { "id": "h1", "variationId": "hero-centered", "order": 0,
                  "data": { "category": "hero", "headline": "Old headline" } }
            ]
        },
        "business": business,
        "messages": [
            { "type": "LIVE_UPDATE", "field": "sections[0].data.headline", "value": "New headline" }
        ]
    });

    let request = |origin: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/preview")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, origin)
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = test
        .app
        .clone()
        .oneshot(request("https://app.example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("New headline"));

    // messages from another origin are dropped, the page still renders
    let response = test
        .app
        .clone()
        .oneshot(request("https://evil.example.net"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Old headline"));
    assert!(!html.contains("New headline"));
}
