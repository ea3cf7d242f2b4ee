//! HTTP boundary tests
//!
//! Exercises the actix handlers end to end over the in-memory backend.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use shortmap::api::{self, AppStartTime};
use shortmap::services::MapperService;
use shortmap::storage::memory::MemoryStore;

macro_rules! test_app {
    () => {{
        let service = Arc::new(MapperService::new(Arc::new(MemoryStore::new())));
        test::init_service(
            App::new()
                .app_data(web::Data::new(service.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(api::configure),
        )
        .await
    }};
}

macro_rules! shorten {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/shorten")
            .set_json($body)
            .to_request();
        test::call_service($app, req).await
    }};
}

#[actix_web::test]
async fn test_shorten_returns_short_url() {
    let app = test_app!();

    let resp = shorten!(&app, json!({"url": "https://example.com"}));
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    let short_url = body["shortUrl"].as_str().unwrap();
    assert!(short_url.starts_with("http://localhost:8080/"));
}

#[actix_web::test]
async fn test_redirect_round_trip() {
    let app = test_app!();

    let resp = shorten!(&app, json!({"url": "https://example.com"}));
    let body: Value = test::read_body_json(resp).await;
    let code = body["shortUrl"].as_str().unwrap().rsplit('/').next().unwrap().to_string();

    let req = test::TestRequest::get().uri(&format!("/{}", code)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 307);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "https://example.com"
    );
}

#[actix_web::test]
async fn test_stats_reports_click_count_and_omits_absent_expiry() {
    let app = test_app!();

    let resp = shorten!(&app, json!({"url": "https://example.com"}));
    let body: Value = test::read_body_json(resp).await;
    let code = body["shortUrl"].as_str().unwrap().rsplit('/').next().unwrap().to_string();

    // One click
    let req = test::TestRequest::get().uri(&format!("/{}", code)).to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/stats/{}", code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let stats: Value = test::read_body_json(resp).await;
    assert_eq!(stats["originalUrl"], "https://example.com");
    assert_eq!(stats["clickCount"], 1);
    assert!(stats.get("creationDate").is_some());
    assert!(stats.get("expirationDate").is_none());
}

#[actix_web::test]
async fn test_custom_alias_conflict_is_409() {
    let app = test_app!();

    let resp = shorten!(&app, json!({"url": "https://example.com", "customAlias": "promo"}));
    assert_eq!(resp.status(), 201);

    let resp = shorten!(&app, json!({"url": "https://other.example.com", "customAlias": "promo"}));
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn test_invalid_input_is_400() {
    let app = test_app!();

    let resp = shorten!(&app, json!({"url": "not a url"}));
    assert_eq!(resp.status(), 400);

    let resp = shorten!(&app, json!({"url": "https://example.com", "ttlHours": 0}));
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_unknown_code_is_404() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get().uri("/api/stats/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_ttl_appears_in_stats() {
    let app = test_app!();

    let resp = shorten!(&app, json!({"url": "https://example.com", "customAlias": "timed", "ttlHours": 2}));
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/api/stats/timed").to_request();
    let resp = test::call_service(&app, req).await;
    let stats: Value = test::read_body_json(resp).await;
    assert!(stats.get("expirationDate").is_some());
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}
