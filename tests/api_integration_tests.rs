//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use quota_cache::{
    api::create_router, AdaptiveCache, AppState, AuthMode, CacheStore, ManualClock, QuotaGroup,
    TtlPolicy,
};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app_with(clock: &ManualClock, per_minute: usize) -> Router {
    let policy = TtlPolicy::standard(Duration::from_secs(300)).unwrap();
    let store = CacheStore::new(64 * 1024, policy, clock.shared());
    let quota = QuotaGroup::new(clock.shared())
        .with_limiter("perMinute", per_minute, Duration::from_secs(60))
        .with_limiter("perHour", per_minute * 60, Duration::from_secs(3600));
    let state = AppState::new(
        AdaptiveCache::new(store, Duration::ZERO),
        quota,
        AuthMode::Anonymous,
    );
    create_router(state)
}

fn create_test_app() -> Router {
    create_test_app_with(&ManualClock::new(0), 10)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_cache(key: &str, value: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/cache")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"key":"{}","value":{}}}"#, key, value)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_method(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_cache("post:abc", r#"{"title":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("post:abc"));
}

#[tokio::test]
async fn test_set_endpoint_empty_key() {
    let app = create_test_app();

    let response = app.oneshot(put_cache("", r#""value""#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_set_endpoint_invalid_json() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key": "missing_value"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_set_then_get() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_cache("user:alice", r#"{"karma":42}"#))
        .await
        .unwrap();

    let response = app.oneshot(get("/cache/user:alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "user:alice");
    assert_eq!(json["value"]["karma"], 42);
}

#[tokio::test]
async fn test_get_expired_by_rule() {
    let clock = ManualClock::new(0);
    let app = create_test_app_with(&clock, 10);

    app.clone()
        .oneshot(put_cache("subreddit:rust:new", r#"["a","b"]"#))
        .await
        .unwrap();

    clock.advance(Duration::from_secs(119));
    let response = app.clone().oneshot(get("/cache/subreddit:rust:new")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // `:new` listings live two minutes
    clock.advance(Duration::from_secs(2));
    let response = app.oneshot(get("/cache/subreddit:rust:new")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app();

    app.clone().oneshot(put_cache("post:1", "1")).await.unwrap();

    let response = app
        .clone()
        .oneshot(with_method("DELETE", "/cache/post:1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(with_method("DELETE", "/cache/post:1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();

    app.clone().oneshot(put_cache("a", "1")).await.unwrap();
    app.clone().oneshot(put_cache("b", "2")).await.unwrap();

    let response = app
        .clone()
        .oneshot(with_method("DELETE", "/cache"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 2);

    let response = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache"]["entries"], 0);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    app.clone().oneshot(put_cache("post:1", r#""x""#)).await.unwrap();
    app.clone().oneshot(get("/cache/post:1")).await.unwrap();
    app.clone().oneshot(get("/cache/post:1")).await.unwrap();
    app.clone().oneshot(get("/cache/missing")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache"]["entries"], 1);
    assert_eq!(json["cache"]["size_used"], 3);
    assert_eq!(json["cache"]["hit_rate"], 2.0);
    assert_eq!(json["cache"]["misses"], 1);
    assert_eq!(json["cache"]["most_used"][0], "post:1");
    assert_eq!(json["quota"]["perMinute"]["limit"], 10);
    assert_eq!(json["quota"]["perHour"]["limit"], 600);
}

// == Quota Endpoint Tests ==

#[tokio::test]
async fn test_quota_endpoint_fresh() {
    let app = create_test_app();

    let response = app.oneshot(get("/quota")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["auth_mode"], "anonymous");
    assert_eq!(json["can_proceed"], true);
    assert_eq!(json["time_until_next_slot"], 0);
    assert!(json["blocking"].is_null());
}

#[tokio::test]
async fn test_acquire_until_429() {
    let clock = ManualClock::new(0);
    let app = create_test_app_with(&clock, 2);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(with_method("POST", "/quota/acquire"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    clock.advance(Duration::from_secs(15));
    let response = app
        .clone()
        .oneshot(with_method("POST", "/quota/acquire"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "45");

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["limiter"], "perMinute");
    assert_eq!(json["retry_after_secs"], 45);

    let response = app.clone().oneshot(get("/quota")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["can_proceed"], false);
    assert_eq!(json["blocking"]["name"], "perMinute");
    assert_eq!(json["limiters"]["perMinute"]["available"], 0);

    // The window slides: after the first records age out, calls are admitted again
    clock.advance(Duration::from_secs(45));
    let response = app
        .oneshot(with_method("POST", "/quota/acquire"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reset_endpoint() {
    let app = create_test_app_with(&ManualClock::new(0), 1);

    app.clone()
        .oneshot(with_method("POST", "/quota/acquire"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(with_method("POST", "/quota/reset"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Reset 2 limiters");

    let response = app
        .oneshot(with_method("POST", "/quota/acquire"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = app.oneshot(get("/get/anything")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
