mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _pool, _backend) = common::setup().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&common::body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["git_version"].is_string());
}

#[tokio::test]
async fn test_settings_requires_auth() {
    let (app, _pool, _backend) = common::setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/auth/login");
}

#[tokio::test]
async fn test_settings_page_links_support() {
    let (app, pool, _backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;

    let response = app.oneshot(get("/settings", &cookie)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("mailto:help@example.com?subject=Workout%20Tracker%20Support"));
    assert!(body.contains("href=\"/settings/progress\""));
    assert!(body.contains("href=\"/settings/history\""));
}

#[tokio::test]
async fn test_profile_page() {
    let (app, pool, _backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;

    let response = app
        .oneshot(get("/settings/profile", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Lovelace"));
    assert!(body.contains("ada@example.com"));
    assert!(body.contains("Client"));
}

#[tokio::test]
async fn test_progress_page_stats() {
    let (app, pool, _backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;

    let response = app
        .oneshot(get("/settings/progress", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Programs completed: <strong>1</strong>"));
    assert!(body.contains("Total exercises: <strong>6</strong>"));
    // 200, 100, 250 and 30 lbs; unset weights are left out
    assert!(body.contains("145.00 lbs"));
    // One bar per week across both programs
    assert_eq!(body.matches("class=\"bar\"").count(), 3);
}

#[tokio::test]
async fn test_progress_page_backend_failure() {
    let (app, pool, backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;
    backend.fail_reads();

    let response = app
        .oneshot(get("/settings/progress", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Failed to load data. Please try again."));
}

#[tokio::test]
async fn test_history_page() {
    let (app, pool, _backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;

    let response = app
        .oneshot(get("/settings/history", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Duration: 2 weeks"));
    assert!(body.contains("Duration: 1 weeks"));
    assert!(body.contains("Actual Reps: 5, 5, 5"));
    assert!(body.contains("250 lbs, 3 sets x 5 reps"));
    assert!(body.contains("RPE: 8"));
    assert!(body.contains("Not recorded"));

    // Week 1 days render in day order even though day 2 is sent first
    let day_one = body.find("Squat").unwrap();
    let day_two = body.find("Deadlift").unwrap();
    assert!(day_one < day_two);
}
