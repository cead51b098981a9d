mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_dashboard_shows_current_program() {
    let (app, pool, _backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;

    let response = app.oneshot(get("/", &cookie)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Welcome, Ada"));
    assert!(body.contains("Strength Block"));
    assert!(body.contains("Week 1 of 2, Day 2"));
    assert!(body.contains("href=\"/workouts/2-1\""));
}

#[tokio::test]
async fn test_dashboard_stats_and_history() {
    let (app, pool, _backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;

    let response = app.oneshot(get("/", &cookie)).await.unwrap();

    let body = common::body_string(response).await;
    assert!(body.contains("Programs completed: <strong>1</strong>"));
    // One finished day in each program
    assert!(body.contains("Workouts completed: <strong>2</strong>"));
    assert!(body.contains("Intro Program"));
    assert!(body.contains("January 5, 2024"));
}

#[tokio::test]
async fn test_dashboard_backend_failure_shows_message() {
    let (app, pool, backend) = common::setup().await;
    let cookie = common::create_session_cookie(&pool).await;
    backend.fail_reads();

    let response = app.oneshot(get("/", &cookie)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("Failed to load user data. Please try again."));
    assert!(body.contains("No Program Available"));
}
