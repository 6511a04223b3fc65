//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

/// A single-connection in-memory database with the schema applied.
///
/// The connection is never recycled, otherwise the in-memory database would
/// vanish between requests.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    movie_api::db::ensure_schema(&pool)
        .await
        .expect("schema");

    pool
}

pub async fn test_app() -> Router {
    movie_api::app(test_pool().await)
}

/// Send a request and return the status with the body parsed as JSON
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Create a movie through the API and return its id.
pub async fn create_movie(app: &Router, title: &str) -> i64 {
    let (status, json) = post_json(
        app,
        "/movies",
        serde_json::json!({
            "title": title,
            "language": "en",
            "status": "released",
            "rating": 7.0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {json}");
    json["id"].as_i64().expect("created movie has an id")
}
