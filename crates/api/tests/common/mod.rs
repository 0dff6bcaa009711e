#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cohort_core::catalog::MemoryProtocolCatalog;
use cohort_core::protocol::{plan, Protocol};
use http_body_util::BodyExt;
use tower::ServiceExt;

use cohort_api::config::ServerConfig;
use cohort_api::router::build_app_router;
use cohort_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        db_max_connections: 1,
        protocol_catalog_path: None,
    }
}

/// The two protocols the join scenarios are written against.
pub fn fixture_catalog() -> MemoryProtocolCatalog {
    MemoryProtocolCatalog::from_protocols([
        Protocol::new(
            "multiple-millionaire-problem",
            vec![
                plan(["a1", "a2", "a3"]),
                plan(["b1", "b2", "b3"]),
                plan(["c1", "c2", "c3"]),
            ],
        ),
        Protocol::new(
            "millionaire-problem",
            vec![plan(["a1", "a2", "a3"]), plan(["b1", "b2", "b3"])],
        ),
    ])
}

/// Build the full application router over in-memory stores.
///
/// Uses the same router builder as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    build_test_app_with(fixture_catalog())
}

pub fn build_test_app_with(catalog: MemoryProtocolCatalog) -> Router {
    build_app_router(AppState::in_memory(catalog, test_config()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
