#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use gyemini_api::{AppStateInner, router};
use gyemini_db::Database;
use gyemini_market::{MarketClient, MarketConfig};

pub const SECRET: &str = "router-test-secret-0123456789";

pub fn app() -> Router {
    app_with_market(MarketConfig {
        // Nothing listens here; proxy routes are exercised with httpmock instead
        exchange_primary_url: "http://127.0.0.1:9/primary".into(),
        exchange_fallback_url: "http://127.0.0.1:9/fallback".into(),
        alpha_vantage_url: "http://127.0.0.1:9/query".into(),
        gold_url: "http://127.0.0.1:9/gold".into(),
        quote_delay: Duration::ZERO,
        ..MarketConfig::default()
    })
}

pub fn app_with_market(market: MarketConfig) -> Router {
    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        token_secret: SECRET.to_string(),
        market: MarketClient::new(market).unwrap(),
    });
    router(state)
}

pub struct Response {
    pub status: StatusCode,
    pub cache_control: Option<String>,
    pub body: Value,
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let cache_control = resp
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Response { status, cache_control, body }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Mint an identity through the API and return `(user_id, token)`.
pub async fn identity(app: &Router) -> (String, String) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/identity")
        .body(Body::empty())
        .unwrap();
    let resp = send(app, req).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    (
        resp.body["user_id"].as_str().unwrap().to_string(),
        resp.body["token"].as_str().unwrap().to_string(),
    )
}
