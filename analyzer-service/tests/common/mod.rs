//! Shared helpers for the router-level integration tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the model
//! is replaced by `MockTextProvider` so no network is involved.

#![allow(dead_code)]

use analyzer_service::config::FrontendConfig;
use analyzer_service::services::providers::mock::MockTextProvider;
use analyzer_service::services::providers::TextProvider;
use analyzer_service::startup::{build_router, AppState};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const BOUNDARY: &str = "analyzer-test-boundary";

pub fn frontend(static_dir: &str) -> FrontendConfig {
    FrontendConfig {
        static_dir: static_dir.to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Router backed by `provider`; the provider handle is returned so tests can
/// inspect the prompts it saw.
pub fn app_with(provider: MockTextProvider) -> (Router, Arc<MockTextProvider>) {
    let provider = Arc::new(provider);
    let shared: Arc<dyn TextProvider> = provider.clone();
    let router = build_router(AppState::new(Some(shared)), &frontend("does-not-exist"));
    (router, provider)
}

/// Router with no model configured.
pub fn app_without_provider() -> Router {
    build_router(AppState::new(None), &frontend("does-not-exist"))
}

pub async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body_bytes(response).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// One form part. `filename` of `None` omits the parameter entirely.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, filename
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/analyze-file")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
