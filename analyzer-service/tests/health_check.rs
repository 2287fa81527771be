mod common;

use analyzer_service::services::providers::mock::MockTextProvider;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{app_with, app_without_provider, body_json, send};
use serde_json::json;

#[tokio::test]
async fn health_reports_configured_key() {
    let (app, _) = app_with(MockTextProvider::replying("unused"));

    let response = send(
        app,
        Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "api_key_configured": true,
            "message": "API is running"
        })
    );
}

#[tokio::test]
async fn health_is_ok_without_key() {
    let response = send(
        app_without_provider(),
        Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_key_configured"], false);
    assert_eq!(body["message"], "API key not configured");
}

#[tokio::test]
async fn health_ignores_request_body() {
    let response = send(
        app_without_provider(),
        Request::builder()
            .uri("/api/health")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_responses_carry_request_id_and_security_headers() {
    let response = send(
        app_without_provider(),
        Request::builder()
            .uri("/api/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "req-123");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn metrics_endpoint_answers_text() {
    let response = send(
        app_without_provider(),
        Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Spawn the application on a random port and return the port number.
async fn spawn_app() -> u16 {
    use analyzer_service::config::AnalyzerConfig;
    use analyzer_service::startup::Application;
    use service_core::config::Config;

    let common = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let config = AnalyzerConfig::from_lookup(common, |_| None).unwrap();
    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

#[tokio::test]
async fn server_starts_without_api_key() {
    let port = spawn_app().await;

    let response = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}/api/health", port))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["api_key_configured"], false);
}
