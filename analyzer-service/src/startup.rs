//! Application startup and lifecycle management.
//!
//! Builds the shared state from configuration, wires the router (JSON API,
//! `/metrics`, static frontend fallback) and runs the HTTP server until a
//! shutdown signal arrives.

use crate::config::{AnalyzerConfig, FrontendConfig};
use crate::handlers::{analyze_file, chat, health_check, metrics};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use service_core::error::AppError;
use service_core::middleware::{
    make_request_span, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "analyzer-service";

/// Shared application state.
///
/// Built once at startup and read-only afterwards. `text_provider` is `None`
/// when no API key was configured.
#[derive(Clone)]
pub struct AppState {
    pub text_provider: Option<Arc<dyn TextProvider>>,
    pub generation: GenerationParams,
}

impl AppState {
    pub fn new(text_provider: Option<Arc<dyn TextProvider>>) -> Self {
        Self {
            text_provider,
            generation: GenerationParams::default(),
        }
    }

    pub fn with_generation_params(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    /// Create the Gemini provider when an API key is present.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AppError> {
        let text_provider: Option<Arc<dyn TextProvider>> = match &config.google.api_key {
            Some(api_key) => {
                let gemini_config = GeminiConfig {
                    api_key: api_key.clone(),
                    model: config.models.text_model.clone(),
                    api_base: config.models.api_base.clone(),
                    timeout: Duration::from_secs(config.models.request_timeout_secs),
                };
                let provider: Arc<dyn TextProvider> = Arc::new(
                    GeminiTextProvider::new(gemini_config)
                        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
                );

                tracing::info!(
                    model = %config.models.text_model,
                    "Initialized Gemini text provider"
                );
                Some(provider)
            }
            None => None,
        };

        Ok(Self::new(text_provider).with_generation_params(GenerationParams {
            temperature: config.models.temperature,
            max_tokens: config.models.max_output_tokens,
        }))
    }

    pub fn api_key_configured(&self) -> bool {
        self.text_provider.is_some()
    }
}

pub fn build_router(state: AppState, frontend: &FrontendConfig) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat", post(chat))
        .route(
            "/api/analyze-file",
            post(analyze_file).layer(DefaultBodyLimit::max(frontend.max_upload_bytes)),
        )
        .route("/metrics", get(metrics))
        .fallback_service(ServeDir::new(&frontend.static_dir))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AnalyzerConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(config, state).await
    }

    /// Build with a pre-made state, e.g. one holding a mock provider.
    pub async fn build_with_state(config: AnalyzerConfig, state: AppState) -> Result<Self, AppError> {
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        log_banner(&config, &state, port);

        let router = build_router(state, &config.frontend);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Bound port (useful when configured with port 0).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

fn log_banner(config: &AnalyzerConfig, state: &AppState, port: u16) {
    tracing::info!(
        service = SERVICE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        host = %config.common.host,
        port,
        model = %config.models.text_model,
        static_dir = %config.frontend.static_dir,
        "AI Business Analyzer API listening"
    );

    if state.api_key_configured() {
        tracing::info!("API key configured");
    } else {
        tracing::warn!(
            "GOOGLE_API_KEY environment variable not set; chat and file analysis are disabled"
        );
    }

    if !Path::new(&config.frontend.static_dir).join("index.html").is_file() {
        tracing::warn!(
            static_dir = %config.frontend.static_dir,
            "index.html not found; the frontend will return 404"
        );
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TEXT_MODEL;
    use service_core::config::Config;

    fn config_with(vars: &[(&str, &str)]) -> AnalyzerConfig {
        AnalyzerConfig::from_lookup(Config::default(), |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn provider_reports_default_model() {
        let state = AppState::from_config(&config_with(&[("GOOGLE_API_KEY", "k")])).unwrap();

        assert!(state.api_key_configured());
        assert_eq!(state.text_provider.unwrap().model(), DEFAULT_TEXT_MODEL);
    }

    #[test]
    fn provider_reports_configured_model() {
        let state = AppState::from_config(&config_with(&[
            ("GOOGLE_API_KEY", "k"),
            ("GENAI_TEXT_MODEL", "gemini-1.5-pro"),
            ("GENAI_TEMPERATURE", "0.2"),
        ]))
        .unwrap();

        assert_eq!(state.text_provider.unwrap().model(), "gemini-1.5-pro");
        assert_eq!(state.generation.temperature, Some(0.2));
    }

    #[test]
    fn no_key_means_no_provider() {
        let state = AppState::from_config(&config_with(&[])).unwrap();
        assert!(!state.api_key_configured());
    }
}
