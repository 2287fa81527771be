use analyzer_service::config::AnalyzerConfig;
use analyzer_service::startup::{Application, SERVICE_NAME};
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AnalyzerConfig::load()?;

    init_tracing(
        SERVICE_NAME,
        "info",
        config.observability.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Server shut down");
    Ok(())
}
