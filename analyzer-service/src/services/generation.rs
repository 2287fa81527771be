use crate::services::metrics::{record_generation, record_tokens, Operation, Outcome};
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use std::time::Instant;

/// Run one model call, recording latency, token usage and outcome.
///
/// Returns `Ok(None)` when the model answered without any text.
pub async fn generate_text(
    provider: &dyn TextProvider,
    operation: Operation,
    prompt: &str,
    params: &GenerationParams,
) -> Result<Option<String>, ProviderError> {
    let started = Instant::now();
    let result = provider.generate(prompt, params).await;
    let latency = started.elapsed();

    match result {
        Ok(response) => {
            record_tokens(operation, response.input_tokens, response.output_tokens);

            let text = response.into_text();
            let outcome = if text.is_some() {
                Outcome::Success
            } else {
                Outcome::Empty
            };
            record_generation(operation, outcome, latency);

            tracing::info!(
                operation = operation.as_str(),
                model = %provider.model(),
                outcome = outcome.as_str(),
                latency_ms = latency.as_millis() as u64,
                "Model call completed"
            );

            Ok(text)
        }
        Err(e) => {
            record_generation(operation, Outcome::Error, latency);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn returns_text_and_forwards_prompt() {
        let provider = MockTextProvider::replying("insight");

        let text = generate_text(&provider, Operation::Chat, "prompt", &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(text.as_deref(), Some("insight"));
        assert_eq!(provider.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn empty_reply_becomes_none() {
        let provider = MockTextProvider::empty();

        let text = generate_text(
            &provider,
            Operation::AnalyzeFile,
            "prompt",
            &GenerationParams::default(),
        )
        .await
        .unwrap();

        assert!(text.is_none());
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let provider = MockTextProvider::failing("quota exceeded");

        let err = generate_text(&provider, Operation::Chat, "prompt", &GenerationParams::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API error: quota exceeded");
    }

    /// Value of the series `name` whose labels include every pair in `labels`.
    fn series_value(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        rendered
            .lines()
            .filter(|line| line.starts_with(&format!("{}{{", name)))
            .find(|line| {
                labels
                    .iter()
                    .all(|(k, v)| line.contains(&format!("{}=\"{}\"", k, v)))
            })
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }

    #[tokio::test]
    async fn records_outcomes_and_token_usage() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let replying = MockTextProvider::replying("insight");
        let empty = MockTextProvider::empty();
        let failing = MockTextProvider::failing("down");
        let params = GenerationParams::default();

        generate_text(&replying, Operation::Chat, "a prompt of sixteen", &params)
            .await
            .unwrap();
        generate_text(&empty, Operation::AnalyzeFile, "prompt", &params)
            .await
            .unwrap();
        generate_text(&failing, Operation::Chat, "prompt", &params)
            .await
            .unwrap_err();

        let rendered = handle.render();

        for (operation, outcome) in [("chat", "success"), ("analyze_file", "empty"), ("chat", "error")] {
            assert_eq!(
                series_value(
                    &rendered,
                    "genai_requests_total",
                    &[("operation", operation), ("outcome", outcome)]
                ),
                Some(1.0),
                "missing {}/{} in:\n{}",
                operation,
                outcome,
                rendered
            );
        }
        assert!(rendered.contains("genai_provider_latency_seconds_count{"));
        // The mock reports a quarter of the prompt length as input tokens.
        assert_eq!(
            series_value(
                &rendered,
                "genai_tokens_total",
                &[("operation", "chat"), ("direction", "input")]
            ),
            Some(4.0)
        );
    }
}
