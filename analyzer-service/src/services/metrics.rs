//! Model-call metrics.
//!
//! Recorded through the `metrics` facade; the Prometheus recorder installed
//! by `service_core::observability::init_metrics` renders them on `/metrics`.

use std::time::Duration;

/// Which endpoint triggered the model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Chat,
    AnalyzeFile,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Chat => "chat",
            Operation::AnalyzeFile => "analyze_file",
        }
    }
}

/// How a model call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Empty,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Empty => "empty",
            Outcome::Error => "error",
        }
    }
}

pub fn record_generation(operation: Operation, outcome: Outcome, latency: Duration) {
    let labels = [
        ("operation", operation.as_str()),
        ("outcome", outcome.as_str()),
    ];

    metrics::counter!("genai_requests_total", &labels).increment(1);
    metrics::histogram!("genai_provider_latency_seconds", &labels).record(latency.as_secs_f64());
}

pub fn record_tokens(operation: Operation, input_tokens: i32, output_tokens: i32) {
    let op = operation.as_str();

    metrics::counter!("genai_tokens_total", "operation" => op, "direction" => "input")
        .increment(input_tokens.max(0) as u64);
    metrics::counter!("genai_tokens_total", "operation" => op, "direction" => "output")
        .increment(output_tokens.max(0) as u64);
}
