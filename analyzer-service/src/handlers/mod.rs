//! HTTP handlers for the analyzer API.
//!
//! Every JSON handler answers with the `{success, ...}` envelope; failures go
//! through `AppError` so status codes and logging stay uniform.

pub mod analyze;
pub mod chat;
pub mod health;
pub mod metrics;

pub use analyze::analyze_file;
pub use chat::chat;
pub use health::health_check;
pub use self::metrics::metrics;
