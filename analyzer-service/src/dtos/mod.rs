pub mod analysis;
pub mod chat;
pub mod health;

pub use analysis::AnalysisResponse;
pub use chat::{ChatRequest, ChatResponse, HistoryEntry, Role};
pub use health::HealthResponse;
