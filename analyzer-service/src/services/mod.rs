pub mod generation;
pub mod metrics;
pub mod prompts;
pub mod providers;

pub use generation::generate_text;
