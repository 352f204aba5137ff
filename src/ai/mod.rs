//! All AI/LLM functionality

pub mod prompt;
pub mod provider;
pub mod summarizer;

// Re-export main types for convenience
pub use provider::{GeminiProvider, OpenAiProvider, SummaryProvider};
pub use summarizer::{ProviderInfo, Summarizer};
