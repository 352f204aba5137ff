//! Speech synthesis

pub mod murf;

use async_trait::async_trait;

use crate::errors::MailcastError;

pub use murf::MurfClient;

/// Turns summary text into a playable audio URL.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// # Errors
    ///
    /// Returns `SynthesisError` when the provider fails or yields no audio.
    async fn synthesize(&self, text: &str) -> Result<String, MailcastError>;
}
