//! Summarization orchestrator.
//!
//! Validates the email, short-circuits degenerate input, builds the prompt
//! and makes a single provider call. Failures are never retried.

use serde::Serialize;
use tracing::{error, info, warn};

use super::prompt::{self, ContentCheck, ShortEmailPolicy};
use super::provider::{
    GeminiProvider, MAX_OUTPUT_TOKENS, OpenAiProvider, SummaryProvider, TEMPERATURE,
};
use crate::core::config::{AppConfig, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL};
use crate::core::models::{EmailRecord, ProviderChoice};
use crate::errors::MailcastError;

/// Model label reported when the canned short-email path answered.
pub const SHORT_EMAIL_HANDLER: &str = "short_email_handler";

/// Describes the active backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInfo {
    pub provider: ProviderChoice,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

pub struct Summarizer {
    provider: Box<dyn SummaryProvider>,
    short_email_policy: ShortEmailPolicy,
    min_content_chars: usize,
}

impl Summarizer {
    /// Builds the summarizer for the provider selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the selected provider's API key is
    /// missing. No network call is made.
    pub fn from_config(config: &AppConfig) -> Result<Self, MailcastError> {
        let provider: Box<dyn SummaryProvider> = match config.llm_provider {
            ProviderChoice::Gemini => {
                let Some(api_key) = config.gemini_api_key.clone() else {
                    return Err(MailcastError::ConfigurationError(
                        "Gemini API key is required. Set GEMINI_API_KEY in env".to_string(),
                    ));
                };
                let model = config
                    .gemini_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
                Box::new(GeminiProvider::new(&api_key, model)?)
            }
            ProviderChoice::OpenAi => {
                let Some(api_key) = config.openai_api_key.clone() else {
                    return Err(MailcastError::ConfigurationError(
                        "OpenAI API key is required. Set OPENAI_API_KEY environment variable."
                            .to_string(),
                    ));
                };
                let model = config
                    .openai_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
                Box::new(OpenAiProvider::new(&api_key, model)?)
            }
        };

        info!(provider = %provider.provider(), model = %provider.model(), "Summarizer initialized");

        Ok(Self {
            provider,
            short_email_policy: config.short_email_policy,
            min_content_chars: config.min_content_chars,
        })
    }

    /// Wraps an already constructed provider.
    #[must_use]
    pub fn with_provider(
        provider: Box<dyn SummaryProvider>,
        short_email_policy: ShortEmailPolicy,
        min_content_chars: usize,
    ) -> Self {
        Self {
            provider,
            short_email_policy,
            min_content_chars,
        }
    }

    #[must_use]
    pub fn provider_info(&self) -> ProviderInfo {
        ProviderInfo {
            provider: self.provider.provider(),
            model: self.provider.model().to_string(),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Produces a plain-text summary for one email.
    ///
    /// # Errors
    ///
    /// `ValidationError` for unusable input, `ProviderError` when the backend
    /// fails or answers with nothing.
    #[tracing::instrument(level = "info", skip_all, fields(provider = %self.provider.provider()))]
    pub async fn summarize(
        &self,
        subject: &str,
        sender: &str,
        body: &str,
    ) -> Result<String, MailcastError> {
        let email = EmailRecord::new(subject, sender, body);

        match prompt::check_content(&email, self.min_content_chars, self.short_email_policy)? {
            ContentCheck::Ready => {}
            ContentCheck::TooShort { suggestion } => {
                info!(model = SHORT_EMAIL_HANDLER, "Email too short, skipping model call");
                return Ok(suggestion);
            }
        }

        let email = prompt::truncate_long_content(email);
        let messages = prompt::build_messages(&email);

        #[cfg(feature = "debug-logs")]
        info!("Using summary prompt:\n{:?}", messages);

        #[cfg(not(feature = "debug-logs"))]
        info!(body_chars = email.body.chars().count(), "Sending summary prompt");

        let summary = self
            .provider
            .complete(&messages)
            .await
            .map_err(|e| {
                error!("Summarization failed: {}", e);
                classify_provider_error(self.provider.provider(), e)
            })?;

        let summary = summary.trim();
        if summary.is_empty() {
            warn!("Model returned an empty summary");
            return Err(MailcastError::ProviderError(
                "Empty response received from the model".to_string(),
            ));
        }

        Ok(summary.to_string())
    }
}

/// Rewrites well-known provider failures into actionable messages.
///
/// Anything that is not a `ProviderError` (or does not match a known pattern)
/// keeps its original message.
#[must_use]
pub fn classify_provider_error(provider: ProviderChoice, error: MailcastError) -> MailcastError {
    let message = match error {
        MailcastError::ProviderError(message) => message,
        other => return other,
    };
    let lowered = message.to_lowercase();

    let friendly = match provider {
        ProviderChoice::OpenAi => {
            if lowered.contains("rate_limit_exceeded") {
                Some("OpenAI API rate limit exceeded. Please try again later.")
            } else if lowered.contains("invalid_api_key") {
                Some("Invalid OpenAI API key. Please check your credentials.")
            } else if lowered.contains("insufficient_quota") {
                Some("OpenAI API quota exceeded. Please check your billing.")
            } else {
                None
            }
        }
        ProviderChoice::Gemini => {
            if lowered.contains("api_key_invalid") {
                Some("Invalid Gemini API key. Please check your credentials.")
            } else if lowered.contains("quota_exceeded") {
                Some("Gemini API quota exceeded. Please try again later.")
            } else if lowered.contains("rate_limit") {
                Some("Gemini API rate limit exceeded. Please try again later.")
            } else {
                None
            }
        }
    };

    MailcastError::ProviderError(friendly.map_or(message, ToString::to_string))
}
