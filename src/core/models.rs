use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::MailcastError;

/// Placeholder used when the page shows a list preview but no subject.
pub const DEFAULT_SUBJECT: &str = "No subject";

/// Placeholder used when the page shows a list preview but no sender.
pub const DEFAULT_SENDER: &str = "Unknown sender";

/// The normalized `{subject, sender, body}` triple extracted from a message.
///
/// Built fresh for every user action and dropped once the request finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub subject: String,
    pub sender: String,
    pub body: String,
}

impl EmailRecord {
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            sender: sender.into(),
            body: body.into(),
        }
    }

    /// Structural check applied before a record enters the pipeline:
    /// every field must be present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first blank field.
    pub fn validate(&self) -> Result<(), MailcastError> {
        for (name, value) in [
            ("subject", &self.subject),
            ("sender", &self.sender),
            ("body", &self.body),
        ] {
            if value.trim().is_empty() {
                return Err(MailcastError::ValidationError(format!(
                    "Field '{name}' must be a non-empty string"
                )));
            }
        }
        Ok(())
    }
}

/// Combined result handed back to the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(rename = "summary_audio_link")]
    pub audio_url: String,
}

/// Which external LLM backend handles summarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderChoice {
    #[default]
    Gemini,
    OpenAi,
}

impl ProviderChoice {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderChoice {
    type Err = MailcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            _ => Err(MailcastError::ConfigurationError(format!(
                "Invalid model provider: {s}. Use 'gemini' or 'openai'"
            ))),
        }
    }
}

/// Error body returned by the API for every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
