use std::env;

use crate::ai::prompt::{DEFAULT_MIN_CONTENT_CHARS, ShortEmailPolicy};
use crate::core::models::ProviderChoice;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-001";
pub const DEFAULT_VOICE_ID: &str = "en-US-natalie";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Server-side settings read from the process environment.
///
/// Credentials are optional here; the component that needs one refuses to
/// construct without it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm_provider: ProviderChoice,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub murf_api_key: Option<String>,
    pub murf_voice_id: Option<String>,
    pub short_email_policy: ShortEmailPolicy,
    pub min_content_chars: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let llm_provider = match non_empty_var("LLM_PROVIDER") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("LLM_PROVIDER: {}", e))?,
            None => ProviderChoice::default(),
        };
        let short_email_policy = match non_empty_var("SHORT_EMAIL_POLICY") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("SHORT_EMAIL_POLICY: {}", e))?,
            None => ShortEmailPolicy::default(),
        };
        let min_content_chars = match non_empty_var("MIN_CONTENT_CHARS") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("MIN_CONTENT_CHARS: {}", e))?,
            None => DEFAULT_MIN_CONTENT_CHARS,
        };

        Ok(Self {
            llm_provider,
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_model: non_empty_var("OPENAI_MODEL"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY")
                .or_else(|| non_empty_var("GOOGLE_AI_API_KEY")),
            gemini_model: non_empty_var("GEMINI_MODEL"),
            murf_api_key: non_empty_var("MURF_API_KEY"),
            murf_voice_id: non_empty_var("MURF_VOICE_ID"),
            short_email_policy,
            min_content_chars,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_provider: ProviderChoice::default(),
            openai_api_key: None,
            openai_model: None,
            gemini_api_key: None,
            gemini_model: None,
            murf_api_key: None,
            murf_voice_id: None,
            short_email_policy: ShortEmailPolicy::default(),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
        }
    }
}

/// Settings for the extension side (bridge and popup).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server_url: non_empty_var("MAILCAST_SERVER_URL")
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
