//! LLM provider clients.
//!
//! Each backend turns the shared chat transcript into its own wire format,
//! makes exactly one request, and hands back the raw completion text.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, MessageRole};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::prompt::message_text;
use crate::core::models::ProviderChoice;
use crate::errors::MailcastError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Output cap shared by every provider.
pub const MAX_OUTPUT_TOKENS: u32 = 500;
/// Low randomness keeps summaries short and repeatable.
pub const TEMPERATURE: f32 = 0.3;
const GEMINI_TOP_P: f32 = 0.8;
const GEMINI_TOP_K: u32 = 40;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// A summarization backend reached over the network.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    fn provider(&self) -> ProviderChoice;

    fn model(&self) -> &str;

    /// Sends the transcript and returns the completion text as produced.
    async fn complete(&self, messages: &[ChatCompletionMessage]) -> Result<String, MailcastError>;
}

fn role_name(role: &MessageRole) -> &'static str {
    match role {
        MessageRole::system => "system",
        MessageRole::assistant => "assistant",
        _ => "user",
    }
}

/// Turns a credential into a sensitive header value.
///
/// # Errors
///
/// Returns `ConfigurationError` when the value cannot be sent as a header,
/// for example a key pasted with a trailing newline.
pub fn credential_header(label: &str, value: &str) -> Result<HeaderValue, MailcastError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| MailcastError::ConfigurationError(format!("Invalid {label}: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

async fn post_json(
    provider: ProviderChoice,
    url: &str,
    headers: HeaderMap,
    body: &Value,
) -> Result<Value, MailcastError> {
    let response = HTTP_CLIENT
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| MailcastError::ProviderError(format!("{provider} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_else(|e| {
            format!("Failed to read error response body (status {status}): {e}")
        });
        return Err(MailcastError::ProviderError(format!(
            "{provider} API error (status {status}): {error_text}"
        )));
    }

    response.json().await.map_err(|e| {
        MailcastError::ProviderError(format!("Failed to parse {provider} response: {e}"))
    })
}

// ============================================================================
// OpenAI
// ============================================================================

pub struct OpenAiProvider {
    authorization: HeaderValue,
    model_name: String,
}

impl OpenAiProvider {
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the key is not a valid header value.
    pub fn new(api_key: &str, model_name: String) -> Result<Self, MailcastError> {
        Ok(Self {
            authorization: credential_header("OpenAI API key", &format!("Bearer {api_key}"))?,
            model_name,
        })
    }

    #[must_use]
    pub fn request_body(&self, messages: &[ChatCompletionMessage]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .filter_map(|m| {
                message_text(m).map(|text| json!({ "role": role_name(&m.role), "content": text }))
            })
            .collect();

        json!({
            "model": self.model_name,
            "messages": messages,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
        })
    }

    /// Pulls the first choice's message content out of a chat completion.
    #[must_use]
    pub fn extract_text(response: &Value) -> Option<String> {
        response
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(ToString::to_string)
    }
}

#[async_trait]
impl SummaryProvider for OpenAiProvider {
    fn provider(&self) -> ProviderChoice {
        ProviderChoice::OpenAi
    }

    fn model(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, messages: &[ChatCompletionMessage]) -> Result<String, MailcastError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = self.request_body(messages);
        info!(model = %self.model_name, "Requesting OpenAI chat completion");

        let response = post_json(self.provider(), OPENAI_CHAT_URL, headers, &body).await?;
        debug!("OpenAI response received");

        Ok(Self::extract_text(&response).unwrap_or_default())
    }
}

// ============================================================================
// Gemini
// ============================================================================

pub struct GeminiProvider {
    api_key: HeaderValue,
    model_name: String,
}

impl GeminiProvider {
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the key is not a valid header value.
    pub fn new(api_key: &str, model_name: String) -> Result<Self, MailcastError> {
        Ok(Self {
            api_key: credential_header("Gemini API key", api_key)?,
            model_name,
        })
    }

    /// System messages become `systemInstruction`; the rest become `contents`.
    #[must_use]
    pub fn request_body(&self, messages: &[ChatCompletionMessage]) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for message in messages {
            let Some(text) = message_text(message) else {
                continue;
            };
            match message.role {
                MessageRole::system => system_parts.push(json!({ "text": text })),
                MessageRole::assistant => {
                    contents.push(json!({ "role": "model", "parts": [{ "text": text }] }));
                }
                _ => contents.push(json!({ "role": "user", "parts": [{ "text": text }] })),
            }
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
                "temperature": TEMPERATURE,
                "topP": GEMINI_TOP_P,
                "topK": GEMINI_TOP_K,
            }
        });
        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }
        body
    }

    /// Joins the text parts of the first candidate.
    #[must_use]
    pub fn extract_text(response: &Value) -> Option<String> {
        let parts = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.as_array())?;

        let collected: Vec<&str> = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        if collected.is_empty() {
            None
        } else {
            Some(collected.join(""))
        }
    }
}

#[async_trait]
impl SummaryProvider for GeminiProvider {
    fn provider(&self) -> ProviderChoice {
        ProviderChoice::Gemini
    }

    fn model(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, messages: &[ChatCompletionMessage]) -> Result<String, MailcastError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", self.api_key.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model_name);
        let body = self.request_body(messages);
        info!(model = %self.model_name, "Requesting Gemini generateContent");

        let response = post_json(self.provider(), &url, headers, &body).await?;
        debug!("Gemini response received");

        Ok(Self::extract_text(&response).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompt::build_messages;
    use crate::core::models::EmailRecord;

    fn messages() -> Vec<ChatCompletionMessage> {
        build_messages(&EmailRecord::new(
            "Weekly Team Update",
            "manager@company.com",
            "Hello team, great progress this week",
        ))
    }

    #[test]
    fn test_openai_request_body_uses_fixed_parameters() {
        let provider = OpenAiProvider::new("k", "gpt-4o".to_string()).unwrap();
        let body = provider.request_body(&messages());

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(
            body["messages"][1]["content"]
                .as_str()
                .unwrap()
                .contains("Subject: Weekly Team Update")
        );
    }

    #[test]
    fn test_gemini_request_body_splits_system_instruction() {
        let provider = GeminiProvider::new("k", "gemini-2.0-flash-001".to_string()).unwrap();
        let body = provider.request_body(&messages());

        assert!(
            body["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("You are a helpful email summarization assistant")
        );
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
        assert_eq!(body["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_openai_extract_text() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "A summary." } }]
        });
        assert_eq!(
            OpenAiProvider::extract_text(&response),
            Some("A summary.".to_string())
        );
        assert_eq!(OpenAiProvider::extract_text(&json!({ "choices": [] })), None);
    }

    #[test]
    fn test_gemini_extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "First. " }, { "text": "Second." }] }
            }]
        });
        assert_eq!(
            GeminiProvider::extract_text(&response),
            Some("First. Second.".to_string())
        );
        assert_eq!(GeminiProvider::extract_text(&json!({})), None);
    }

    #[test]
    fn test_unusable_key_is_rejected_at_construction() {
        let err = OpenAiProvider::new("sk-test\n", "gpt-4o".to_string())
            .err()
            .unwrap();
        assert!(matches!(err, MailcastError::ConfigurationError(_)));
        assert!(err.to_string().contains("Invalid OpenAI API key"));

        let err = GeminiProvider::new("key\r\n", "gemini-2.0-flash-001".to_string())
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid Gemini API key"));
    }
}
