//! Murf text-to-speech client.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::fmt;
use tracing::{error, info};

use super::SpeechSynthesizer;
use crate::ai::provider::credential_header;
use crate::core::config::{AppConfig, DEFAULT_VOICE_ID};
use crate::errors::MailcastError;

const MURF_GENERATE_URL: &str = "https://api.murf.ai/v1/speech/generate";

/// Fixed audio profile; the pipeline exposes no per-request override.
pub const AUDIO_FORMAT: &str = "MP3";
pub const CHANNEL_TYPE: &str = "MONO";
pub const SAMPLE_RATE: u32 = 44_100;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

pub struct MurfClient {
    api_key: HeaderValue,
    voice_id: String,
}

impl MurfClient {
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the key is not a valid header value.
    pub fn new(api_key: &str, voice_id: String) -> Result<Self, MailcastError> {
        Ok(Self {
            api_key: credential_header("Murf API key", api_key)?,
            voice_id,
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigurationError` when `MURF_API_KEY` is not set.
    pub fn from_config(config: &AppConfig) -> Result<Self, MailcastError> {
        let Some(api_key) = config.murf_api_key.clone() else {
            return Err(MailcastError::ConfigurationError(
                "Murf API key is required. Set MURF_API_KEY in env".to_string(),
            ));
        };
        let voice_id = config
            .murf_voice_id
            .clone()
            .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());
        Self::new(&api_key, voice_id)
    }

    #[must_use]
    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    /// Anything printable is accepted and sent as its string form.
    #[must_use]
    pub fn request_body(&self, text: impl fmt::Display) -> Value {
        json!({
            "text": text.to_string(),
            "voiceId": self.voice_id,
            "format": AUDIO_FORMAT,
            "channelType": CHANNEL_TYPE,
            "sampleRate": SAMPLE_RATE,
        })
    }

    /// Reads the playable URL, treating a blank value as missing.
    #[must_use]
    pub fn extract_audio_url(response: &Value) -> Option<String> {
        response
            .get("audioFile")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string)
    }
}

#[async_trait]
impl SpeechSynthesizer for MurfClient {
    async fn synthesize(&self, text: &str) -> Result<String, MailcastError> {
        let mut headers = HeaderMap::new();
        headers.insert("api-key", self.api_key.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        info!(voice = %self.voice_id, chars = text.chars().count(), "Requesting speech synthesis");

        let response = HTTP_CLIENT
            .post(MURF_GENERATE_URL)
            .headers(headers)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| MailcastError::SynthesisError(format!("Murf request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            error!("Murf API error (status {}): {}", status, error_text);
            return Err(MailcastError::SynthesisError(format!(
                "Murf API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            MailcastError::SynthesisError(format!("Failed to parse Murf response: {e}"))
        })?;

        Self::extract_audio_url(&response_json).ok_or_else(|| {
            MailcastError::SynthesisError("No audio file in Murf response".to_string())
        })
    }
}
