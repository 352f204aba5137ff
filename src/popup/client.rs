//! HTTP client the extension uses to reach the summarization server.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::bridge::HealthProbe;
use crate::core::models::{EmailRecord, ErrorDetail, HealthStatus, SummaryResult};
use crate::errors::MailcastError;

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Submits an email for summarization.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn summarize(&self, email: &EmailRecord) -> Result<SummaryResult, MailcastError>;
}

#[derive(Debug, Clone)]
pub struct ServerClient {
    http: Client,
    base_url: Url,
}

impl ServerClient {
    /// # Errors
    ///
    /// Returns `ConfigurationError` when `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, MailcastError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            MailcastError::ConfigurationError(format!("Invalid server URL '{base_url}': {e}"))
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigurationError` when `path` cannot be joined onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, MailcastError> {
        self.base_url
            .join(path)
            .map_err(|e| MailcastError::ConfigurationError(format!("Invalid endpoint '{path}': {e}")))
    }

    async fn error_from(response: Response) -> MailcastError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorDetail>(&text)
            .map(|e| e.detail)
            .unwrap_or_else(|_| format!("Server error (status {status}): {text}"));
        MailcastError::ServerError {
            status: status.as_u16(),
            detail,
        }
    }

    /// The server answered, so an unreadable body is a server error rather
    /// than a transport failure.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, MailcastError> {
        let status = response.status().as_u16();
        response
            .json()
            .await
            .map_err(|e| MailcastError::ServerError {
                status,
                detail: format!("Invalid server response: {e}"),
            })
    }
}

#[async_trait]
impl HealthProbe for ServerClient {
    async fn health(&self) -> Result<HealthStatus, MailcastError> {
        let response = self
            .http
            .get(self.endpoint("/health")?)
            .timeout(HEALTH_PROBE_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode(response).await
    }
}

#[async_trait]
impl SummaryBackend for ServerClient {
    async fn summarize(&self, email: &EmailRecord) -> Result<SummaryResult, MailcastError> {
        info!("Sending email to server for summarization");
        let response = self
            .http
            .post(self.endpoint("/api/v1/summarize")?)
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::error_from(response).await;
            warn!("Server rejected summarize request: {}", err);
            return Err(err);
        }
        Self::decode(response).await
    }
}
