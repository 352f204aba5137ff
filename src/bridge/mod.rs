//! Extension messaging bridge.
//!
//! A single task owns the page extractor and watcher for the lifetime of
//! the extension. Callers talk to it through [`BridgeHandle`], which sends a
//! request with a typed `oneshot` reply channel and awaits exactly one answer.

pub mod messages;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::core::models::HealthStatus;
use crate::errors::MailcastError;
use crate::extract::{ContentExtractor, PageWatcher};

pub use messages::{BridgeRequest, EmailContent, ServerStatus};

const CHANNEL_CAPACITY: usize = 16;

/// Supplies the current page HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn snapshot(&self) -> Result<String, MailcastError>;
}

/// Probes the server's health endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, MailcastError>;
}

struct BridgeTask {
    page: Arc<dyn PageSource>,
    probe: Arc<dyn HealthProbe>,
    extractor: ContentExtractor,
    watcher: PageWatcher,
}

impl BridgeTask {
    async fn run(mut self, mut rx: mpsc::Receiver<BridgeRequest>) {
        info!("Bridge started");
        while let Some(request) = rx.recv().await {
            debug!(action = request.action(), "Bridge request");
            match request {
                BridgeRequest::CheckServerStatus { reply } => {
                    // Probes run detached so a slow server never blocks extraction.
                    let probe = Arc::clone(&self.probe);
                    tokio::spawn(async move {
                        let status = check_server_status(probe.as_ref()).await;
                        if reply.send(status).is_err() {
                            warn!("checkServerStatus caller went away");
                        }
                    });
                }
                BridgeRequest::GetEmailContent { reply } => {
                    let content = self.get_email_content().await;
                    if reply.send(content).is_err() {
                        warn!("getEmailContent caller went away");
                    }
                }
                BridgeRequest::PageMutated { html } => {
                    self.watcher.observe(&html);
                }
            }
        }
        info!("Bridge stopped");
    }

    async fn get_email_content(&mut self) -> EmailContent {
        let html = match self.page.snapshot().await {
            Ok(html) => html,
            Err(e) => {
                error!("Page snapshot failed: {}", e);
                return EmailContent::Error {
                    error: e.to_string(),
                };
            }
        };
        self.watcher.observe(&html);

        match self.extractor.extract(&html) {
            Ok(record) => EmailContent::Record(record),
            Err(e) => {
                warn!("Extraction failed: {}", e);
                EmailContent::Error {
                    error: e.to_string(),
                }
            }
        }
    }
}

async fn check_server_status(probe: &dyn HealthProbe) -> ServerStatus {
    match probe.health().await {
        Ok(data) => ServerStatus::Ok { data },
        Err(e) => {
            warn!("Server health check failed: {}", e);
            ServerStatus::Error {
                message: e.to_string(),
            }
        }
    }
}

/// Cloneable sender side of the bridge.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<BridgeRequest>,
}

impl BridgeHandle {
    /// Starts the bridge task. The watcher is created here, once.
    #[must_use]
    pub fn spawn(
        page: Arc<dyn PageSource>,
        probe: Arc<dyn HealthProbe>,
        extractor: ContentExtractor,
        watcher: PageWatcher,
    ) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = BridgeTask {
            page,
            probe,
            extractor,
            watcher,
        };
        tokio::spawn(task.run(rx));
        Self { tx }
    }

    async fn send(&self, request: BridgeRequest) -> Result<(), MailcastError> {
        let action = request.action();
        self.tx.send(request).await.map_err(|_| {
            MailcastError::BridgeError(format!("Could not deliver '{action}', bridge not running"))
        })
    }

    /// # Errors
    ///
    /// Returns `BridgeError` only when the bridge task is gone; server
    /// failures come back as [`ServerStatus::Error`].
    pub async fn check_server_status(&self) -> Result<ServerStatus, MailcastError> {
        let (reply, rx) = oneshot::channel();
        self.send(BridgeRequest::CheckServerStatus { reply }).await?;
        Ok(rx.await?)
    }

    /// # Errors
    ///
    /// Returns `BridgeError` only when the bridge task is gone; extraction
    /// failures come back as [`EmailContent::Error`].
    pub async fn get_email_content(&self) -> Result<EmailContent, MailcastError> {
        let (reply, rx) = oneshot::channel();
        self.send(BridgeRequest::GetEmailContent { reply }).await?;
        Ok(rx.await?)
    }

    /// Hands a fresh page snapshot to the watcher. Nothing is re-extracted.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError` when the bridge task is gone.
    pub async fn notify_page_mutation(&self, html: String) -> Result<(), MailcastError> {
        self.send(BridgeRequest::PageMutated { html }).await
    }
}
