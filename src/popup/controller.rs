use std::sync::Arc;
use tracing::{error, info};

use super::client::SummaryBackend;
use crate::bridge::{BridgeHandle, EmailContent};
use crate::core::models::SummaryResult;
use crate::errors::MailcastError;

pub const SERVER_UNREACHABLE_MESSAGE: &str =
    "Server not reachable. Make sure the summarization server is running and try again.";
pub const REFRESH_PAGE_MESSAGE: &str =
    "Could not read the email page. Please refresh the page and retry.";

/// Surface the popup renders into.
pub trait PopupView {
    fn show_status(&mut self, message: &str, is_error: bool);
    fn set_trigger_enabled(&mut self, enabled: bool);
    fn show_result(&mut self, result: &SummaryResult);
}

/// Translates a raw failure message into user guidance.
///
/// Only message text is inspected: page-channel failures ask for a refresh,
/// transport failures say the server is unreachable, everything else passes
/// through unchanged.
#[must_use]
pub fn user_message(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    if lowered.contains("failed to reach the page")
        || lowered.contains("receiving end does not exist")
    {
        REFRESH_PAGE_MESSAGE.to_string()
    } else if lowered.contains("failed to send http request")
        || lowered.contains("failed to fetch")
    {
        SERVER_UNREACHABLE_MESSAGE.to_string()
    } else {
        raw.to_string()
    }
}

/// Drives one click of the summarize button.
pub struct PopupController {
    bridge: BridgeHandle,
    backend: Arc<dyn SummaryBackend>,
}

impl PopupController {
    #[must_use]
    pub fn new(bridge: BridgeHandle, backend: Arc<dyn SummaryBackend>) -> Self {
        Self { bridge, backend }
    }

    /// Pre-flight check; any failure counts as unreachable.
    pub async fn is_server_reachable(&self) -> bool {
        match self.bridge.check_server_status().await {
            Ok(status) => status.is_ok(),
            Err(e) => {
                error!("Health check could not run: {}", e);
                false
            }
        }
    }

    /// Health check, then extraction, then the server call. The trigger is
    /// disabled for the duration and always re-enabled afterwards.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message already shown in the view.
    pub async fn on_summarize_click(
        &self,
        view: &mut dyn PopupView,
    ) -> Result<SummaryResult, String> {
        view.set_trigger_enabled(false);
        let outcome = self.run(view).await;
        match &outcome {
            Ok(result) => {
                view.show_result(result);
                view.show_status("Summary ready.", false);
            }
            Err(message) => {
                error!("Summarize click failed: {}", message);
                view.show_status(message, true);
            }
        }
        view.set_trigger_enabled(true);
        outcome
    }

    async fn run(&self, view: &mut dyn PopupView) -> Result<SummaryResult, String> {
        view.show_status("Checking server...", false);
        if !self.is_server_reachable().await {
            return Err(SERVER_UNREACHABLE_MESSAGE.to_string());
        }

        view.show_status("Reading email...", false);
        let email = match self.bridge.get_email_content().await {
            Ok(EmailContent::Record(email)) => email,
            Ok(EmailContent::Error { error }) => return Err(user_message(&error)),
            Err(e) => return Err(user_message(&e.to_string())),
        };

        view.show_status("Summarizing...", false);
        info!("Requesting summary from server");
        self.backend
            .summarize(&email)
            .await
            .map_err(|e: MailcastError| user_message(&e.to_string()))
    }
}
