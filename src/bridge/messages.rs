use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::core::models::{EmailRecord, HealthStatus};

/// Reply to `checkServerStatus`. Failures are data, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServerStatus {
    Ok { data: HealthStatus },
    Error { message: String },
}

impl ServerStatus {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { data } if data.status == "ok")
    }
}

/// Reply to `getEmailContent`: the record itself or `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmailContent {
    Record(EmailRecord),
    Error { error: String },
}

/// One request kind per action, each with its own typed reply channel.
#[derive(Debug)]
pub enum BridgeRequest {
    CheckServerStatus {
        reply: oneshot::Sender<ServerStatus>,
    },
    GetEmailContent {
        reply: oneshot::Sender<EmailContent>,
    },
    /// Fire-and-forget snapshot for the page watcher.
    PageMutated { html: String },
}

impl BridgeRequest {
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::CheckServerStatus { .. } => "checkServerStatus",
            Self::GetEmailContent { .. } => "getEmailContent",
            Self::PageMutated { .. } => "pageMutated",
        }
    }
}
