#![allow(clippy::missing_errors_doc)]
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

use crate::ai::Summarizer;
use crate::core::models::{EmailRecord, SummaryResult};
use crate::errors::MailcastError;
use crate::speech::SpeechSynthesizer;

/// Summarization step as seen by the controller.
#[async_trait]
pub trait EmailSummarizer: Send + Sync {
    async fn summarize(
        &self,
        subject: &str,
        sender: &str,
        body: &str,
    ) -> Result<String, MailcastError>;
}

#[async_trait]
impl EmailSummarizer for Summarizer {
    async fn summarize(
        &self,
        subject: &str,
        sender: &str,
        body: &str,
    ) -> Result<String, MailcastError> {
        Summarizer::summarize(self, subject, sender, body).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Summarizing,
    Synthesizing,
    Completed,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Summarizing => "summarizing",
            Self::Synthesizing => "synthesizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one request together with every state it passed through.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub result: Result<SummaryResult, MailcastError>,
    pub states: Vec<PipelineState>,
}

struct Run {
    states: Vec<PipelineState>,
}

impl Run {
    fn new() -> Self {
        Self {
            states: vec![PipelineState::Received],
        }
    }

    fn current(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::Received)
    }

    fn advance(&mut self, next: PipelineState) {
        info!(from = %self.current(), to = %next, "Pipeline transition");
        self.states.push(next);
    }

    fn fail(mut self, err: MailcastError) -> PipelineOutcome {
        error!(state = %self.current(), "Pipeline failed: {}", err);
        self.advance(PipelineState::Failed);
        PipelineOutcome {
            result: Err(err),
            states: self.states,
        }
    }

    fn complete(mut self, result: SummaryResult) -> PipelineOutcome {
        self.advance(PipelineState::Completed);
        PipelineOutcome {
            result: Ok(result),
            states: self.states,
        }
    }
}

/// Sequences summarization and speech synthesis for one request.
///
/// All-or-nothing: a summary is never returned without its audio. Nothing
/// is retried or cached between requests.
#[derive(Clone)]
pub struct RequestController {
    summarizer: Arc<dyn EmailSummarizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl RequestController {
    #[must_use]
    pub fn new(
        summarizer: Arc<dyn EmailSummarizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            summarizer,
            synthesizer,
        }
    }

    pub async fn process(&self, email: &EmailRecord) -> Result<SummaryResult, MailcastError> {
        self.run(email).await.result
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn run(&self, email: &EmailRecord) -> PipelineOutcome {
        let mut run = Run::new();

        if let Err(e) = email.validate() {
            return run.fail(e);
        }

        run.advance(PipelineState::Summarizing);
        let summary = match self
            .summarizer
            .summarize(&email.subject, &email.sender, &email.body)
            .await
        {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => {
                return run.fail(MailcastError::ProviderError(
                    "Failed to generate email summary".to_string(),
                ));
            }
            Err(e) => return run.fail(e),
        };

        run.advance(PipelineState::Synthesizing);
        let audio_url = match self.synthesizer.synthesize(&summary).await {
            Ok(url) if !url.trim().is_empty() => url,
            Ok(_) => {
                return run.fail(MailcastError::SynthesisError(
                    "Failed to generate audio file".to_string(),
                ));
            }
            Err(e) => return run.fail(e),
        };

        run.complete(SummaryResult {
            summary,
            audio_url,
        })
    }
}
