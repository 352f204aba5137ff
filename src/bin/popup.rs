//! Terminal stand-in for the extension popup.
//!
//! Reads a saved webmail page, runs the same health check → extract →
//! summarize flow the popup runs, and prints the summary and audio link.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use mailcast::bridge::{BridgeHandle, PageSource};
use mailcast::core::config::ClientConfig;
use mailcast::core::models::SummaryResult;
use mailcast::errors::MailcastError;
use mailcast::extract::{ContentExtractor, PageWatcher};
use mailcast::popup::{PopupController, PopupView, ServerClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "mailcast-popup", about = "Summarize a saved email page and get an audio link")]
struct Cli {
    /// Saved HTML of the open webmail message
    #[arg(long)]
    page: PathBuf,

    /// Summarization server base URL (defaults to MAILCAST_SERVER_URL)
    #[arg(long)]
    server_url: Option<String>,

    /// Only print the extracted email, do not contact the server
    #[arg(long)]
    extract_only: bool,
}

struct FilePage {
    path: PathBuf,
}

#[async_trait]
impl PageSource for FilePage {
    async fn snapshot(&self) -> Result<String, MailcastError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            MailcastError::BridgeError(format!("Cannot read {}: {e}", self.path.display()))
        })
    }
}

struct TerminalView;

impl PopupView for TerminalView {
    fn show_status(&mut self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("error: {message}");
        } else {
            eprintln!("{message}");
        }
    }

    fn set_trigger_enabled(&mut self, _enabled: bool) {}

    fn show_result(&mut self, result: &SummaryResult) {
        println!("{}", result.summary);
        println!("Audio: {}", result.audio_url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    mailcast::setup_logging();
    let cli = Cli::parse();

    let server_url = cli
        .server_url
        .unwrap_or_else(|| ClientConfig::from_env().server_url);
    let server = Arc::new(ServerClient::new(&server_url)?);

    let bridge = BridgeHandle::spawn(
        Arc::new(FilePage { path: cli.page }),
        server.clone(),
        ContentExtractor::gmail(),
        PageWatcher::for_gmail(),
    );

    if cli.extract_only {
        let content = bridge.get_email_content().await?;
        println!(
            "{}",
            serde_json::to_string_pretty(&content).context("serialize extracted email")?
        );
        return Ok(());
    }

    let controller = PopupController::new(bridge, server);
    let mut view = TerminalView;
    controller
        .on_summarize_click(&mut view)
        .await
        .map_err(anyhow::Error::msg)?;
    Ok(())
}
