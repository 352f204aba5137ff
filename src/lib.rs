/// Mailcast - reads an open webmail message, summarizes it with an LLM and
/// turns the summary into speech.
///
/// The crate holds both halves of the integration:
/// 1. The extension side: a page extractor, a messaging bridge and the popup
///    controller that drives one click end to end
/// 2. The server side: a Lambda HTTP handler that runs the summarize →
///    synthesize pipeline against the configured providers
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda (function URL) for the HTTP surface
/// - Gemini or `OpenAI` for summarization, picked once at startup
/// - Murf for text-to-speech
/// - scraper + html2text for reading page snapshots
/// - Tokio for async runtime and the bridge channels
///
/// # Example
///
/// ```no_run
/// use mailcast::ai::Summarizer;
/// use mailcast::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     mailcast::setup_logging();
///
///     let config = AppConfig {
///         gemini_api_key: Some("dummy_gemini_key".to_string()),
///         ..AppConfig::default()
///     };
///
///     let summarizer = Summarizer::from_config(&config)?;
///     let summary = summarizer
///         .summarize(
///             "Weekly Team Update",
///             "manager@company.com",
///             "Hello team, great progress this week...",
///         )
///         .await?;
///     println!("Summary: {}", summary);
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod bridge;
pub mod core;
pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod popup;
pub mod speech;

pub use errors::MailcastError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Honors `RUST_LOG` when set; otherwise logs at `debug` when
/// `APP_ENV=debug` and at `info` everywhere else. Calling it more than once
/// is harmless.
///
/// # Example
///
/// ```
/// mailcast::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = match std::env::var("APP_ENV") {
        Ok(env) if env.eq_ignore_ascii_case("debug") => "debug",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
