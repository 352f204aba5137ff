use once_cell::sync::Lazy;
use regex::Regex;
use html2text::render::TrivialDecorator;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::selectors::{SelectorSet, compile};
use crate::core::models::{DEFAULT_SENDER, DEFAULT_SUBJECT, EmailRecord};
use crate::errors::MailcastError;

/// Stands in for a message that has a subject but no body text.
pub const EMPTY_BODY_MARKER: &str = "(no message body)";

/// Wide enough that html2text never wraps body lines.
const TEXT_WIDTH: usize = 10_000;

static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").expect("static regex compile"));
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex compile"));

/// Collapses runs of spaces and blank lines and trims every line.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let collapsed = HORIZONTAL_WS.replace_all(raw, " ");
    let lines: Vec<&str> = collapsed.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    EXCESS_NEWLINES
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

/// Reads `{subject, sender, body}` out of a webmail page snapshot.
#[derive(Debug)]
pub struct ContentExtractor {
    subject: Vec<Selector>,
    sender: Vec<Selector>,
    body: Vec<Selector>,
    preview: Vec<Selector>,
}

impl ContentExtractor {
    /// # Errors
    ///
    /// Returns `ExtractionError` if any candidate selector is invalid CSS.
    pub fn new(selectors: &SelectorSet) -> Result<Self, MailcastError> {
        Ok(Self {
            subject: compile(&selectors.subject)?,
            sender: compile(&selectors.sender)?,
            body: compile(&selectors.body)?,
            preview: compile(&selectors.preview)?,
        })
    }

    /// Extractor for the built-in webmail selectors.
    #[must_use]
    pub fn gmail() -> Self {
        Self::new(&SelectorSet::default()).expect("static selectors compile")
    }

    /// Produces an `EmailRecord` from the page, or fails when neither a
    /// subject nor a body can be found after every fallback.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` when both subject and body are empty.
    pub fn extract(&self, html: &str) -> Result<EmailRecord, MailcastError> {
        let document = Html::parse_document(html);

        let mut subject = first_match(&document, &self.subject, plain_text);
        let mut sender = first_match(&document, &self.sender, sender_text);
        let mut body = first_match(&document, &self.body, body_text);

        if body.is_empty()
            && let Some(preview) = first_match_opt(&document, &self.preview, plain_text)
        {
            info!("Message body not found, using list preview");
            body = preview;
            if subject.is_empty() {
                subject = DEFAULT_SUBJECT.to_string();
            }
            if sender.is_empty() {
                sender = DEFAULT_SENDER.to_string();
            }
        }

        if subject.is_empty() && body.is_empty() {
            warn!("No subject or body found on page");
            return Err(MailcastError::ExtractionError(
                "No email content found. Open an email and try again.".to_string(),
            ));
        }

        if subject.is_empty() {
            subject = DEFAULT_SUBJECT.to_string();
        }
        if sender.is_empty() {
            sender = DEFAULT_SENDER.to_string();
        }
        if body.is_empty() {
            body = EMPTY_BODY_MARKER.to_string();
        }

        debug!(
            subject_chars = subject.chars().count(),
            body_chars = body.chars().count(),
            "Extracted email content"
        );

        Ok(EmailRecord::new(subject, sender, body))
    }
}

fn first_match_opt(
    document: &Html,
    candidates: &[Selector],
    read: fn(ElementRef<'_>) -> String,
) -> Option<String> {
    candidates.iter().find_map(|selector| {
        document
            .select(selector)
            .map(read)
            .find(|text| !text.is_empty())
    })
}

fn first_match(document: &Html, candidates: &[Selector], read: fn(ElementRef<'_>) -> String) -> String {
    first_match_opt(document, candidates, read).unwrap_or_default()
}

fn plain_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

fn sender_text(element: ElementRef<'_>) -> String {
    let text = plain_text(element);
    if !text.is_empty() {
        return text;
    }
    element
        .value()
        .attr("email")
        .map(normalize_text)
        .unwrap_or_default()
}

fn body_text(element: ElementRef<'_>) -> String {
    let html = element.inner_html();
    // Links keep their text only; footnote URLs would leak into the prompt.
    let renderer = html2text::config::with_decorator(TrivialDecorator::new());
    match renderer.string_from_read(html.as_bytes(), TEXT_WIDTH) {
        Ok(text) => normalize_text(&text),
        Err(e) => {
            warn!("html2text failed, falling back to raw text: {}", e);
            plain_text(element)
        }
    }
}
