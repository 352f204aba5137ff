//! Ordered CSS selector candidates for the webmail page.
//!
//! Order matters: for each field the first selector yielding non-empty text
//! wins, and later candidates are only consulted when earlier ones miss.

use scraper::Selector;

use crate::errors::MailcastError;

pub const SUBJECT_SELECTORS: &[&str] = &[
    "h2.hP",
    "h2[data-thread-perm-id]",
    "[data-legacy-thread-id] h2",
    "div.ha h2",
];

pub const SENDER_SELECTORS: &[&str] = &[
    "span.gD",
    "span.go[email]",
    "[data-hovercard-id][email]",
    "span[email]",
];

pub const BODY_SELECTORS: &[&str] = &[
    "div.a3s.aiL",
    "div.a3s",
    "div.ii.gt",
    "[role='listitem'] [dir='ltr']",
];

/// Snippet shown in the message list when no message is open.
pub const PREVIEW_SELECTORS: &[&str] = &["span.y2", "div.xT span.y2", "[role='row'] .y2"];

/// Region fingerprinted by the page watcher.
pub const WATCH_REGION_SELECTORS: &[&str] = &["div[role='main']", "body"];

/// Candidate selectors for every extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    pub subject: Vec<String>,
    pub sender: Vec<String>,
    pub body: Vec<String>,
    pub preview: Vec<String>,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            subject: owned(SUBJECT_SELECTORS),
            sender: owned(SENDER_SELECTORS),
            body: owned(BODY_SELECTORS),
            preview: owned(PREVIEW_SELECTORS),
        }
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Parses an ordered candidate list, keeping its order.
///
/// # Errors
///
/// Returns `ExtractionError` naming the first selector that fails to parse.
pub fn compile(list: &[String]) -> Result<Vec<Selector>, MailcastError> {
    list.iter()
        .map(|css| {
            Selector::parse(css).map_err(|e| {
                MailcastError::ExtractionError(format!("Invalid selector '{css}': {e}"))
            })
        })
        .collect()
}
