//! Page mutation watcher.
//!
//! Observation only: a changed fingerprint is logged, never re-extracted.

use scraper::{Html, Selector};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::extractor::normalize_text;
use super::selectors::{WATCH_REGION_SELECTORS, compile};
use crate::errors::MailcastError;

#[derive(Debug)]
pub struct PageWatcher {
    region: Vec<Selector>,
    last_fingerprint: Option<String>,
    changes: u64,
}

impl PageWatcher {
    /// # Errors
    ///
    /// Returns `ExtractionError` if a region selector is invalid CSS.
    pub fn new(region_selectors: &[String]) -> Result<Self, MailcastError> {
        Ok(Self {
            region: compile(region_selectors)?,
            last_fingerprint: None,
            changes: 0,
        })
    }

    #[must_use]
    pub fn for_gmail() -> Self {
        let region: Vec<String> = WATCH_REGION_SELECTORS
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        Self::new(&region).expect("static selectors compile")
    }

    /// SHA-256 over the normalized text of the first matching region.
    #[must_use]
    pub fn fingerprint(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let text = self
            .region
            .iter()
            .find_map(|selector| document.select(selector).next())
            .map(|region| normalize_text(&region.text().collect::<String>()))
            .unwrap_or_default();
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    /// Records a snapshot; returns `true` when content differs from the last one.
    pub fn observe(&mut self, html: &str) -> bool {
        let fingerprint = self.fingerprint(html);
        let changed = self
            .last_fingerprint
            .as_ref()
            .is_some_and(|last| *last != fingerprint);

        if changed {
            self.changes += 1;
            info!(changes = self.changes, "Email content changed");
        } else {
            debug!("Page observed, content unchanged");
        }
        self.last_fingerprint = Some(fingerprint);
        changed
    }

    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.changes
    }
}
