//! Content extraction from webmail page snapshots

pub mod extractor;
pub mod selectors;
pub mod watcher;

pub use extractor::{ContentExtractor, EMPTY_BODY_MARKER, normalize_text};
pub use selectors::SelectorSet;
pub use watcher::PageWatcher;
