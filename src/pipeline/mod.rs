//! Request controller: summarize, then synthesize

pub mod controller;

pub use controller::{EmailSummarizer, PipelineOutcome, PipelineState, RequestController};
