//! Popup side of the extension: server client and click controller

pub mod client;
pub mod controller;

pub use client::{ServerClient, SummaryBackend};
pub use controller::{PopupController, PopupView, user_message};
