//! Response builders for the HTTP surface.
//!
//! Every response is a Lambda proxy payload carrying permissive CORS
//! headers so the extension popup can call the function URL directly.

use serde::Serialize;
use serde_json::{Value, json};

use crate::core::models::{ErrorDetail, HealthStatus};

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "GET, POST, OPTIONS",
        "Access-Control-Allow-Headers": "*",
    })
}

/// Returns a JSON response with the given status code.
#[must_use]
pub fn json_response<T: Serialize>(status_code: u16, body: &T) -> Value {
    let body = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    json!({
        "statusCode": status_code,
        "headers": cors_headers(),
        "body": body,
    })
}

/// Returns a 200 OK response for the given body.
#[must_use]
pub fn ok_json<T: Serialize>(body: &T) -> Value {
    json_response(200, body)
}

/// Returns an error response with a `{detail}` body.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(
        status_code,
        &ErrorDetail {
            detail: message.to_string(),
        },
    )
}

/// Returns the health probe response.
#[must_use]
pub fn health() -> Value {
    ok_json(&HealthStatus {
        status: "ok".to_string(),
        message: Some("API is running".to_string()),
    })
}

/// Returns a 204 response for CORS preflight requests.
#[must_use]
pub fn preflight() -> Value {
    json!({
        "statusCode": 204,
        "headers": cors_headers(),
        "body": "",
    })
}
