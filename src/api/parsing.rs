use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value;

use crate::core::models::EmailRecord;
use crate::errors::MailcastError;

/// Body of `POST /api/v1/summarize`.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub subject: String,
    pub sender: String,
    pub body: String,
}

impl From<SummarizeRequest> for EmailRecord {
    fn from(req: SummarizeRequest) -> Self {
        EmailRecord::new(req.subject, req.sender, req.body)
    }
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method of a function-URL (v2) or REST (v1) proxy event.
pub fn request_method(payload: &Value) -> Option<&str> {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
}

pub fn request_path(payload: &Value) -> Option<&str> {
    v_str(payload, &["rawPath"]).or_else(|| v_str(payload, &["path"]))
}

/// Returns the request body as text, decoding base64 when flagged.
pub fn request_body(payload: &Value) -> Result<Option<String>, MailcastError> {
    let Some(body) = payload.get("body").and_then(|b| b.as_str()) else {
        return Ok(None);
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if !is_base64 {
        return Ok(Some(body.to_string()));
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| MailcastError::ValidationError(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| MailcastError::ValidationError(format!("Body is not valid UTF-8: {e}")))
}

pub fn parse_summarize_request(body: &str) -> Result<SummarizeRequest, String> {
    serde_json::from_str(body).map_err(|e| format!("Invalid request body: {e}"))
}
