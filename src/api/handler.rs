//! API Lambda handler - thin router for the two public routes.
//!
//! - `GET /health` answers without touching any provider
//! - `POST /api/v1/summarize` runs the request controller

use super::{helpers, parsing};
use crate::ai::Summarizer;
use crate::core::config::AppConfig;
use crate::core::models::EmailRecord;
use crate::errors::MailcastError;
use crate::pipeline::RequestController;
use crate::speech::MurfClient;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const HEALTH_PATH: &str = "/health";
pub const SUMMARIZE_PATH: &str = "/api/v1/summarize";

/// Long-lived handler state, built once before the runtime starts.
#[derive(Clone)]
pub struct ApiState {
    controller: RequestController,
}

impl ApiState {
    /// # Errors
    ///
    /// Returns `ConfigurationError` when a required provider credential is
    /// missing, so the process fails before accepting any request.
    pub fn from_config(config: &AppConfig) -> Result<Self, MailcastError> {
        let summarizer = Summarizer::from_config(config)?;
        let synthesizer = MurfClient::from_config(config)?;
        Ok(Self::new(RequestController::new(
            Arc::new(summarizer),
            Arc::new(synthesizer),
        )))
    }

    #[must_use]
    pub fn new(controller: RequestController) -> Self {
        Self { controller }
    }
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails at the Lambda level; every problem becomes an HTTP response
/// with a `{detail}` body.
#[tracing::instrument(level = "info", skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler(state: &ApiState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(route(state, &event.payload).await)
}

/// Routes one proxy event to the matching endpoint.
pub async fn route(state: &ApiState, payload: &Value) -> Value {
    let method = parsing::request_method(payload)
        .unwrap_or("GET")
        .to_ascii_uppercase();
    let Some(path) = parsing::request_path(payload) else {
        error!("Request missing path");
        return helpers::err_response(400, "Missing path");
    };
    let path = path.trim_end_matches('/');
    info!(method = %method, raw_path = %path, "Request path");

    if method == "OPTIONS" {
        return helpers::preflight();
    }

    match path {
        HEALTH_PATH => match method.as_str() {
            "GET" | "HEAD" => helpers::health(),
            _ => helpers::err_response(405, "Method Not Allowed"),
        },
        SUMMARIZE_PATH => match method.as_str() {
            "POST" => handle_summarize(state, payload).await,
            _ => helpers::err_response(405, "Method Not Allowed"),
        },
        _ => helpers::err_response(404, "Not Found"),
    }
}

async fn handle_summarize(state: &ApiState, payload: &Value) -> Value {
    let correlation_id = Uuid::new_v4().to_string();

    let body = match parsing::request_body(payload) {
        Ok(Some(body)) => body,
        Ok(None) => {
            error!(%correlation_id, "Request missing body");
            return helpers::err_response(422, "Missing body");
        }
        Err(e) => {
            error!(%correlation_id, "Unreadable body: {}", e);
            return helpers::err_response(e.status_code(), &e.to_string());
        }
    };

    let request = match parsing::parse_summarize_request(&body) {
        Ok(request) => request,
        Err(message) => {
            warn!(%correlation_id, "{}", message);
            return helpers::err_response(422, &message);
        }
    };

    let email = EmailRecord::from(request);
    if let Err(e) = email.validate() {
        warn!(%correlation_id, "Rejected email: {}", e);
        return helpers::err_response(e.status_code(), &e.to_string());
    }

    match state.controller.process(&email).await {
        Ok(result) => {
            info!(%correlation_id, "Summary and audio generated");
            helpers::ok_json(&result)
        }
        Err(e) => {
            error!(%correlation_id, "Error processing request: {}", e);
            let status = e.status_code();
            let detail = if status >= 500 {
                format!("An error occurred while processing the email: {e}")
            } else {
                e.to_string()
            };
            helpers::err_response(status, &detail)
        }
    }
}
