use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mailcast::api::{ApiState, route};
use mailcast::errors::MailcastError;
use mailcast::pipeline::{EmailSummarizer, RequestController};
use mailcast::speech::SpeechSynthesizer;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct StubSummarizer {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl EmailSummarizer for StubSummarizer {
    async fn summarize(
        &self,
        subject: &str,
        _sender: &str,
        _body: &str,
    ) -> Result<String, MailcastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailcastError::ProviderError(
                "OpenAI API rate limit exceeded. Please try again later.".to_string(),
            ));
        }
        Ok(format!("Summary of {subject}"))
    }
}

struct StubSynthesizer;

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<String, MailcastError> {
        Ok("https://murf.ai/audio/summary.mp3".to_string())
    }
}

fn state(fail: bool) -> (ApiState, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let controller = RequestController::new(
        Arc::new(StubSummarizer {
            calls: Arc::clone(&calls),
            fail,
        }),
        Arc::new(StubSynthesizer),
    );
    (ApiState::new(controller), calls)
}

fn event(method: &str, path: &str, body: Option<&str>) -> Value {
    let mut payload = json!({
        "rawPath": path,
        "requestContext": { "http": { "method": method } },
    });
    if let Some(body) = body {
        payload["body"] = Value::String(body.to_string());
    }
    payload
}

fn body_of(response: &Value) -> Value {
    serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
}

const WEEKLY_UPDATE: &str = r#"{"subject":"Weekly Team Update","sender":"manager@company.com","body":"Hello team, great progress this week..."}"#;

#[tokio::test]
async fn test_health_returns_ok() {
    let (state, calls) = state(false);
    let response = route(&state, &event("GET", "/health", None)).await;
    assert_eq!(response["statusCode"], 200);
    assert_eq!(body_of(&response)["status"], "ok");
    assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_health_accepts_rest_api_event_shape() {
    let (state, _) = state(false);
    let payload = json!({ "path": "/health/", "httpMethod": "GET" });
    let response = route(&state, &payload).await;
    assert_eq!(response["statusCode"], 200);
}

#[tokio::test]
async fn test_preflight_returns_204() {
    let (state, _) = state(false);
    let response = route(&state, &event("OPTIONS", "/api/v1/summarize", None)).await;
    assert_eq!(response["statusCode"], 204);
    assert_eq!(
        response["headers"]["Access-Control-Allow-Methods"],
        "GET, POST, OPTIONS"
    );
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let (state, _) = state(false);
    let response = route(&state, &event("GET", "/nope", None)).await;
    assert_eq!(response["statusCode"], 404);

    let response = route(&state, &event("GET", "/api/v1/summarize", None)).await;
    assert_eq!(response["statusCode"], 405);

    let response = route(&state, &event("POST", "/health", None)).await;
    assert_eq!(response["statusCode"], 405);
}

#[tokio::test]
async fn test_missing_path_is_bad_request() {
    let (state, _) = state(false);
    let response = route(&state, &json!({ "httpMethod": "GET" })).await;
    assert_eq!(response["statusCode"], 400);
}

#[tokio::test]
async fn test_summarize_success() {
    let (state, calls) = state(false);
    let response = route(&state, &event("POST", "/api/v1/summarize", Some(WEEKLY_UPDATE))).await;
    assert_eq!(response["statusCode"], 200);

    let body = body_of(&response);
    assert_eq!(body["summary"], "Summary of Weekly Team Update");
    assert_eq!(body["summary_audio_link"], "https://murf.ai/audio/summary.mp3");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_summarize_base64_body() {
    let (state, _) = state(false);
    let mut payload = event(
        "POST",
        "/api/v1/summarize",
        Some(&STANDARD.encode(WEEKLY_UPDATE)),
    );
    payload["isBase64Encoded"] = Value::Bool(true);
    let response = route(&state, &payload).await;
    assert_eq!(response["statusCode"], 200);
}

#[tokio::test]
async fn test_missing_field_is_unprocessable() {
    let (state, calls) = state(false);
    let response = route(
        &state,
        &event(
            "POST",
            "/api/v1/summarize",
            Some(r#"{"subject":"Hi","body":"No sender here"}"#),
        ),
    )
    .await;
    assert_eq!(response["statusCode"], 422);
    assert!(
        body_of(&response)["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_body_is_unprocessable() {
    let (state, _) = state(false);
    let response = route(&state, &event("POST", "/api/v1/summarize", None)).await;
    assert_eq!(response["statusCode"], 422);
}

#[tokio::test]
async fn test_empty_field_is_bad_request() {
    let (state, calls) = state(false);
    let response = route(
        &state,
        &event(
            "POST",
            "/api/v1/summarize",
            Some(r#"{"subject":"Hi","sender":"  ","body":"Some body"}"#),
        ),
    )
    .await;
    assert_eq!(response["statusCode"], 400);
    assert!(
        body_of(&response)["detail"]
            .as_str()
            .unwrap()
            .contains("sender")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_failure_is_server_error() {
    let (state, _) = state(true);
    let response = route(&state, &event("POST", "/api/v1/summarize", Some(WEEKLY_UPDATE))).await;
    assert_eq!(response["statusCode"], 500);

    let detail = body_of(&response)["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("An error occurred while processing the email: "));
    assert!(detail.contains("rate limit"));
}
