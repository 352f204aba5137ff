//! Prompt construction and pre-flight checks for email summaries.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use std::str::FromStr;

use crate::core::models::EmailRecord;
use crate::errors::MailcastError;

/// Minimum length of `subject + " " + body` worth sending to a model.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 10;

/// Input budget in characters (roughly 4 characters per token).
pub const MAX_INPUT_CHARS: usize = 12_000;

/// Room reserved for the template around the body when truncating.
const TEMPLATE_OVERHEAD_CHARS: usize = 200;

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful email summarization assistant. \
Provide clear, concise summaries that capture the essential information and any required actions.";

/// What to do with an email too short to summarize meaningfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortEmailPolicy {
    /// Answer with a canned one-liner without calling the model.
    #[default]
    Suggest,
    /// Refuse the email with a `ValidationError`.
    Reject,
}

impl FromStr for ShortEmailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suggest" => Ok(Self::Suggest),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown short email policy '{other}', expected 'suggest' or 'reject'"
            )),
        }
    }
}

/// Outcome of checking an email before any provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCheck {
    /// Enough content to send to the model.
    Ready,
    /// Too short for a model; carries the canned summary to return instead.
    TooShort { suggestion: String },
}

/// Validates the email and decides whether it is worth a model call.
///
/// # Errors
///
/// Returns `ValidationError` when both subject and body are empty, or when
/// the content is too short and `policy` is [`ShortEmailPolicy::Reject`].
pub fn check_content(
    email: &EmailRecord,
    min_chars: usize,
    policy: ShortEmailPolicy,
) -> Result<ContentCheck, MailcastError> {
    if email.subject.trim().is_empty() && email.body.trim().is_empty() {
        return Err(MailcastError::ValidationError(
            "Email has no subject or body content".to_string(),
        ));
    }

    let total_content = format!("{} {}", email.subject, email.body);
    let total_content = total_content.trim();
    if total_content.chars().count() >= min_chars {
        return Ok(ContentCheck::Ready);
    }

    match policy {
        ShortEmailPolicy::Suggest => Ok(ContentCheck::TooShort {
            suggestion: format!("Brief email from {}: {}", email.sender, total_content),
        }),
        ShortEmailPolicy::Reject => Err(MailcastError::ValidationError(
            "Email content too short for meaningful summary".to_string(),
        )),
    }
}

/// Cuts an oversized body so the whole prompt stays inside [`MAX_INPUT_CHARS`].
#[must_use]
pub fn truncate_long_content(mut email: EmailRecord) -> EmailRecord {
    let subject_len = email.subject.chars().count();
    let sender_len = email.sender.chars().count();
    let body_len = email.body.chars().count();

    // subject + " " + sender + " " + body
    if subject_len + sender_len + body_len + 2 <= MAX_INPUT_CHARS {
        return email;
    }

    let overhead = subject_len + sender_len + TEMPLATE_OVERHEAD_CHARS;
    let Some(max_body_chars) = MAX_INPUT_CHARS.checked_sub(overhead).filter(|n| *n > 0) else {
        return email;
    };

    let truncated: String = email.body.chars().take(max_body_chars).collect();
    email.body = format!("{truncated}\n\n[Content truncated - original: {body_len} chars]");
    email
}

/// Renders the fixed summarization template for one email.
#[must_use]
pub fn summary_prompt(email: &EmailRecord) -> String {
    format!(
        "Please provide a concise summary of this email. Focus on the main purpose, key information, and any required actions.

Subject: {subject}
Sender: {sender}
Email Body: {body}

Please summarize this email in 2-3 clear sentences that capture:
1. The main purpose or reason for the email
2. Key information or important details
3. Any actions required or deadlines mentioned

Summary:",
        subject = email.subject,
        sender = email.sender,
        body = email.body,
    )
}

/// Builds the chat transcript sent to whichever provider is configured.
#[must_use]
pub fn build_messages(email: &EmailRecord) -> Vec<ChatCompletionMessage> {
    vec![
        ChatCompletionMessage {
            role: MessageRole::system,
            content: Content::Text(SYSTEM_INSTRUCTION.to_string()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
        ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(summary_prompt(email)),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
    ]
}

/// Returns the text of a message, ignoring non-text content.
#[must_use]
pub fn message_text(message: &ChatCompletionMessage) -> Option<&str> {
    match &message.content {
        Content::Text(text) => Some(text.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(subject: &str, sender: &str, body: &str) -> EmailRecord {
        EmailRecord::new(subject, sender, body)
    }

    #[test]
    fn test_check_content_rejects_empty_subject_and_body() {
        let err = check_content(&email("", "a@b.c", "  "), 10, ShortEmailPolicy::Suggest)
            .unwrap_err();
        assert!(matches!(err, MailcastError::ValidationError(_)));
        assert!(err.to_string().contains("no subject or body"));
    }

    #[test]
    fn test_check_content_suggests_for_short_email() {
        let check = check_content(&email("Hi", "bob@x.io", "ok"), 10, ShortEmailPolicy::Suggest)
            .unwrap();
        assert_eq!(
            check,
            ContentCheck::TooShort {
                suggestion: "Brief email from bob@x.io: Hi ok".to_string()
            }
        );
    }

    #[test]
    fn test_check_content_rejects_short_email_under_reject_policy() {
        let err = check_content(&email("Hi", "bob@x.io", "ok"), 10, ShortEmailPolicy::Reject)
            .unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_check_content_ready_at_threshold() {
        // "Hello" + " " + "team" is exactly 10 characters
        let check = check_content(&email("Hello", "x", "team"), 10, ShortEmailPolicy::Reject)
            .unwrap();
        assert_eq!(check, ContentCheck::Ready);
    }

    #[test]
    fn test_truncate_leaves_normal_email_untouched() {
        let original = email("Subject", "sender@x.io", "A normal body.");
        assert_eq!(truncate_long_content(original.clone()), original);
    }

    #[test]
    fn test_truncate_cuts_long_body() {
        let body = "b".repeat(20_000);
        let result = truncate_long_content(email("Subject", "sender", &body));
        let expected_keep = MAX_INPUT_CHARS - "Subject".len() - "sender".len() - 200;
        assert!(result.body.starts_with(&"b".repeat(expected_keep)));
        assert!(
            result
                .body
                .ends_with("\n\n[Content truncated - original: 20000 chars]")
        );
        assert!(!result.body.starts_with(&"b".repeat(expected_keep + 1)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let body = "é".repeat(13_000);
        let result = truncate_long_content(email("S", "x", &body));
        assert!(result.body.contains("original: 13000 chars"));
    }

    #[test]
    fn test_summary_prompt_interpolates_fields_verbatim() {
        let prompt = summary_prompt(&email("Weekly Team Update", "manager@company.com", "Body {x}"));
        assert!(prompt.contains("Subject: Weekly Team Update\n"));
        assert!(prompt.contains("Sender: manager@company.com\n"));
        assert!(prompt.contains("Email Body: Body {x}\n"));
        assert!(prompt.contains("2-3 clear sentences"));
        assert!(prompt.ends_with("Summary:"));
    }

    #[test]
    fn test_build_messages_has_system_then_user() {
        let messages = build_messages(&email("S", "x", "body text"));
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0].role, MessageRole::system));
        assert!(matches!(messages[1].role, MessageRole::user));
        assert_eq!(message_text(&messages[0]), Some(SYSTEM_INSTRUCTION));
    }

    #[test]
    fn test_short_email_policy_parses() {
        assert_eq!("Reject".parse::<ShortEmailPolicy>(), Ok(ShortEmailPolicy::Reject));
        assert_eq!(" suggest ".parse::<ShortEmailPolicy>(), Ok(ShortEmailPolicy::Suggest));
        assert!("maybe".parse::<ShortEmailPolicy>().is_err());
    }
}
