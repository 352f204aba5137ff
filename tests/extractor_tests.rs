use mailcast::core::models::{DEFAULT_SENDER, DEFAULT_SUBJECT};
use mailcast::errors::MailcastError;
use mailcast::extract::{ContentExtractor, EMPTY_BODY_MARKER, SelectorSet, normalize_text};

fn page(inner: &str) -> String {
    format!("<html><body><div role=\"main\">{inner}</div></body></html>")
}

#[test]
fn test_extracts_open_message() {
    let html = page(
        r#"<h2 class="hP">Weekly Team Update</h2>
           <span class="gD" email="manager@company.com">Manager</span>
           <div class="a3s aiL"><p>Hello team,</p><p>great progress this week.</p></div>"#,
    );
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.subject, "Weekly Team Update");
    assert_eq!(record.sender, "Manager");
    assert!(record.body.contains("Hello team,"));
    assert!(record.body.contains("great progress this week."));
}

#[test]
fn test_sender_falls_back_to_email_attribute() {
    let html = page(
        r#"<h2 class="hP">Subject</h2>
           <span class="gD" email="someone@example.com"></span>
           <div class="a3s">Body text here</div>"#,
    );
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.sender, "someone@example.com");
}

#[test]
fn test_first_listed_selector_wins() {
    // Both candidates match; document order puts the second selector's
    // element first, but selector order decides.
    let html = page(
        r#"<h2 data-thread-perm-id="1">Second selector subject</h2>
           <h2 class="hP">First selector subject</h2>
           <div class="a3s">Body</div>"#,
    );
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.subject, "First selector subject");
}

#[test]
fn test_empty_match_falls_through_to_next_candidate() {
    let html = page(
        r#"<h2 class="hP">   </h2>
           <div class="ha"><h2>Fallback subject</h2></div>
           <div class="a3s">Body</div>"#,
    );
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.subject, "Fallback subject");
}

#[test]
fn test_preview_substitutes_missing_body() {
    let html = page(r#"<span class="y2"> - Lunch on Thursday? Let me know.</span>"#);
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.body, "- Lunch on Thursday? Let me know.");
    assert_eq!(record.subject, DEFAULT_SUBJECT);
    assert_eq!(record.sender, DEFAULT_SENDER);
}

#[test]
fn test_preview_keeps_found_subject() {
    let html = page(
        r#"<h2 class="hP">Lunch</h2><span class="y2">Thursday at noon?</span>"#,
    );
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.subject, "Lunch");
    assert_eq!(record.body, "Thursday at noon?");
}

#[test]
fn test_missing_sender_is_not_an_error() {
    let html = page(r#"<h2 class="hP">Subject</h2><div class="a3s">Body text</div>"#);
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.sender, DEFAULT_SENDER);
}

#[test]
fn test_fails_without_subject_and_body() {
    let html = page(r#"<span class="gD">Someone</span><div class="nav">Inbox</div>"#);
    let err = ContentExtractor::gmail().extract(&html).unwrap_err();
    assert!(matches!(err, MailcastError::ExtractionError(_)));
}

#[test]
fn test_subject_alone_is_enough() {
    let html = page(r#"<h2 class="hP">Only a subject</h2>"#);
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.subject, "Only a subject");
    assert_eq!(record.body, EMPTY_BODY_MARKER);
}

#[test]
fn test_body_links_keep_text_without_footnotes() {
    let html = page(
        r#"<h2 class="hP">Invoice</h2>
           <div class="a3s aiL"><p>Please pay <a href="https://pay.example.com/inv/123">here</a> by <b>Friday</b>.</p></div>"#,
    );
    let record = ContentExtractor::gmail().extract(&html).unwrap();
    assert_eq!(record.body, "Please pay here by Friday.");
}

#[test]
fn test_custom_selectors() {
    let selectors = SelectorSet {
        subject: vec!["#subj".to_string()],
        sender: vec!["#from".to_string()],
        body: vec!["#body".to_string()],
        preview: vec![],
    };
    let extractor = ContentExtractor::new(&selectors).unwrap();
    let record = extractor
        .extract(r#"<p id="subj">S</p><p id="from">F</p><div id="body">B</div>"#)
        .unwrap();
    assert_eq!((record.subject.as_str(), record.sender.as_str(), record.body.as_str()), ("S", "F", "B"));
}

#[test]
fn test_invalid_selector_is_rejected() {
    let selectors = SelectorSet {
        subject: vec!["h2[".to_string()],
        ..SelectorSet::default()
    };
    let err = ContentExtractor::new(&selectors).unwrap_err();
    assert!(err.to_string().contains("Invalid selector"));
}

#[test]
fn test_normalize_text() {
    assert_eq!(normalize_text("  a \t b \n\n\n\n c  "), "a b\n\nc");
}
