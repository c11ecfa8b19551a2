use lingo::core::language::{Language, UnsupportedLanguage};
use lingo::core::models::{Message, MessageId, SUMMARY_MIN_CHARS};

#[test]
fn test_six_languages_with_fixed_codes() {
    let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
    assert_eq!(codes, vec!["en", "pt", "es", "ru", "tr", "fr"]);
}

#[test]
fn test_from_code_round_trips_and_ignores_case() {
    for lang in Language::ALL {
        assert_eq!(Language::from_code(lang.code()), Ok(lang));
        assert_eq!(lang.code().to_uppercase().parse::<Language>(), Ok(lang));
    }
    assert_eq!(
        Language::from_code("de"),
        Err(UnsupportedLanguage("de".to_string()))
    );
    assert_eq!(Language::Turkish.to_string(), "tr");
    assert_eq!(Language::Portuguese.name(), "Portuguese");
}

#[test]
fn test_can_summarize_needs_long_text_without_summary() {
    let long = "x".repeat(SUMMARY_MIN_CHARS + 1);
    let exact = "x".repeat(SUMMARY_MIN_CHARS);

    let mut msg = Message::new(MessageId(1), long);
    assert!(msg.can_summarize());

    msg.summary = Some("done".to_string());
    assert!(!msg.can_summarize());

    assert!(!Message::new(MessageId(2), exact).can_summarize());
}

#[test]
fn test_can_summarize_counts_characters_not_bytes() {
    // 100 two-byte characters: 200 bytes but only 100 characters.
    let msg = Message::new(MessageId(1), "ü".repeat(100));
    assert!(!msg.can_summarize());
}

#[test]
fn test_detected_language_gates_summary_and_sets_source() {
    let mut msg = Message::new(MessageId(1), "y".repeat(SUMMARY_MIN_CHARS + 10));
    assert_eq!(msg.source_language(), Language::English);

    msg.language = Some(Language::English);
    assert!(msg.can_summarize());

    msg.language = Some(Language::Spanish);
    assert!(!msg.can_summarize());
    assert_eq!(msg.source_language(), Language::Spanish);
}
