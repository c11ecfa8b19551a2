use lingo::command_parser::{Command, ParseError, parse_command};
use lingo::core::language::{Language, UnsupportedLanguage};
use lingo::session::RequestKind;

#[test]
fn test_plain_lines_are_submissions() {
    assert_eq!(
        parse_command("Hello world").unwrap(),
        Command::Submit("Hello world".to_string())
    );
    // Untouched, even when blank; the session decides what counts as empty.
    assert_eq!(parse_command("   ").unwrap(), Command::Submit("   ".to_string()));
    assert_eq!(
        parse_command("  keep  spacing ").unwrap(),
        Command::Submit("  keep  spacing ".to_string())
    );
}

#[test]
fn test_summarize_and_alias() {
    assert_eq!(parse_command("/summarize 2").unwrap(), Command::Summarize(2));
    assert_eq!(parse_command("/s 1").unwrap(), Command::Summarize(1));
    assert_eq!(
        parse_command("/summarize").unwrap_err(),
        ParseError::Usage("/summarize <n>")
    );
}

#[test]
fn test_translate_variants() {
    assert_eq!(
        parse_command("/translate 3 es").unwrap(),
        Command::Translate(3, Language::Spanish)
    );
    assert_eq!(
        parse_command("/t 1 FR").unwrap(),
        Command::Translate(1, Language::French)
    );
    assert_eq!(parse_command("/t 4 all").unwrap(), Command::TranslateAll(4));
    assert_eq!(
        parse_command("/translate 1 de").unwrap_err(),
        ParseError::Language(UnsupportedLanguage("de".to_string()))
    );
    assert!(matches!(
        parse_command("/translate 1").unwrap_err(),
        ParseError::Usage(_)
    ));
}

#[test]
fn test_cancel_variants() {
    assert_eq!(
        parse_command("/cancel 2 summarize").unwrap(),
        Command::Cancel(2, RequestKind::Summarize)
    );
    assert_eq!(
        parse_command("/cancel 2 ru").unwrap(),
        Command::Cancel(2, RequestKind::Translate(Language::Russian))
    );
}

#[test]
fn test_invalid_indexes() {
    assert_eq!(
        parse_command("/s 0").unwrap_err(),
        ParseError::InvalidIndex("0".to_string())
    );
    assert_eq!(
        parse_command("/t x es").unwrap_err(),
        ParseError::InvalidIndex("x".to_string())
    );
}

#[test]
fn test_simple_commands() {
    assert_eq!(parse_command("/list").unwrap(), Command::List);
    assert_eq!(parse_command("/help").unwrap(), Command::Help);
    assert_eq!(parse_command("/quit").unwrap(), Command::Quit);
    assert_eq!(parse_command(" /EXIT ").unwrap(), Command::Quit);
}

#[test]
fn test_unknown_command() {
    let err = parse_command("/dance now").unwrap_err();
    assert_eq!(err, ParseError::UnknownCommand("dance".to_string()));
    assert_eq!(err.to_string(), "Unknown command: /dance");
}
