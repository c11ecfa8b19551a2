use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::language::Language;
use crate::session::RequestKind;

/// One line of terminal input, interpreted.
///
/// Message positions are 1-based display indexes, as shown by the views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Summarize(usize),
    Translate(usize, Language),
    TranslateAll(usize),
    Cancel(usize, RequestKind),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid message number: {0}")]
    InvalidIndex(String),

    #[error(transparent)]
    Language(#[from] crate::core::language::UnsupportedLanguage),
}

pub const HELP_TEXT: &str = "\
Type a message and press enter to send it.
  /summarize <n>             summarize message n        (alias /s)
  /translate <n> <code|all>  translate message n        (alias /t)
  /cancel <n> <summarize|code>  cancel a pending request
  /list                      show all messages
  /help                      show this help
  /quit                      leave (alias /exit)";

const SUMMARIZE_USAGE: &str = "/summarize <n>";
const TRANSLATE_USAGE: &str = "/translate <n> <code|all>";
const CANCEL_USAGE: &str = "/cancel <n> <summarize|code>";

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([A-Za-z]+)(?:\s+(.*))?$").unwrap_or_else(|_| {
        // Cannot fail for a literal pattern; keep a never-matching fallback.
        Regex::new(r"$^").expect("fallback regex compiles")
    })
});

/// Parse one line of input. Lines that do not start with `/` are submissions,
/// passed through untouched (emptiness is the session's call).
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown commands, missing arguments, bad
/// message numbers and unsupported language codes.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return Ok(Command::Submit(line.to_string()));
    }

    let Some(caps) = COMMAND_RE.captures(trimmed) else {
        return Err(ParseError::UnknownCommand(
            trimmed.trim_start_matches('/').to_string(),
        ));
    };
    let name = caps[1].to_ascii_lowercase();
    let args: Vec<&str> = caps
        .get(2)
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default();

    match name.as_str() {
        "summarize" | "s" => match args.as_slice() {
            [n] => Ok(Command::Summarize(parse_index(n)?)),
            _ => Err(ParseError::Usage(SUMMARIZE_USAGE)),
        },
        "translate" | "t" => match args.as_slice() {
            [n, code] if code.eq_ignore_ascii_case("all") => {
                Ok(Command::TranslateAll(parse_index(n)?))
            }
            [n, code] => Ok(Command::Translate(
                parse_index(n)?,
                Language::from_code(code)?,
            )),
            _ => Err(ParseError::Usage(TRANSLATE_USAGE)),
        },
        "cancel" => match args.as_slice() {
            [n, what] if what.eq_ignore_ascii_case("summarize") => {
                Ok(Command::Cancel(parse_index(n)?, RequestKind::Summarize))
            }
            [n, code] => Ok(Command::Cancel(
                parse_index(n)?,
                RequestKind::Translate(Language::from_code(code)?),
            )),
            _ => Err(ParseError::Usage(CANCEL_USAGE)),
        },
        "list" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_index(raw: &str) -> Result<usize, ParseError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidIndex(raw.to_string())),
    }
}
