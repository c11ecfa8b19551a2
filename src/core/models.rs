use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use super::language::Language;

/// Messages longer than this (in characters) may be offered for summarization.
pub const SUMMARY_MIN_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A submitted message plus whatever enrichment results have arrived for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub created_at: DateTime<Utc>,
    pub text: String,
    // Nothing detects languages yet, so this stays `None` for every message.
    pub language: Option<Language>,
    pub summary: Option<String>,
    pub translations: BTreeMap<Language, String>,
}

impl Message {
    #[must_use]
    pub fn new(id: MessageId, text: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            text,
            language: None,
            summary: None,
            translations: BTreeMap::new(),
        }
    }

    /// Whether the front end should offer a summarize action for this message.
    ///
    /// Requires text longer than [`SUMMARY_MIN_CHARS`] with no summary yet, in
    /// English or in an undetected language. The session does not enforce
    /// this; it is advisory for callers.
    #[must_use]
    pub fn can_summarize(&self) -> bool {
        matches!(self.language, None | Some(Language::English))
            && self.text.chars().count() > SUMMARY_MIN_CHARS
            && self.summary.is_none()
    }

    /// Language assumed for the original text when requesting a translation.
    #[must_use]
    pub fn source_language(&self) -> Language {
        self.language.unwrap_or(Language::English)
    }

    #[must_use]
    pub fn translation(&self, lang: Language) -> Option<&str> {
        self.translations.get(&lang).map(String::as_str)
    }
}
