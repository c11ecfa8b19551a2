use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The statically configured set of languages a message can be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    English,
    Portuguese,
    Spanish,
    Russian,
    Turkish,
    French,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language code: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Portuguese,
        Language::Spanish,
        Language::Russian,
        Language::Turkish,
        Language::French,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Portuguese => "pt",
            Language::Spanish => "es",
            Language::Russian => "ru",
            Language::Turkish => "tr",
            Language::French => "fr",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Portuguese => "Portuguese",
            Language::Spanish => "Spanish",
            Language::Russian => "Russian",
            Language::Turkish => "Turkish",
            Language::French => "French",
        }
    }

    /// Case-insensitive lookup by short code.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedLanguage`] when the code is not one of the six
    /// configured languages.
    pub fn from_code(code: &str) -> Result<Self, UnsupportedLanguage> {
        let wanted = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnsupportedLanguage(wanted.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}
