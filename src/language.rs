use std::fmt;
use std::slice::Iter;
use std::str::FromStr;

/// Languages with a stopword vocabulary shipped under `resources/stopwords`.
///
/// The variant selects the vocabulary the content classifier scores
/// paragraphs against. Editions without a shipped vocabulary run in the
/// language agnostic mode instead, see
/// [`ContentExtractor`](crate::extract::ContentExtractor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    English,
    German,
    French,
    Spanish,
    Italian,
    Dutch,
    Polish,
    Portuguese,
    Russian,
    Swedish,
    Other(String),
}

impl Language {
    /// All known languages.
    pub fn known_languages() -> Iter<'static, Language> {
        static LANGUAGES: [Language; 10] = [
            Language::English,
            Language::German,
            Language::French,
            Language::Spanish,
            Language::Italian,
            Language::Dutch,
            Language::Polish,
            Language::Portuguese,
            Language::Russian,
            Language::Swedish,
        ];
        LANGUAGES.iter()
    }

    pub fn identifier(&self) -> &str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Swedish => "sv",
            Language::Other(s) => s.as_str(),
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Language::English => "English",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::Dutch => "Dutch",
            Language::Polish => "Polish",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Swedish => "Swedish",
            Language::Other(s) => s.as_str(),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts either the full name (`English`) or the edition identifier
    /// (`en`), case insensitive. Anything else becomes [`Language::Other`]
    /// and fails later when its vocabulary file turns out to be absent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        for lang in Language::known_languages() {
            if lower == lang.identifier() || lower == lang.full_name().to_lowercase() {
                return Ok(lang.clone());
            }
        }
        Ok(Language::Other(s.to_string()))
    }
}
