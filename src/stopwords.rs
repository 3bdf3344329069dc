use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::ops::Deref;
use std::path::Path;

use anyhow::{Context, Result};

use crate::language::Language;

/// Stopword vocabulary for one language, one word per line in the
/// corresponding `resources/stopwords/stopwords-{id}.txt` file.
#[derive(Debug, Clone)]
pub struct StopWords {
    pub language: Language,
    words: HashSet<String>,
}

impl Deref for StopWords {
    type Target = HashSet<String>;

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}

impl StopWords {
    /// Read the `Stopwords` for the `language` from the corresponding file.
    pub fn read_language_stopwords(language: Language) -> Result<Self> {
        let file_name = format!("stopwords-{}.txt", language.identifier());

        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("resources/stopwords")
            .join(file_name);

        let f = fs::File::open(&path)
            .with_context(|| format!("no stopword vocabulary for {} at {:?}", language, path))?;
        let file = BufReader::new(&f);
        let words: Result<Vec<String>, _> = file.lines().collect();
        let words = words?
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Ok(Self { language, words })
    }

    /// Membership check, case insensitive.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}
