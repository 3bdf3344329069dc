use std::fmt;

use crate::extract::Paragraph;

/// One fully extracted article, ready to be appended to the corpus.
///
/// Immutable once assembled; the `Display` impl renders the tagged record
/// format downstream corpus tooling consumes, so its exact bytes matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub categories: Vec<String>,
    pub translation_count: usize,
    pub paragraph_count: usize,
    pub word_count: usize,
    pub char_count: usize,
    /// Accepted paragraph texts in page order.
    pub paragraphs: Vec<String>,
}

impl Document {
    /// Assembles a document from the accepted paragraphs of one page.
    /// Aggregates cover the accepted paragraphs only.
    pub fn new<T: ToString>(
        title: T,
        categories: Vec<String>,
        translation_count: usize,
        accepted: &[Paragraph],
    ) -> Self {
        Self {
            title: title.to_string(),
            categories,
            translation_count,
            paragraph_count: accepted.len(),
            word_count: accepted.iter().map(|p| p.word_count).sum(),
            char_count: accepted.iter().map(|p| p.char_count()).sum(),
            paragraphs: accepted.iter().map(|p| p.text.clone()).collect(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // quotes inside a category name would break the attribute quoting
        let categories = self
            .categories
            .iter()
            .map(|c| c.replace('"', ""))
            .collect::<Vec<_>>()
            .join(";");
        writeln!(
            f,
            r#"<doc title="{}" categories="{}" translations="{}" paragraphs="{}" words="{}" chars="{}">"#,
            self.title,
            categories,
            self.translation_count,
            self.paragraph_count,
            self.word_count,
            self.char_count,
        )?;
        for paragraph in &self.paragraphs {
            writeln!(f, "<p>")?;
            writeln!(f, "{}", paragraph)?;
            writeln!(f, "</p>")?;
        }
        writeln!(f, "</doc>")
    }
}
