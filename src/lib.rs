pub use api::{Page, PageSource, WikiApi};
pub use crawl::{Config, ConfigBuilder, Counters, Crawler};
pub use document::Document;
pub use error::BaedekerError;
pub use extract::{ContentExtractor, Paragraph};
pub use language::Language;
pub use stopwords::StopWords;
pub use titles::TitleList;

pub mod api;
pub mod cache;
pub mod clean;
pub mod crawl;
pub mod document;
mod error;
pub mod extract;
pub mod language;
pub mod ratelimit;
pub mod runlog;
pub mod stopwords;
pub mod titles;

/// Rexported to implement custom cleaners and page sources.
pub use select;
