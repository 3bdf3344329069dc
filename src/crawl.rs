use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use reqwest::Client;

use crate::api::PageSource;
use crate::cache::CrawlCache;
use crate::document::Document;
use crate::error::BaedekerError;
use crate::extract::{ContentExtractor, Paragraph};
use crate::runlog::RunLog;
use crate::stopwords::StopWords;
use crate::titles::TitleList;

/// Run-scoped outcome tally. `processed + empty + skipped` always equals
/// the number of titles the loop has finished with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Titles that produced a corpus document.
    pub processed: usize,
    /// Titles with nothing to keep: missing pages, empty parses, empty
    /// extractions and tolerated per-title failures.
    pub empty: usize,
    /// Titles skipped because the cache already held them.
    pub skipped: usize,
}

impl Counters {
    pub fn total(&self) -> usize {
        self.processed + self.empty + self.skipped
    }
}

/// Configuration for one crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    edition: String,
    interval: Duration,
    request_timeout: Duration,
    browser_user_agent: String,
    dir: PathBuf,
}

impl Config {
    /// Default pause between successive API requests.
    pub const DEFAULT_INTERVAL_MS: u64 = 200;

    /// Default timeout for requests.
    pub const DEFAULT_REQ_TIMEOUT_SEC: u64 = 30;

    #[inline]
    pub(crate) fn user_agent() -> String {
        format!("baedeker/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Convenience method to create a [`ConfigBuilder`].
    #[inline]
    pub fn builder<T: ToString>(edition: T) -> ConfigBuilder {
        ConfigBuilder::new(edition)
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn browser_user_agent(&self) -> &str {
        &self.browser_user_agent
    }

    /// The http client all network requests of a run go through.
    pub fn client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.browser_user_agent.as_str())
            .build()
    }

    /// All output paths derive from the edition code, one corpus, one cache
    /// and any number of run logs per edition.
    pub fn corpus_path(&self) -> PathBuf {
        self.dir.join(format!("wikivoyage_{}.prevert", self.edition))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.dir.join(format!("wikivoyage_{}.cache", self.edition))
    }

    pub fn log_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        self.dir
            .join(format!("wikivoyage_{}_{}.log", self.edition, stamp))
    }
}

#[derive(Debug)]
pub struct ConfigBuilder {
    edition: String,
    interval: Option<Duration>,
    request_timeout: Option<Duration>,
    browser_user_agent: Option<String>,
    dir: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new<T: ToString>(edition: T) -> Self {
        Self {
            edition: edition.to_string(),
            interval: None,
            request_timeout: None,
            browser_user_agent: None,
            dir: None,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn browser_user_agent<T: ToString>(mut self, browser_user_agent: T) -> Self {
        self.browser_user_agent = Some(browser_user_agent.to_string());
        self
    }

    pub fn dir<T: Into<PathBuf>>(mut self, dir: T) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Config {
        Config {
            edition: self.edition,
            interval: self
                .interval
                .unwrap_or_else(|| Duration::from_millis(Config::DEFAULT_INTERVAL_MS)),
            request_timeout: self
                .request_timeout
                .unwrap_or_else(|| Duration::from_secs(Config::DEFAULT_REQ_TIMEOUT_SEC)),
            browser_user_agent: self
                .browser_user_agent
                .unwrap_or_else(Config::user_agent),
            dir: self.dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Sequential, resumable crawl loop over a title enumeration.
///
/// Owns the crawl cache, the run log and the counters for the lifetime of
/// the run; everything else is a stateless pipeline per title. Titles are
/// processed strictly in enumeration order. For every title exactly one of
/// four things happens:
///
/// - it is already cached and gets skipped without a network call,
/// - it yields a document, recorded in the cache *before* the corpus
///   append so an interruption between the two cannot duplicate it,
/// - it resolves to a definitive empty outcome, recorded in the cache,
/// - it fails transiently and is left out of the cache for a later run.
///
/// Anything else aborts the run after flushing the state of all titles
/// already finalized.
#[derive(Debug)]
pub struct Crawler<S: PageSource> {
    source: S,
    extractor: ContentExtractor,
    cache: CrawlCache,
    corpus: File,
    runlog: RunLog,
    counters: Counters,
    config: Config,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(config: Config, source: S, stopwords: Option<StopWords>) -> io::Result<Self> {
        let mut runlog = RunLog::create(config.log_path())?;

        let cache_path = config.cache_path();
        if cache_path.exists() {
            runlog.note(format_args!("Cache: {}", cache_path.display()))?;
        }
        let cache = CrawlCache::open(&cache_path)?;

        let corpus = OpenOptions::new()
            .append(true)
            .create(true)
            .open(config.corpus_path())?;

        Ok(Self {
            source,
            extractor: ContentExtractor::new(stopwords),
            cache,
            corpus,
            runlog,
            counters: Counters::default(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Crawl every title of the enumeration once. Returns the final tally;
    /// any error returned here has already aborted the run.
    pub async fn run(&mut self, titles: &TitleList) -> Result<Counters, BaedekerError> {
        let total = titles.len();
        info!(
            "crawling {} titles for edition {}, {} already cached",
            total,
            self.config.edition(),
            self.cache.len()
        );

        for (index, title) in titles.iter().enumerate() {
            self.runlog.title(title)?;
            display_processed(index + 1, total);

            if self.cache.contains(title) {
                self.runlog.detail("skip already downloaded")?;
                self.counters.skipped += 1;
                self.runlog.flush()?;
                continue;
            }

            match self.process(title).await {
                Ok(doc) => {
                    // durable cache entry first: a crash between the two
                    // writes must not duplicate the document on resume
                    self.cache.insert(title)?;
                    write!(self.corpus, "{}", doc)?;
                    self.corpus.flush()?;
                    self.counters.processed += 1;
                }
                Err(err) if err.is_empty_page() => {
                    self.runlog.detail(&err)?;
                    self.cache.insert(title)?;
                    self.counters.empty += 1;
                }
                Err(err) if err.is_transient() => {
                    warn!("leaving {:?} for a later run: {}", title, err);
                    self.runlog.detail(&err)?;
                    self.counters.empty += 1;
                }
                Err(err) => {
                    error!("aborting run on {:?}: {}", title, err);
                    self.runlog.flush()?;
                    return Err(err);
                }
            }
            self.runlog.flush()?;
        }
        println!("Finished");

        let counters = self.counters;
        self.runlog
            .summary(counters.processed, counters.empty, counters.skipped)?;
        self.runlog.flush()?;
        info!(
            "run complete: {} processed, {} empty, {} skipped",
            counters.processed, counters.empty, counters.skipped
        );
        Ok(counters)
    }

    /// Fetch, strip, classify and assemble one title.
    async fn process(&mut self, title: &str) -> Result<Document, BaedekerError> {
        let page = self.source.page(title).await?;
        let accepted: Vec<Paragraph> = self
            .extractor
            .paragraphs(&page.html)
            .into_iter()
            .filter(Paragraph::is_accepted)
            .collect();
        if accepted.is_empty() {
            return Err(BaedekerError::EmptyExtraction);
        }

        let doc = Document::new(title, page.categories, page.translation_count, &accepted);
        self.runlog.detail(format_args!("{} words", doc.word_count))?;
        self.runlog
            .detail(format_args!("{} paragraphs", doc.paragraph_count))?;
        Ok(doc)
    }
}

/// Live progress line, rewritten in place.
fn display_processed(current: usize, total: usize) {
    print!("\rProcessed article: {}/{} ", current, total);
    let _ = io::stdout().flush();
}
