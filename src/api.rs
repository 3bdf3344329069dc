use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::crawl::Config;
use crate::error::BaedekerError;
use crate::ratelimit::RateLimiter;

/// Rendered content of one article plus the metadata the corpus header
/// carries.
#[derive(Debug, Clone)]
pub struct Page {
    pub html: String,
    pub categories: Vec<String>,
    /// Number of cross language links of the page.
    pub translation_count: usize,
}

/// Where the crawl loop gets page content from.
///
/// The live implementation is [`WikiApi`]; anything able to produce a
/// [`Page`] per title can drive the loop.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetch the rendered content of one article.
    async fn page(&mut self, title: &str) -> Result<Page, BaedekerError>;
}

/// Client for the parse endpoint of one wiki edition.
///
/// Owns the [`RateLimiter`], so every request waits out the configured
/// interval first. One request per title; failed titles are never retried
/// here, the crawl loop's bookkeeping decides what happens to them.
#[derive(Debug)]
pub struct WikiApi {
    client: Client,
    limiter: RateLimiter,
    endpoint: Url,
}

impl WikiApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = config
            .client()
            .context("failed to build the http client")?;
        Self::with_client(client, config)
    }

    /// Build against an already configured client, e.g. the one that
    /// fetched the title list.
    pub fn with_client(client: Client, config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "https://{}.wikivoyage.org/w/api.php",
            config.edition()
        ))
        .with_context(|| format!("no valid API endpoint for edition {:?}", config.edition()))?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(config.interval()),
            endpoint,
        })
    }

    fn page_url(&self, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", "parse")
            .append_pair("page", title)
            .append_pair("format", "json");
        url
    }

    async fn fetch(&mut self, title: &str) -> Result<Page, BaedekerError> {
        self.limiter.wait().await;

        let url = self.page_url(title);
        debug!("requesting {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| BaedekerError::HttpRequestFailure { error })?;

        if !resp.status().is_success() {
            return Err(BaedekerError::NoHttpSuccessResponse {
                status: resp.status(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|error| BaedekerError::HttpRequestFailure { error })?;
        let payload: ApiResponse = serde_json::from_slice(&body)?;

        if let Some(error) = payload.error {
            debug!("API error for {:?}: {}", title, error.code);
            return Err(BaedekerError::MissingPage);
        }
        let parse = payload.parse.ok_or(BaedekerError::IncompletePayload)?;
        if parse.text.value.trim().is_empty() {
            return Err(BaedekerError::EmptyHtml);
        }

        Ok(Page {
            html: parse.text.value,
            categories: parse.categories.into_iter().map(|c| c.value).collect(),
            translation_count: parse.langlinks.len(),
        })
    }
}

impl PageSource for WikiApi {
    async fn page(&mut self, title: &str) -> Result<Page, BaedekerError> {
        self.fetch(title).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    parse: Option<ParsePayload>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
}

#[derive(Debug, Deserialize)]
struct ParsePayload {
    text: Wildcard,
    #[serde(default)]
    categories: Vec<Wildcard>,
    #[serde(default)]
    langlinks: Vec<LangLink>,
}

/// The parse API nests the interesting value of several objects under a
/// literal `*` key.
#[derive(Debug, Deserialize)]
struct Wildcard {
    #[serde(rename = "*")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct LangLink {
    #[allow(dead_code)]
    lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_parse_payload() {
        let body = r#"{
            "parse": {
                "title": "Lisbon",
                "text": {"*": "<div class=\"mw-parser-output\"><p>Hi</p></div>"},
                "categories": [
                    {"sortkey": "", "*": "Portugal"},
                    {"sortkey": "", "hidden": "", "*": "Has_map"}
                ],
                "langlinks": [
                    {"lang": "de", "url": "https://de.wikivoyage.org/wiki/Lissabon", "*": "Lissabon"},
                    {"lang": "fr", "url": "https://fr.wikivoyage.org/wiki/Lisbonne", "*": "Lisbonne"}
                ]
            }
        }"#;
        let payload: ApiResponse = serde_json::from_str(body).unwrap();
        let parse = payload.parse.unwrap();
        assert!(parse.text.value.contains("mw-parser-output"));
        assert_eq!(parse.categories.len(), 2);
        assert_eq!(parse.categories[0].value, "Portugal");
        assert_eq!(parse.langlinks.len(), 2);
        assert!(payload.error.is_none());
    }

    #[test]
    fn deserializes_a_missing_page_marker() {
        let body = r#"{"error": {"code": "missingtitle", "info": "The page you specified doesn't exist."}}"#;
        let payload: ApiResponse = serde_json::from_str(body).unwrap();
        assert!(payload.parse.is_none());
        assert_eq!(payload.error.unwrap().code, "missingtitle");
    }

    #[test]
    fn optional_metadata_defaults_to_empty() {
        let body = r#"{"parse": {"text": {"*": "<p>Hi</p>"}}}"#;
        let payload: ApiResponse = serde_json::from_str(body).unwrap();
        let parse = payload.parse.unwrap();
        assert!(parse.categories.is_empty());
        assert!(parse.langlinks.is_empty());
    }
}
