use std::io::{BufRead, BufReader, Read};

use bytes::Buf;
use flate2::read::GzDecoder;
use log::{debug, info};
use reqwest::Client;

use crate::error::BaedekerError;

/// Address of the latest title dump for an edition.
fn dump_url(edition: &str) -> String {
    format!(
        "https://dumps.wikimedia.org/{e}wikivoyage/latest/{e}wikivoyage-latest-all-titles-in-ns0.gz",
        e = edition
    )
}

/// The full article title enumeration of one edition, in dump order.
///
/// The order is canonical: corpus documents are appended in it, across
/// resumed runs, and its length is the run's title total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleList {
    titles: Vec<String>,
}

impl TitleList {
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles }
    }

    /// Download and decode the latest title dump for `edition`.
    pub async fn download(client: &Client, edition: &str) -> Result<Self, BaedekerError> {
        let url = dump_url(edition);
        info!("fetching title list from {}", url);
        let resp = client
            .get(&url)
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
        let list = Self::from_gzip(body.reader())?;
        debug!("title list holds {} titles", list.len());
        Ok(list)
    }

    /// Decode a gzip compressed, newline delimited title listing.
    pub fn from_gzip<R: Read>(reader: R) -> Result<Self, BaedekerError> {
        let decoder = BufReader::new(GzDecoder::new(reader));
        let mut titles = Vec::new();
        for line in decoder.lines() {
            let title = normalize_title(&line?);
            if !title.is_empty() {
                titles.push(title);
            }
        }
        Ok(Self { titles })
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}

/// Double quotes would corrupt the document header attribute downstream,
/// swap them for single quotes.
fn normalize_title(line: &str) -> String {
    line.trim().replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzipped(content: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn decodes_and_normalizes_the_dump() {
        let dump = gzipped("Lisbon\nPorto\n\"Quoted\"_Town\n");
        let list = TitleList::from_gzip(&dump[..]).unwrap();
        assert_eq!(list.len(), 3);
        let titles: Vec<_> = list.iter().collect();
        assert_eq!(titles, vec!["Lisbon", "Porto", "'Quoted'_Town"]);
    }

    #[test]
    fn skips_blank_lines() {
        let dump = gzipped("Lisbon\n\nPorto\n");
        let list = TitleList::from_gzip(&dump[..]).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(TitleList::from_gzip(&b"not gzip at all"[..]).is_err());
    }

    #[test]
    fn dump_url_carries_the_edition_twice() {
        let url = dump_url("de");
        assert!(url.contains("dewikivoyage/latest/dewikivoyage-latest-all-titles-in-ns0.gz"));
    }
}
